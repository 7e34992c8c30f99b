//! Structured-output contracts for text generation calls.
//!
//! A [`StructuredContract`] serves two purposes: it emits the response schema
//! sent with the request, and it validates the raw text that comes back.
//! Validation failures are never retried; they surface as
//! [`GenerationErrorKind::Validation`](storyboard_error::GenerationErrorKind::Validation).

use serde_json::{Map, Value, json};
use storyboard_core::{Character, Scene, StorySuggestion};
use storyboard_error::{GenerationError, StoryboardResult};
use tracing::{debug, warn};

/// Speaker style used when the provider omits one.
pub const DEFAULT_SPEAKER_STYLE: &str = "Standard voice";
/// Transition used when the provider omits one.
pub const DEFAULT_TRANSITION: &str = "Cut";
/// Suggestion text used when the provider omits one.
pub const DEFAULT_SUGGESTION: &str = "No suggestion could be generated.";
/// Character count used when the provider omits one.
pub const DEFAULT_CHARACTER_COUNT: u32 = 4;

/// JSON type of a contract field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FieldType {
    /// JSON string
    #[display("STRING")]
    String,
    /// JSON integer
    #[display("INTEGER")]
    Integer,
    /// JSON array of strings
    #[display("ARRAY")]
    StringArray,
}

impl FieldType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    fn schema(&self, description: Option<&str>) -> Value {
        let mut schema = match self {
            FieldType::StringArray => json!({"type": "ARRAY", "items": {"type": "STRING"}}),
            other => json!({"type": other.to_string()}),
        };
        if let (Some(description), Some(object)) = (description, schema.as_object_mut()) {
            object.insert("description".to_string(), Value::from(description));
        }
        schema
    }
}

/// What happens when a field is absent or mistyped.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// Absent or mistyped is a validation failure
    Required,
    /// Absent or mistyped takes the given value
    Fallback(Value),
    /// Absent or mistyped is dropped
    Optional,
}

/// One field of a structured record.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct FieldSpec {
    /// Wire name of the field
    name: &'static str,
    /// Expected JSON type
    field_type: FieldType,
    /// Handling of absent or mistyped values
    rule: FieldRule,
    /// Whether whitespace-only strings are rejected
    non_blank: bool,
    /// Description sent in the schema
    description: Option<&'static str>,
}

impl FieldSpec {
    /// A field that must be present with the right type.
    pub fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            rule: FieldRule::Required,
            non_blank: false,
            description: None,
        }
    }

    /// A field replaced by `value` when absent.
    pub fn fallback(name: &'static str, field_type: FieldType, value: impl Into<Value>) -> Self {
        Self {
            rule: FieldRule::Fallback(value.into()),
            ..Self::required(name, field_type)
        }
    }

    /// A field that may be absent.
    pub fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            rule: FieldRule::Optional,
            ..Self::required(name, field_type)
        }
    }

    /// Additionally reject whitespace-only string values.
    pub fn reject_blank(mut self) -> Self {
        self.non_blank = true;
        self
    }

    /// Attach a schema description.
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn listed_as_required(&self) -> bool {
        !matches!(self.rule, FieldRule::Optional)
    }
}

/// Top-level shape of the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Array,
    Object,
}

/// Field contract for one structured generation call.
///
/// # Examples
///
/// ```
/// use storyboard_pipeline::StructuredContract;
///
/// let contract = StructuredContract::characters();
/// let records = contract
///     .validate(r#"[{"name": "Mina", "description": "Keeper", "visualPrompt": "Yellow raincoat"}]"#)
///     .unwrap();
/// assert_eq!(records[0]["speakerStyle"], "Standard voice");
///
/// assert!(contract.validate(r#"[{"name": "Mina", "description": "Keeper"}]"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredContract {
    shape: Shape,
    fields: Vec<FieldSpec>,
}

impl StructuredContract {
    /// A contract for an array of records.
    pub fn array_of(fields: Vec<FieldSpec>) -> Self {
        Self {
            shape: Shape::Array,
            fields,
        }
    }

    /// A contract for a single record.
    pub fn object(fields: Vec<FieldSpec>) -> Self {
        Self {
            shape: Shape::Object,
            fields,
        }
    }

    /// Character extraction: an array of character records.
    pub fn characters() -> Self {
        Self::array_of(vec![
            FieldSpec::required("name", FieldType::String).reject_blank(),
            FieldSpec::required("description", FieldType::String)
                .describe("Personality and role in the story"),
            FieldSpec::required("visualPrompt", FieldType::String)
                .reject_blank()
                .describe("Detailed appearance for image generation: looks, clothing, key features"),
            FieldSpec::fallback("speakerStyle", FieldType::String, DEFAULT_SPEAKER_STYLE)
                .describe("Voice timbre and speech habits"),
        ])
    }

    /// Scene breakdown: an array of scene records.
    pub fn scenes() -> Self {
        Self::array_of(vec![
            FieldSpec::optional("number", FieldType::Integer),
            FieldSpec::required("description", FieldType::String)
                .describe("What happens in the scene"),
            FieldSpec::fallback("dialogue", FieldType::String, "")
                .describe("Key line of dialogue, or a no-dialogue marker"),
            FieldSpec::fallback("action", FieldType::String, "").describe("Action summary"),
            FieldSpec::fallback("camera", FieldType::String, "")
                .describe("Camera angle and shot size"),
            FieldSpec::required("visualPrompt", FieldType::String)
                .reject_blank()
                .describe("Detailed image prompt restating each character's appearance"),
            FieldSpec::required("videoPrompt", FieldType::String)
                .reject_blank()
                .describe("English video prompt: motion and camera movement only, no dialogue"),
            FieldSpec::fallback("soundPrompt", FieldType::String, "")
                .describe("Sound effects and music mood"),
            FieldSpec::fallback("estimatedDuration", FieldType::String, "")
                .describe("Estimated shot length, e.g. '4s'"),
            FieldSpec::fallback("transition", FieldType::String, DEFAULT_TRANSITION)
                .describe("Transition into the next scene, e.g. Cut or Dissolve"),
            FieldSpec::fallback("characters", FieldType::StringArray, Vec::<String>::new())
                .describe("Names of characters in the scene, exactly as in the character profiles"),
        ])
    }

    /// Story suggestion: a single report object.
    pub fn suggestion() -> Self {
        Self::object(vec![
            FieldSpec::fallback("suggestion", FieldType::String, DEFAULT_SUGGESTION)
                .describe("Markdown analysis report"),
            FieldSpec::fallback("characterCount", FieldType::Integer, DEFAULT_CHARACTER_COUNT)
                .describe("Estimated number of main characters"),
        ])
    }

    /// Declared fields.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Response schema in the provider's dialect.
    ///
    /// Both required and fallback fields are listed as required so the model
    /// is asked for them; fallbacks only apply when it omits them anyway.
    pub fn schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| {
                (
                    field.name.to_string(),
                    field.field_type.schema(field.description),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|field| field.listed_as_required())
            .map(|field| field.name)
            .collect();

        let record = json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        });

        match self.shape {
            Shape::Array => json!({"type": "ARRAY", "items": record}),
            Shape::Object => record,
        }
    }

    /// Parse raw response text and enforce the contract.
    ///
    /// Returns one normalized record per item (a single record for object
    /// contracts) with fallbacks filled in and unknown keys preserved.
    pub fn validate(&self, raw: &str) -> StoryboardResult<Vec<Map<String, Value>>> {
        let value: Value = serde_json::from_str(strip_code_fence(raw)).map_err(|e| {
            GenerationError::validation(format!("response is not valid JSON: {}", e))
        })?;

        let items = match (self.shape, value) {
            (Shape::Array, Value::Array(items)) => items,
            (Shape::Object, object @ Value::Object(_)) => vec![object],
            (Shape::Array, other) => {
                return Err(GenerationError::validation(format!(
                    "expected a JSON array, got {}",
                    json_kind(&other)
                ))
                .into());
            }
            (Shape::Object, other) => {
                return Err(GenerationError::validation(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                ))
                .into());
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.validate_record(index, item))
            .collect()
    }

    fn validate_record(&self, index: usize, item: Value) -> StoryboardResult<Map<String, Value>> {
        let Value::Object(mut record) = item else {
            return Err(GenerationError::validation(format!(
                "item {}: expected an object, got {}",
                index,
                json_kind(&item)
            ))
            .into());
        };

        for field in &self.fields {
            let present = record
                .get(field.name)
                .filter(|value| !value.is_null())
                .cloned();

            match (present, &field.rule) {
                (Some(value), _) if field.field_type.matches(&value) => {
                    if field.non_blank && value.as_str().is_some_and(|s| s.trim().is_empty()) {
                        return Err(GenerationError::validation(format!(
                            "item {}: field '{}' is blank",
                            index, field.name
                        ))
                        .into());
                    }
                }
                (present, FieldRule::Required) => {
                    let problem = if present.is_some() {
                        format!("field '{}' is not of type {}", field.name, field.field_type)
                    } else {
                        format!("missing required field '{}'", field.name)
                    };
                    return Err(GenerationError::validation(format!(
                        "item {}: {}",
                        index, problem
                    ))
                    .into());
                }
                (present, FieldRule::Fallback(fallback)) => {
                    if present.is_some() {
                        warn!(index, field = field.name, "Mistyped field replaced by fallback");
                    } else {
                        debug!(index, field = field.name, "Absent field replaced by fallback");
                    }
                    record.insert(field.name.to_string(), fallback.clone());
                }
                (_, FieldRule::Optional) => {
                    record.remove(field.name);
                }
            }
        }

        Ok(record)
    }
}

/// Parse and validate a character extraction response.
///
/// Every character gets a fresh `char-<uuid>` identity.
pub fn parse_characters(raw: &str) -> StoryboardResult<Vec<Character>> {
    let records = StructuredContract::characters().validate(raw)?;
    Ok(records
        .iter()
        .map(|record| {
            Character::new(
                string_field(record, "name"),
                string_field(record, "description"),
                string_field(record, "visualPrompt"),
                string_field(record, "speakerStyle"),
            )
        })
        .collect())
}

/// Parse and validate a scene breakdown response.
///
/// The response must hold exactly `expected` scenes. Scenes are renumbered
/// 1..=N by position and each gets a fresh `scene-<uuid>` identity.
pub fn parse_scenes(raw: &str, expected: u32) -> StoryboardResult<Vec<Scene>> {
    let records = StructuredContract::scenes().validate(raw)?;
    if records.len() != expected as usize {
        return Err(GenerationError::validation(format!(
            "expected exactly {} scenes, got {}",
            expected,
            records.len()
        ))
        .into());
    }

    Ok(records
        .iter()
        .zip(1u32..)
        .map(|(record, number)| Scene {
            id: Scene::new_id(),
            number,
            description: string_field(record, "description"),
            dialogue: string_field(record, "dialogue"),
            action: string_field(record, "action"),
            camera: string_field(record, "camera"),
            visual_prompt: string_field(record, "visualPrompt"),
            characters: record
                .get("characters")
                .and_then(Value::as_array)
                .map(|names| {
                    names
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            sound_prompt: string_field(record, "soundPrompt"),
            estimated_duration: string_field(record, "estimatedDuration"),
            transition: string_field(record, "transition"),
            video_prompt: string_field(record, "videoPrompt"),
            ..Default::default()
        })
        .collect())
}

/// Parse and validate a story suggestion response.
pub fn parse_suggestion(raw: &str) -> StoryboardResult<StorySuggestion> {
    let records = StructuredContract::suggestion().validate(raw)?;
    let record = records.first().cloned().unwrap_or_default();
    let count = record
        .get("characterCount")
        .and_then(Value::as_u64)
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or(DEFAULT_CHARACTER_COUNT);
    Ok(StorySuggestion::new(string_field(&record, "suggestion"), count))
}

fn string_field(record: &Map<String, Value>, name: &str) -> String {
    record
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Drop a surrounding Markdown code fence, which some models add despite
/// the JSON response type.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
