//! Prompt text for every generation call.
//!
//! Scene image prompts carry the visual definition of each character present
//! in the scene, so a character looks the same from shot to shot. Characters
//! are matched to the scene's name list loosely; see [`match_character`].

use storyboard_core::{Character, Language, Scene};

/// Dialogue values that mean "nothing to say".
const NO_DIALOGUE_MARKERS: [&str; 6] = ["无对白", "无", "no dialogue", "none", "n/a", "-"];

/// Character whose name matches `reference`.
///
/// Matching is case-sensitive substring containment in either direction, so
/// "Akira" matches "Akira (courier)" and the other way round. The first
/// registry entry that matches wins. Blank names never match.
///
/// # Examples
///
/// ```
/// use storyboard_core::Character;
/// use storyboard_pipeline::prompt::match_character;
///
/// let cast = vec![Character::new("Akira (courier)", "Lead", "Red visor", "Terse")];
/// assert!(match_character(&cast, "Akira").is_some());
/// assert!(match_character(&cast, "akira").is_none());
/// assert!(match_character(&cast, "Mina").is_none());
/// ```
pub fn match_character<'a>(characters: &'a [Character], reference: &str) -> Option<&'a Character> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    characters.iter().find(|character| {
        let name = character.name.trim();
        !name.is_empty() && (name.contains(reference) || reference.contains(name))
    })
}

/// Consistency block for the characters a scene names.
///
/// Returns `None` when no named character is found in the registry.
pub fn consistency_block(scene: &Scene, characters: &[Character]) -> Option<String> {
    let mut matched: Vec<&Character> = Vec::new();
    for character in scene
        .characters
        .iter()
        .filter_map(|reference| match_character(characters, reference))
    {
        if !matched.iter().any(|seen| seen.id == character.id) {
            matched.push(character);
        }
    }
    if matched.is_empty() {
        return None;
    }

    let definitions: Vec<String> = matched
        .iter()
        .map(|character| {
            format!(
                "CHARACTER [{}] VISUAL DEF: {}",
                character.name, character.visual_prompt
            )
        })
        .collect();
    Some(format!(
        "IMPORTANT CHARACTER REFERENCES (MAINTAIN CONSISTENCY):\n{}",
        definitions.join("\n")
    ))
}

/// Image prompt for a scene.
pub fn scene_image_prompt(scene: &Scene, style: &str, characters: &[Character]) -> String {
    let references = consistency_block(scene, characters)
        .map(|block| format!("{}\n\n", block))
        .unwrap_or_default();
    let camera = if scene.camera.trim().is_empty() {
        "Medium shot"
    } else {
        scene.camera.trim()
    };
    format!(
        "Style: {}. Cinematic shot.\n\n{}SCENE CONTENT:\n{}\n\nCamera: {}.\nHigh quality, detailed, 8k resolution.",
        style, references, scene.visual_prompt, camera
    )
}

/// Image prompt for a character design sheet.
pub fn character_image_prompt(character: &Character, style: &str) -> String {
    format!(
        "Character Design Sheet, style: {}. {}. Neutral background, full body shot, detailed character design.",
        style, character.visual_prompt
    )
}

/// Video prompt for a scene, falling back to its description.
pub fn scene_video_prompt(scene: &Scene) -> String {
    let prompt = scene.video_prompt.trim();
    if prompt.is_empty() {
        format!(
            "{}. Cinematic motion, slow motion, high quality.",
            scene.description.trim()
        )
    } else {
        prompt.to_string()
    }
}

/// Text to speak for a scene, if it has any dialogue.
///
/// # Examples
///
/// ```
/// use storyboard_core::Scene;
/// use storyboard_pipeline::prompt::scene_audio_text;
///
/// let mut scene = Scene::default();
/// scene.dialogue = "N/A".to_string();
/// assert_eq!(scene_audio_text(&scene), None);
///
/// scene.dialogue = "Run!".to_string();
/// assert_eq!(scene_audio_text(&scene).as_deref(), Some("Run!"));
/// ```
pub fn scene_audio_text(scene: &Scene) -> Option<String> {
    let dialogue = scene.dialogue.trim();
    let lowered = dialogue.to_lowercase();
    if dialogue.is_empty() || NO_DIALOGUE_MARKERS.contains(&lowered.as_str()) {
        None
    } else {
        Some(dialogue.to_string())
    }
}

fn output_language(language: Language) -> &'static str {
    match language {
        Language::Chinese => "Simplified Chinese",
        Language::English => "English",
    }
}

/// System instruction for character extraction.
pub fn character_analysis_instruction(language: Language) -> String {
    format!(
        "You are a professional screenwriter and character designer. Extract the main characters \
         from the story. For each character provide: name; description (personality and role in \
         the story); visualPrompt, a very detailed physical description for image generation \
         covering appearance, clothing and distinctive features; speakerStyle, the voice timbre \
         and speech habits. Write name, description and speakerStyle in {}. Write visualPrompt in \
         English.",
        output_language(language)
    )
}

/// User content for character extraction.
pub fn character_analysis_content(story: &str) -> String {
    format!("Analyze this story and extract characters:\n\n{}", story)
}

/// Character profiles in the form the scene breakdown instruction embeds.
pub fn character_profiles(characters: &[Character]) -> String {
    characters
        .iter()
        .map(|character| {
            format!(
                "NAME: {}\nVISUAL: {}\nSPEAKER_STYLE: {}",
                character.name, character.visual_prompt, character.speaker_style
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// System instruction for scene breakdown.
pub fn scene_breakdown_instruction(
    scene_count: u32,
    characters: &[Character],
    language: Language,
) -> String {
    let profiles = if characters.is_empty() {
        "(no character profiles provided)".to_string()
    } else {
        character_profiles(characters)
    };
    format!(
        "You are a storyboard artist and director. Break the story into exactly {count} scenes, \
         in story order.\n\n\
         CHARACTER PROFILES:\n{profiles}\n\n\
         Rules:\n\
         1. In each scene's characters list, use names exactly as they appear in the profiles.\n\
         2. In visualPrompt, restate the appearance of every character present so each image \
         stands on its own.\n\
         3. videoPrompt must be in English and describe motion and camera movement only, with no \
         dialogue. Turn each speaker style into visible performance: an aggressive speaker shows \
         an angry expression and sharp gestures, a shy speaker looks down and hesitates.\n\
         4. soundPrompt describes sound effects and the music mood.\n\
         5. estimatedDuration is a short length such as \"5s\".\n\
         6. transition describes the cut into the next scene, such as Cut or Dissolve.\n\
         Write description, dialogue, action and camera in {language}. If a scene has no \
         dialogue, say so plainly.",
        count = scene_count,
        profiles = profiles,
        language = output_language(language)
    )
}

/// User content for scene breakdown.
pub fn scene_breakdown_content(story: &str, scene_count: u32) -> String {
    format!("Story: {}\n\nGenerate {} scenes.", story, scene_count)
}

/// System instruction for the director's story suggestion.
pub fn suggestion_instruction(scene_count: u32, style: &str, language: Language) -> String {
    format!(
        "You are an experienced film director and producer. Read the story outline and write a \
         short Markdown report in {language} covering: the core theme; whether the {style} style \
         fits and what to adjust; whether {count} scenes suit the story length; the estimated \
         number of main characters; pacing; style notes; and how to allocate shots across the \
         story. Also return characterCount, your estimate of the number of main characters.",
        language = output_language(language),
        style = style,
        count = scene_count
    )
}

/// User content for the director's story suggestion.
pub fn suggestion_content(story: &str) -> String {
    format!("Story outline:\n\n{}", story)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast() -> Vec<Character> {
        vec![
            Character::new("Akira", "Courier", "Red visor, black bodysuit", "Terse"),
            Character::new("Mina", "Keeper", "Yellow raincoat", "Soft"),
        ]
    }

    fn scene_with(names: &[&str]) -> Scene {
        Scene {
            visual_prompt: "A flooded street at dusk".to_string(),
            camera: "Low angle".to_string(),
            characters: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn matching_is_symmetric_containment() {
        let registry = vec![Character::new("Akira", "", "Red visor", "")];
        assert!(match_character(&registry, "Akira (courier)").is_some());
        assert!(match_character(&registry, "AKIRA").is_none());
        assert!(match_character(&registry, "").is_none());

        let long_registry = vec![Character::new("Akira (courier)", "", "Red visor", "")];
        assert!(match_character(&long_registry, "Akira").is_some());
    }

    #[test]
    fn scene_prompt_injects_matched_characters_only() {
        let prompt = scene_image_prompt(&scene_with(&["Akira (courier)"]), "Noir", &cast());
        assert!(prompt.starts_with("Style: Noir. Cinematic shot."));
        assert!(prompt.contains("CHARACTER [Akira] VISUAL DEF: Red visor, black bodysuit"));
        assert!(!prompt.contains("Mina"));
        assert!(prompt.contains("SCENE CONTENT:\nA flooded street at dusk"));
        assert!(prompt.contains("Camera: Low angle."));
        assert!(prompt.ends_with("8k resolution."));
    }

    #[test]
    fn unknown_characters_omit_reference_block() {
        let prompt = scene_image_prompt(&scene_with(&["Stranger"]), "Noir", &cast());
        assert!(!prompt.contains("CHARACTER REFERENCES"));
        assert!(consistency_block(&scene_with(&[]), &cast()).is_none());
    }

    #[test]
    fn duplicate_references_inject_once() {
        let block = consistency_block(&scene_with(&["Akira", "Akira (courier)"]), &cast()).unwrap();
        assert_eq!(block.matches("CHARACTER [Akira]").count(), 1);
    }

    #[test]
    fn video_prompt_falls_back_to_description() {
        let mut scene = Scene {
            description: "Akira leaps a canal".to_string(),
            ..Default::default()
        };
        assert_eq!(
            scene_video_prompt(&scene),
            "Akira leaps a canal. Cinematic motion, slow motion, high quality."
        );
        scene.video_prompt = "Tracking shot".to_string();
        assert_eq!(scene_video_prompt(&scene), "Tracking shot");
    }

    #[test]
    fn no_dialogue_markers_are_silent() {
        for marker in ["", "  ", "无对白", "无", "No Dialogue", "NONE", "n/a", "-"] {
            let scene = Scene {
                dialogue: marker.to_string(),
                ..Default::default()
            };
            assert_eq!(scene_audio_text(&scene), None, "{marker:?}");
        }
    }

    #[test]
    fn breakdown_instruction_embeds_profiles_and_count() {
        let instruction = scene_breakdown_instruction(3, &cast(), Language::English);
        assert!(instruction.contains("exactly 3 scenes"));
        assert!(instruction.contains("NAME: Akira\nVISUAL: Red visor, black bodysuit\nSPEAKER_STYLE: Terse"));
        assert!(instruction.contains("\n\nNAME: Mina"));
        assert!(instruction.contains("in English"));
        assert_eq!(
            scene_breakdown_content("Rain", 3),
            "Story: Rain\n\nGenerate 3 scenes."
        );
    }

    #[test]
    fn language_selects_output_language() {
        assert!(character_analysis_instruction(Language::Chinese).contains("Simplified Chinese"));
        assert!(suggestion_instruction(5, "Anime", Language::English).contains("Anime style"));
    }
}
