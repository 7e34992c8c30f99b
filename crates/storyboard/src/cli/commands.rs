//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use storyboard::{AspectRatio, GenerationSettings, ImageSize, Language};

/// Storyboard - turn a story outline into characters, scenes, images, video and voice
#[derive(Parser, Debug)]
#[command(name = "storyboard")]
#[command(about = "Turn a story outline into a generated storyboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the layered storyboard.toml lookup)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify the provider credential with a cheap probe call
    Check,

    /// Ask the director for a story suggestion and character count
    Suggest {
        #[command(flatten)]
        story: StoryArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Write JSON here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Extract the character registry from a story
    Characters {
        #[command(flatten)]
        story: StoryArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Write JSON here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Break a story into scenes
    Scenes {
        #[command(flatten)]
        story: StoryArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Character registry JSON, as written by `characters`
        #[arg(long, value_name = "PATH")]
        characters: Option<PathBuf>,

        /// Write JSON here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Run the whole pipeline and write the storyboard
    Run {
        #[command(flatten)]
        story: StoryArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Request a director's suggestion first
        #[arg(long)]
        suggest: bool,

        /// Animate every scene image
        #[arg(long)]
        videos: bool,

        /// Voice every scene with dialogue
        #[arg(long)]
        audio: bool,

        /// Write JSON here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Where the story outline comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct StoryArgs {
    /// Story outline text
    #[arg(long)]
    pub story: Option<String>,

    /// Read the story outline from a file
    #[arg(long, value_name = "PATH")]
    pub story_file: Option<PathBuf>,
}

impl StoryArgs {
    /// The story outline text.
    pub fn read(&self) -> std::io::Result<String> {
        match (&self.story, &self.story_file) {
            (Some(story), _) => Ok(story.clone()),
            (None, Some(path)) => std::fs::read_to_string(path),
            (None, None) => Ok(String::new()),
        }
    }
}

/// Overrides for the configured generation settings.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Visual style tag, e.g. "Cinematic" or "Watercolor"
    #[arg(long)]
    pub style: Option<String>,

    /// Frame shape; anything but 9:16 becomes 16:9
    #[arg(long, value_name = "RATIO")]
    pub aspect_ratio: Option<String>,

    /// Number of scenes
    #[arg(long, value_name = "N")]
    pub scenes: Option<u32>,

    /// Language of descriptive output
    #[arg(long)]
    pub language: Option<LanguageArg>,

    /// Image resolution bucket
    #[arg(long)]
    pub image_size: Option<ImageSizeArg>,

    /// Voice for speech synthesis
    #[arg(long)]
    pub voice: Option<String>,

    /// Structured text model
    #[arg(long, value_name = "MODEL")]
    pub text_model: Option<String>,

    /// Image model
    #[arg(long, value_name = "MODEL")]
    pub image_model: Option<String>,

    /// Video model
    #[arg(long, value_name = "MODEL")]
    pub video_model: Option<String>,

    /// Speech synthesis model
    #[arg(long, value_name = "MODEL")]
    pub audio_model: Option<String>,
}

impl SettingsArgs {
    /// Layer these overrides on top of `base`.
    pub fn apply(&self, mut base: GenerationSettings) -> GenerationSettings {
        if let Some(style) = &self.style {
            base.style = style.clone();
        }
        if let Some(ratio) = &self.aspect_ratio {
            base.aspect_ratio = AspectRatio::normalize(ratio);
        }
        if let Some(count) = self.scenes {
            base.scene_count = count;
        }
        if let Some(language) = self.language {
            base.language = language.into();
        }
        if let Some(size) = self.image_size {
            base.image_size = size.into();
        }
        if let Some(voice) = &self.voice {
            base.voice = voice.clone();
        }
        if let Some(model) = &self.text_model {
            base.text_model = model.clone();
        }
        if let Some(model) = &self.image_model {
            base.image_model = model.clone();
        }
        if let Some(model) = &self.video_model {
            base.video_model = model.clone();
        }
        if let Some(model) = &self.audio_model {
            base.audio_model = model.clone();
        }
        base
    }
}

/// Language choices on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    /// Simplified Chinese
    #[value(alias = "zh")]
    Chinese,
    /// English
    #[value(alias = "en")]
    English,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Chinese => Language::Chinese,
            LanguageArg::English => Language::English,
        }
    }
}

/// Image size choices on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageSizeArg {
    /// 1K bucket
    #[value(name = "1K")]
    Low,
    /// 2K bucket
    #[value(name = "2K")]
    High,
}

impl From<ImageSizeArg> for ImageSize {
    fn from(value: ImageSizeArg) -> Self {
        match value {
            ImageSizeArg::Low => ImageSize::Low,
            ImageSizeArg::High => ImageSize::High,
        }
    }
}
