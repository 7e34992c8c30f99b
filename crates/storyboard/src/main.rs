//! Storyboard CLI binary.
//!
//! This binary provides command-line access to storyboard generation:
//! - Verify the provider credential
//! - Suggest, analyze characters and break down scenes step by step
//! - Run the full pipeline and write the storyboard as JSON

use clap::Parser;
use storyboard::{LogSettings, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, PipelineOptions, check_credential, connect, load_config, read_characters,
        run_pipeline, write_json,
    };

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    init_logging(&LogSettings::for_cli(cli.verbose, cli.json_logs))?;

    // A missing credential stops here, before any generation
    let config = load_config(cli.config.as_deref())?;
    let facade = connect(&config)?;

    match cli.command {
        Commands::Check => {
            check_credential(&facade).await?;
        }

        Commands::Suggest {
            story,
            settings,
            output,
        } => {
            let settings = settings.apply(config.defaults.clone());
            let suggestion = facade
                .suggest_story(
                    &story.read()?,
                    settings.scene_count,
                    &settings.style,
                    &settings.text_model,
                    settings.language,
                )
                .await?;
            write_json(&suggestion, output.as_deref())?;
        }

        Commands::Characters {
            story,
            settings,
            output,
        } => {
            let settings = settings.apply(config.defaults.clone());
            let characters = facade
                .analyze_characters(&story.read()?, &settings.text_model, settings.language)
                .await?;
            write_json(&characters, output.as_deref())?;
        }

        Commands::Scenes {
            story,
            settings,
            characters,
            output,
        } => {
            let settings = settings.apply(config.defaults.clone());
            let characters = match characters {
                Some(path) => read_characters(&path)?,
                None => Vec::new(),
            };
            let scenes = facade
                .breakdown_scenes(
                    &story.read()?,
                    settings.scene_count,
                    &characters,
                    &settings.text_model,
                    settings.language,
                )
                .await?;
            write_json(&scenes, output.as_deref())?;
        }

        Commands::Run {
            story,
            settings,
            suggest,
            videos,
            audio,
            output,
        } => {
            let settings = settings.apply(config.defaults.clone());
            let options = PipelineOptions {
                suggest,
                videos,
                audio,
            };
            let state = run_pipeline(&facade, &story.read()?, settings, options).await?;
            write_json(&state, output.as_deref())?;
        }
    }

    Ok(())
}
