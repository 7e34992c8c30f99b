//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyboard binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
pub use run::{
    PipelineOptions, check_credential, connect, load_config, read_characters, run_pipeline,
    write_json,
};
