//! Test utilities for pipeline tests.
//!
//! This module provides a scripted provider and a recording clock.

pub mod mock_provider;

#[allow(unused_imports)]
pub use mock_provider::{MockProvider, RecordingSleeper, courier_characters_json, scenes_json};
