//! Google Generative Language REST API client.
//!
//! One [`GeminiClient`] serves every modality:
//! - `generateContent` for structured text, content-endpoint images and speech
//! - `predict` for dedicated (Imagen) images
//! - `predictLongRunning` plus operation polling for Veo video jobs
//! - `countTokens` for credential probes

mod client;
mod provider;
pub mod protocol;

pub use client::GeminiClient;
