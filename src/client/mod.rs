pub mod models;
pub mod rest;

use reqwest::StatusCode;
use thiserror::Error;

/// Why a single chunk could not be transformed. Every variant is recoverable:
/// the runner logs it and moves on to the next chunk.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("API call failed with status code {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response contained no text")]
    EmptyResponse,
}

/// Maps a chunk of text plus an instruction to revised text.
pub trait Transformer {
    async fn transform(&self, chunk: &str, instruction: &str) -> Result<String, TransformError>;
}
