use crate::client::{TransformError, Transformer};
use crate::pipeline::chunker::{normalize_newlines, word_count, Chunker, PARAGRAPH_BREAK};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

pub const DEFAULT_OUTPUT: &str = "output.txt";
pub const DEFAULT_INSTRUCTION: &str =
    "Check the following passage for typos, spelling errors, duplicated words, etc.";

#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub instruction: String,
    pub word_limit: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub total: usize,
    pub written: usize,
    /// 1-based positions of chunks that produced no output.
    pub failed: Vec<usize>,
}

/// Chunks the input and sends each chunk through `transformer` in order,
/// appending every successful result to the output file as soon as it
/// arrives. A failed chunk is logged and skipped; only I/O on the input or
/// output file aborts the run.
pub async fn run<T: Transformer>(job: &Job, transformer: &T) -> Result<RunReport> {
    let content = fs::read_to_string(&job.input)
        .await
        .with_context(|| format!("reading input file {}", job.input.display()))?;

    let content = normalize_newlines(&content);

    let chunks = Chunker::chunk(&content, job.word_limit);
    info!("Total chunks created: {}", chunks.len());

    let mut output = File::create(&job.output)
        .await
        .with_context(|| format!("creating output file {}", job.output.display()))?;

    let mut report = RunReport {
        total: chunks.len(),
        ..Default::default()
    };

    for (i, chunk) in chunks.iter().enumerate() {
        let position = i + 1;
        info!("Processing chunk {}/{}", position, report.total);
        debug!(words = word_count(chunk), "chunk size");

        match transformer.transform(chunk, &job.instruction).await {
            Ok(text) => {
                let block = format!("{}{}", text, PARAGRAPH_BREAK);
                output
                    .write_all(block.as_bytes())
                    .await
                    .with_context(|| format!("writing output file {}", job.output.display()))?;
                output
                    .flush()
                    .await
                    .with_context(|| format!("writing output file {}", job.output.display()))?;
                report.written += 1;
            }
            Err(e) => {
                log_failure(position, &e);
                report.failed.push(position);
            }
        }
    }

    Ok(report)
}

fn log_failure(position: usize, e: &TransformError) {
    match e {
        TransformError::Status { status, body } => {
            error!(
                chunk = position,
                %status,
                "API call failed with status code {}: {}",
                status.as_u16(),
                body
            );
        }
        other => error!(chunk = position, "{}", other),
    }
    error!("Failed to process chunk due to API error.");
}
