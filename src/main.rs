use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::debug;

mod client;
mod config;
mod logging;
mod pipeline;

use client::rest::OpenAiClient;
use config::Settings;
use pipeline::runner::{self, Job, RunReport, DEFAULT_INSTRUCTION, DEFAULT_OUTPUT};

#[derive(Parser, Debug)]
#[command(
    name = "chunky",
    version,
    about = "Chunk text and check it with a chat-completions API."
)]
struct Cli {
    /// Input file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Prompt for the API call
    #[arg(short, long, default_value = DEFAULT_INSTRUCTION)]
    prompt: String,

    /// Word limit per chunk (overrides `word_limit` from settings)
    #[arg(short, long)]
    words: Option<NonZeroUsize>,

    /// Model to use (overrides `model` from settings)
    #[arg(short, long)]
    model: Option<String>,
}

impl Cli {
    fn into_job(self, settings: &mut Settings) -> Job {
        if let Some(model) = self.model {
            settings.model = model;
        }
        Job {
            input: self.input,
            output: self.output,
            instruction: self.prompt,
            word_limit: self.words.map_or(settings.word_limit, NonZeroUsize::get),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::new().unwrap_or_else(|e| {
        eprintln!("Config Error: {}", e);
        std::process::exit(1);
    });
    logging::init(&settings.log_level);

    let job = cli.into_job(&mut settings);
    debug!(
        model = %settings.model,
        base_url = %settings.base_url,
        word_limit = job.word_limit,
        "starting run"
    );

    let client = OpenAiClient::new(&settings)?;
    let report = runner::run(&job, &client).await?;
    print_summary(&report, &job);

    Ok(())
}

fn print_summary(report: &RunReport, job: &Job) {
    let line = format!(
        "{}/{} chunks written to {}",
        report.written,
        report.total,
        job.output.display()
    );
    if report.failed.is_empty() {
        println!("{} {}", "✓".green(), line);
    } else {
        let skipped: Vec<String> = report.failed.iter().map(|i| i.to_string()).collect();
        println!("{} {} (skipped: {})", "✗".yellow(), line, skipped.join(", ").red());
    }
}
