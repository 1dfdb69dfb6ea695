use anyhow::{bail, Context, Result};
use application::pipeline_service::{FailurePolicy, PipelineService, RunSummary};
use application::rag_service::RagService;
use clap::{ArgAction, Parser};
use colored::Colorize;
use domain::prompt::PromptTemplate;
use infrastructure::config::{Config, EmbeddingBackend};
use infrastructure::context_store::ContextStore;
use shared::telemetry::{init_tracing, Telemetry};
use shared::types::GeneratorError;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "selenium_rag")]
#[command(
    about = "Generate Python Selenium tests from plain-language test cases using Groq and RAG"
)]
pub struct Cli {
    /// Test case file, one description per line
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Groq model id
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Number of reference passages injected into each prompt
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Embedding backend: hashing or ollama
    #[arg(long)]
    pub embedder: Option<EmbeddingBackend>,

    /// Replace the built-in reference passage with passages from this file
    /// (separated by blank lines)
    #[arg(long)]
    pub context_file: Option<PathBuf>,

    /// Override the system instruction; must contain {context}
    #[arg(long)]
    pub system_template: Option<PathBuf>,

    /// Override the user instruction; must contain {test_case}
    #[arg(long)]
    pub user_template: Option<PathBuf>,

    /// Skip failing test cases instead of aborting the run
    #[arg(long, action = ArgAction::SetTrue)]
    pub continue_on_error: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Command-line flags win over environment settings.
    pub fn apply_overrides(&self, mut config: Config) -> shared::types::Result<Config> {
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(model) = &self.model {
            config.groq_model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(embedder) = self.embedder {
            config.embedding_backend = embedder;
        }
        if let Some(context_file) = &self.context_file {
            config.context_file = Some(context_file.clone());
        }
        config.validate()?;
        Ok(config)
    }

    pub fn template(&self) -> shared::types::Result<PromptTemplate> {
        let mut template = PromptTemplate::default();
        if let Some(path) = &self.system_template {
            template.system = read_template(path)?;
        }
        if let Some(path) = &self.user_template {
            template.user = read_template(path)?;
        }
        template.validate()?;
        Ok(template)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.continue_on_error {
            FailurePolicy::ContinueOnError
        } else {
            FailurePolicy::FailFast
        }
    }
}

fn read_template(path: &Path) -> shared::types::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        GeneratorError::Config(format!("cannot read template {}: {e}", path.display()))
    })
}

pub struct CliApp {
    telemetry: Telemetry,
}

impl CliApp {
    pub fn new() -> Self {
        Self {
            telemetry: Telemetry::new(),
        }
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        init_tracing(cli.verbose);

        let config = Config::load().context("loading configuration")?;
        let config = cli.apply_overrides(config)?;
        let template = cli.template()?;

        eprintln!(
            "{}\n",
            "Starting Groq RAG Selenium Test Generation...".cyan().bold()
        );

        let passages = config.load_passages()?;
        let store = ContextStore::index(passages, config.build_embedder())
            .await
            .context("indexing reference corpus")?;
        let generator = config.build_generator()?;
        let rag = RagService::new(
            store,
            generator,
            template,
            config.generation_options(),
            config.top_k,
        )?;
        let pipeline = PipelineService::new(rag, cli.failure_policy());

        let stdout = io::stdout();
        let mut out = stdout.lock();
        let summary = pipeline.run(&config.input_path, &mut out).await?;
        self.report(&summary)
    }

    fn report(&self, summary: &RunSummary) -> Result<()> {
        let elapsed = self.telemetry.elapsed().as_secs_f32();
        if summary.is_success() {
            eprintln!(
                "{}",
                format!(
                    "Generated {} test(s) in {elapsed:.1}s.",
                    summary.succeeded
                )
                .green()
            );
            return Ok(());
        }

        for failure in &summary.failures {
            eprintln!(
                "{} #{} {:?}: {}",
                "Failed".red().bold(),
                failure.position,
                failure.query,
                failure.error
            );
        }
        run_outcome(summary)
    }
}

/// A run with any failed test case ends in an error, so the process exits
/// non-zero.
pub fn run_outcome(summary: &RunSummary) -> Result<()> {
    if summary.is_success() {
        return Ok(());
    }
    bail!(
        "{} of {} test case(s) failed",
        summary.failures.len(),
        summary.processed
    )
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
