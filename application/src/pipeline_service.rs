use crate::rag_service::RagService;
use domain::providers::{EmbeddingProvider, TextGenerator};
use shared::telemetry::Telemetry;
use shared::types::{GeneratorError, Result};
use shared::utils::{non_blank_lines, separator};
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

/// What to do when a single test case fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the whole run at the first failure.
    #[default]
    FailFast,
    /// Log the failure, skip the test case and keep going.
    ContinueOnError,
}

#[derive(Debug)]
pub struct LineFailure {
    /// 1-based position among the non-blank input lines.
    pub position: usize,
    pub query: String,
    pub error: GeneratorError,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failures: Vec<LineFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reads the test case file: trimmed, non-blank lines in file order.
pub fn read_test_cases(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| GeneratorError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(non_blank_lines(&text))
}

pub fn write_block<W: Write>(out: &mut W, query: &str, generated: &str) -> Result<()> {
    writeln!(out, "--- Generating for: {query} ---")?;
    writeln!(out, "{generated}")?;
    writeln!(out, "\n{}\n", separator())?;
    out.flush()?;
    Ok(())
}

pub struct PipelineService<E, G> {
    rag: RagService<E, G>,
    policy: FailurePolicy,
}

impl<E, G> PipelineService<E, G>
where
    E: EmbeddingProvider,
    G: TextGenerator,
{
    pub fn new(rag: RagService<E, G>, policy: FailurePolicy) -> Self {
        Self { rag, policy }
    }

    pub fn rag(&self) -> &RagService<E, G> {
        &self.rag
    }

    /// Processes every test case in `input_path`, one after another, writing
    /// one block per success to `out`. The input is read in full before
    /// anything is written.
    pub async fn run<W: Write>(&self, input_path: &Path, out: &mut W) -> Result<RunSummary> {
        let cases = read_test_cases(input_path)?;
        info!(
            cases = cases.len(),
            input = %input_path.display(),
            model = %self.rag.options().model,
            "starting generation"
        );

        let mut summary = RunSummary::default();
        for (index, query) in cases.iter().enumerate() {
            let position = index + 1;
            summary.processed += 1;
            let telemetry = Telemetry::new();

            match self.rag.generate_test(query).await {
                Ok(result) => {
                    write_block(out, query, &result.text)?;
                    summary.succeeded += 1;
                    debug!(
                        position,
                        elapsed_ms = telemetry.elapsed().as_millis() as u64,
                        "test case done"
                    );
                }
                Err(err) => match self.policy {
                    FailurePolicy::FailFast => {
                        debug!(position, query = %query, error = %err, "aborting run");
                        return Err(err);
                    }
                    FailurePolicy::ContinueOnError => {
                        error!(
                            position,
                            query = %query,
                            error = %err,
                            "test case failed, continuing"
                        );
                        summary.failures.push(LineFailure {
                            position,
                            query: query.clone(),
                            error: err,
                        });
                    }
                },
            }
        }

        info!(
            processed = summary.processed,
            succeeded = summary.succeeded,
            failed = summary.failures.len(),
            "generation finished"
        );
        Ok(summary)
    }
}
