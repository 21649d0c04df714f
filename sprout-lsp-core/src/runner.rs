use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Integration layer for the external code execution tool.
///
/// Sprout never runs learner code itself; sandboxing belongs entirely to the
/// runner executable. A submission is a temp file plus a language id, and the
/// runner's stdout is expected to be a JSON report.
pub struct CodeRunner {
    /// Path to the runner executable
    runner_path: PathBuf,
    /// Cache of execution results, keyed by (language, source) hash
    cache: HashMap<u64, ExecutionOutcome>,
}

/// Result of one code submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Identifier assigned to this submission
    pub submission_id: Uuid,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error (or compiler output)
    pub stderr: String,
    /// Final execution status
    pub status: ExecutionStatus,
}

/// Execution status reported by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionStatus {
    Accepted,
    CompileError,
    RuntimeError,
    TimeLimit,
    InternalError,
}

impl ExecutionStatus {
    /// Human-readable status description for the output panel.
    pub fn description(&self) -> &'static str {
        match self {
            ExecutionStatus::Accepted => "Accepted",
            ExecutionStatus::CompileError => "Compilation Error",
            ExecutionStatus::RuntimeError => "Runtime Error",
            ExecutionStatus::TimeLimit => "Time Limit Exceeded",
            ExecutionStatus::InternalError => "Internal Error",
        }
    }
}

/// JSON report printed by the runner executable
#[derive(Debug, Deserialize)]
struct RunnerReport {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    status: ExecutionStatus,
}

/// Errors from launching the runner; execution failures inside the runner
/// are outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("could not find runner executable in PATH")]
    NotFound,

    #[error("failed to launch runner: {0}")]
    Io(#[from] std::io::Error),
}

impl CodeRunner {
    /// Create a runner integration, probing PATH when no explicit path is
    /// given.
    pub fn new(runner_path: Option<PathBuf>) -> Result<Self, RunnerError> {
        let runner_path = match runner_path {
            Some(path) => path,
            None => Self::find_runner_executable()?,
        };

        info!("Found code runner at: {}", runner_path.display());

        Ok(Self {
            runner_path,
            cache: HashMap::new(),
        })
    }

    /// Find the runner executable in common locations
    fn find_runner_executable() -> Result<PathBuf, RunnerError> {
        let candidates = vec![
            "sprout-runner",
            "/usr/local/bin/sprout-runner",
            "/opt/homebrew/bin/sprout-runner",
        ];

        for candidate in candidates {
            if let Ok(status) = std::process::Command::new(candidate)
                .arg("--help")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                if status.success() {
                    return Ok(PathBuf::from(candidate));
                }
            }
        }

        Err(RunnerError::NotFound)
    }

    /// Execute a source snapshot and return the outcome
    pub async fn execute(
        &mut self,
        source: &str,
        language: Language,
    ) -> Result<ExecutionOutcome, RunnerError> {
        let content_hash = Self::content_hash(source, language);

        if let Some(cached) = self.cache.get(&content_hash) {
            info!("📦 Using cached execution result for {} submission", language);
            return Ok(cached.clone());
        }

        let outcome = self.run_submission(source, language).await?;
        self.cache.insert(content_hash, outcome.clone());

        Ok(outcome)
    }

    /// Run one submission through the runner executable
    async fn run_submission(
        &self,
        source: &str,
        language: Language,
    ) -> Result<ExecutionOutcome, RunnerError> {
        let submission_id = Uuid::new_v4();

        // Write the submission to a temp file the runner can read.
        let submission_dir = std::env::temp_dir()
            .join("sprout-lsp")
            .join(format!("run_{}", std::process::id()));
        tokio::fs::create_dir_all(&submission_dir).await?;
        let submission_path =
            submission_dir.join(format!("{}.{}", submission_id, language.extension()));
        tokio::fs::write(&submission_path, source).await?;

        let mut cmd = AsyncCommand::new(&self.runner_path);
        cmd.arg("--language")
            .arg(language.as_str())
            .arg("--report=json")
            .arg(&submission_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        info!(
            "🔨 Running {} submission {} through {}",
            language,
            submission_id,
            self.runner_path.display()
        );
        debug!("Command: {:?}", cmd);

        let start_time = std::time::Instant::now();
        let output = cmd.output().await;
        let duration = start_time.elapsed();

        // Clean up the submission file whatever happened.
        if let Err(e) = tokio::fs::remove_file(&submission_path).await {
            warn!(
                "Failed to cleanup submission file {}: {}",
                submission_path.display(),
                e
            );
        }

        let output = output?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        info!(
            "⏱️  Submission {} finished in {:?}, exit success: {}",
            submission_id,
            duration,
            output.status.success()
        );

        Ok(Self::outcome_from_output(
            submission_id,
            &stdout,
            &stderr,
            output.status.success(),
        ))
    }

    /// Parse the runner's report, degrading to a raw-text outcome when the
    /// output is not the expected JSON.
    fn outcome_from_output(
        submission_id: Uuid,
        stdout: &str,
        stderr: &str,
        exit_success: bool,
    ) -> ExecutionOutcome {
        match serde_json::from_str::<RunnerReport>(stdout) {
            Ok(report) => ExecutionOutcome {
                submission_id,
                stdout: report.stdout,
                stderr: report.stderr,
                status: report.status,
            },
            Err(e) => {
                warn!("Failed to parse runner report as JSON: {}", e);
                debug!("Runner output was: {}", stdout);
                ExecutionOutcome {
                    submission_id,
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                    status: if exit_success {
                        ExecutionStatus::Accepted
                    } else {
                        ExecutionStatus::InternalError
                    },
                }
            }
        }
    }

    /// Hash a submission for the result cache
    fn content_hash(source: &str, language: Language) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        language.as_str().hash(&mut hasher);
        hasher.finish()
    }

    /// Clear the execution cache
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        info!("Cleared execution cache");
    }

    /// Check if the runner is available
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.runner_path)
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}
