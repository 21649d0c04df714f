use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, info, warn};

/// System prompt shared by the analyze and chat operations.
pub const SYSTEM_PROMPT: &str = "You are a code debugger and guider for young coders. \
Explain errors and code in simple, encouraging language, using analogies and avoiding jargon. \
Suggest fixes clearly and provide educational tips.";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One turn of an assistant conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Errors from talking to the assistant command. All of these surface as a
/// displayed message; none of them touch the diagnostic pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("failed to launch assistant command: {0}")]
    Io(#[from] std::io::Error),

    #[error("assistant did not answer within {0:?}")]
    Timeout(Duration),

    #[error("assistant exited with an error: {0}")]
    Failed(String),
}

/// Build the prompt for a one-shot code analysis request.
pub fn analyze_prompt(code: &str, language: Language, context: Option<&str>) -> String {
    let context_section = match context {
        Some(context) if !context.is_empty() => format!("Additional context: {}\n\n", context),
        _ => String::new(),
    };

    format!(
        "{system}\n\n\
         Code in {language}:\n\
         ```{language}\n\
         {code}\n\
         ```\n\n\
         {context_section}\
         Please analyze this code and provide:\n\
         1. A simple explanation of what this code does or tries to do\n\
         2. Any errors or issues in the code, explained in kid-friendly terms\n\
         3. Suggestions to improve or fix the code\n\
         4. One educational tip related to a concept in this code\n",
        system = SYSTEM_PROMPT,
        language = language,
        code = code,
        context_section = context_section,
    )
}

/// Build the prompt for a conversational request, replaying any history.
pub fn chat_prompt(message: &str, language: Option<Language>, history: &[ChatTurn]) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push_str("\n\n");

    for turn in history {
        let speaker = match turn.role {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
        };
        prompt.push_str(&format!("{}: {}\n", speaker, turn.content));
    }

    match language {
        Some(language) => {
            prompt.push_str(&format!("User: [User is coding in {}] {}\n", language, message));
        }
        None => {
            prompt.push_str(&format!("User: {}\n", message));
        }
    }
    prompt.push_str("Assistant:");
    prompt
}

/// Assistant backed by an external command.
///
/// The prompt is written to the command's stdin and the reply is read from
/// its stdout, the same submit-and-collect shape as the code runner.
pub struct CommandAssistant {
    command: PathBuf,
    timeout: Duration,
}

impl CommandAssistant {
    pub fn new(command: PathBuf) -> Self {
        Self {
            command,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(command: PathBuf, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    /// Analyze a code snapshot and return the assistant's explanation.
    pub async fn analyze(
        &self,
        code: &str,
        language: Language,
        context: Option<&str>,
    ) -> Result<String, AssistantError> {
        self.ask(&analyze_prompt(code, language, context)).await
    }

    /// Answer a conversational question, optionally with history.
    pub async fn chat(
        &self,
        message: &str,
        language: Option<Language>,
        history: &[ChatTurn],
    ) -> Result<String, AssistantError> {
        self.ask(&chat_prompt(message, language, history)).await
    }

    async fn ask(&self, prompt: &str) -> Result<String, AssistantError> {
        info!("Asking assistant command: {}", self.command.display());
        debug!("Prompt length: {} bytes", prompt.len());

        let mut child = AsyncCommand::new(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).await?;
            // Close stdin so the command knows the prompt is complete.
            drop(stdin);
        }

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!("Assistant command timed out after {:?}", self.timeout);
                return Err(AssistantError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AssistantError::Failed(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
