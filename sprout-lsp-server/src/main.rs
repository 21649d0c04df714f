use anyhow::Result;
use clap::Parser;
use sprout_lsp_server::{ServerConfig, SproutLanguageServer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tower_lsp::{LspService, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "sprout-lsp",
    version,
    about = "Language server for the Sprout kid-friendly code editor"
)]
struct Args {
    /// Path to the code runner executable (probed from PATH when omitted)
    #[arg(long, env = "SPROUT_RUNNER")]
    runner: Option<PathBuf>,

    /// Command used to answer assistant requests
    #[arg(long, env = "SPROUT_ASSISTANT", default_value = "sprout-assistant")]
    assistant: PathBuf,

    /// Directory where learner files are stored
    #[arg(long, env = "SPROUT_FILES_DIR", default_value = "user_files")]
    files_dir: PathBuf,

    /// Delay in milliseconds between a change and its lint pass
    #[arg(long, env = "SPROUT_DEBOUNCE_MS", default_value_t = 500)]
    debounce_ms: u64,

    /// Maximum number of documents kept open in memory
    #[arg(long, env = "SPROUT_CACHE_CAPACITY", default_value_t = 100)]
    cache_capacity: usize,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "SPROUT_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Stdout carries the LSP protocol, so logs go to stderr or a file.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sprout_lsp=info"));
    let _appender_guard = match &args.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file = path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("sprout-lsp.log"));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    };

    info!("Starting Sprout Language Server");

    let config = ServerConfig {
        debounce: Duration::from_millis(args.debounce_ms),
        cache_capacity: args.cache_capacity,
        runner_path: args.runner,
        assistant_command: args.assistant,
        files_dir: args.files_dir,
    };

    // Create the transport for stdio
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    // Create the language server
    let (service, socket) = LspService::new(|client| SproutLanguageServer::new(client, config));

    // Run the server
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
