//! shopchat - terminal client for the shopping assistant
//!
//! Runs the interactive chat UI by default, or sends a single message with
//! `--prompt` / `--action` and prints the transcript.

use anyhow::Context;
use clap::Parser;
use shopchat::chat::{ChatController, ChatView, QuickAction, SubmitOutcome};
use shopchat::client::{ChatBackend, HttpChatClient};
use shopchat::config::{ChatConfig, XdgDirs};
use shopchat::messaging::TranscriptView;
use shopchat::tui;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// shopchat - chat with the shopping assistant 🛍
#[derive(Parser, Debug)]
#[command(name = "shopchat")]
#[command(version, about, long_about = None)]
struct Args {
    /// Backend base URL; requests go to {endpoint}/chat
    #[arg(long, env = "SHOPCHAT_ENDPOINT")]
    endpoint: Option<String>,

    /// Config file (default: ~/.config/shopchat/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Send a single message and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Send a quick action (search, status, order, cancel, list_orders);
    /// --prompt becomes its argument
    #[arg(short, long)]
    action: Option<QuickAction>,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long)]
    debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    /// The one-shot message, if running non-interactively.
    fn message(&self) -> Option<String> {
        match (self.action, self.prompt.as_deref()) {
            (Some(action), argument) => Some(action.compose(argument)),
            (None, Some(prompt)) => Some(prompt.to_string()),
            (None, None) => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let dirs = XdgDirs::new();
    let message = args.message();

    // The TUI owns the terminal, so its logs go to a file.
    let log_file = if message.is_none() {
        dirs.ensure_dirs()
            .context("failed to create shopchat directories")?;
        Some(dirs.log_file())
    } else {
        None
    };
    init_tracing(&args, log_file.as_deref())?;

    let config_path = args.config.clone().unwrap_or_else(|| dirs.config_file());
    let mut config = ChatConfig::load(&config_path)?;
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.clone());
        config.validate()?;
    }
    tracing::debug!("Using endpoint {}", config.endpoint);

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let backend = Arc::new(HttpChatClient::new(&config.endpoint));

    match message {
        Some(message) => {
            let ok = runtime.block_on(run_once(&config, backend.as_ref(), &message))?;
            if !ok {
                std::process::exit(1);
            }
            Ok(())
        }
        None => runtime.block_on(tui::run(&config, backend)),
    }
}

fn init_tracing(args: &Args, log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_filter = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "warn" // Quiet by default for normal use
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .init();

    if args.debug || args.verbose {
        tracing::info!("Debug logging enabled");
    }
    Ok(())
}

/// Send one message and print the transcript. Returns `false` on error.
async fn run_once(
    config: &ChatConfig,
    backend: &dyn ChatBackend,
    message: &str,
) -> anyhow::Result<bool> {
    let mut view = TranscriptView::stdout();
    let outcome = converse(config, &mut view, backend, message).await;
    view.finish().context("failed to write transcript")?;

    match outcome {
        Some(outcome) => Ok(!outcome.is_error()),
        None => {
            eprintln!("Nothing to send: the message is empty");
            Ok(false)
        }
    }
}

/// Open a chat session on `view` and send `message`.
async fn converse<V: ChatView + ?Sized>(
    config: &ChatConfig,
    view: &mut V,
    backend: &dyn ChatBackend,
    message: &str,
) -> Option<SubmitOutcome> {
    let mut controller = ChatController::from_config(config);
    controller.start(view);
    controller.submit(view, backend, message).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use shopchat::client::{BackendReply, ClientError};
    use shopchat::messaging::{ChatEvent, ChatResponse, RenderStyle};

    struct ScriptedBackend;

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send(&self, _message: &str) -> Result<BackendReply, ClientError> {
            Ok(BackendReply::Success(ChatResponse::from_events(vec![
                ChatEvent::final_response("You have 2 orders", None),
            ])))
        }
    }

    #[tokio::test]
    async fn test_one_shot_transcript_opens_with_chat_started() {
        let mut view = TranscriptView::new(Vec::new(), RenderStyle::plain());
        let outcome = converse(
            &ChatConfig::default(),
            &mut view,
            &ScriptedBackend,
            "List all my orders",
        )
        .await;

        assert!(matches!(outcome, Some(SubmitOutcome::Rendered { events: 1 })));
        let text = String::from_utf8(view.finish().unwrap()).unwrap();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "[System - System] Chat started.");
        assert!(text.contains("👤 List all my orders\n"));
        assert!(text.contains("🤖 You have 2 orders\n"));
    }

    #[test]
    fn test_args_verify() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_prompt_only() {
        let args = Args::parse_from(["shopchat", "-p", "hello"]);
        assert_eq!(args.message().as_deref(), Some("hello"));
    }

    #[test]
    fn test_action_composes_prompt() {
        let args = Args::parse_from(["shopchat", "--action", "status", "-p", "1234"]);
        assert_eq!(
            args.message().as_deref(),
            Some("What is the status of order 1234")
        );
    }

    #[test]
    fn test_list_orders_needs_no_prompt() {
        let args = Args::parse_from(["shopchat", "-a", "list_orders"]);
        assert_eq!(args.message().as_deref(), Some("List all my orders"));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(Args::try_parse_from(["shopchat", "--action", "refund"]).is_err());
    }

    #[test]
    fn test_interactive_by_default() {
        let args = Args::parse_from(["shopchat", "-d"]);
        assert!(args.message().is_none());
        assert!(args.debug);
    }
}
