//! `agentmux` - inspect and drive AI coding agents running in tmux sessions.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use agentmux_adapters::{CommandDispatcher, TmuxTransport, TrustBootstrapper, detect_pane_status};
use agentmux_core::{OrchestratorConfig, extract_last_response};
use agentmux_proto::{CaptureSource, PromptData, PromptOptions, ToolVariant};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// agentmux - terminal session orchestration for interactive AI coding agents
#[derive(Parser, Debug)]
#[command(name = "agentmux", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true, env = "AGENTMUX_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify the current state of an agent session
    Status(StatusArgs),

    /// Send text to a session, followed by Enter
    Send(SendArgs),

    /// Wait for a new session's input prompt, accepting a trust dialog once
    Bootstrap(BootstrapArgs),

    /// Print the agent's last response from an idle session
    Response(SessionArgs),
}

/// Target session and the agent running in it.
#[derive(Parser, Debug)]
struct SessionArgs {
    /// tmux session name
    session: String,

    /// Agent CLI running in the session (claude, gemini, codex)
    #[arg(short, long, default_value = "claude")]
    tool: ToolVariant,
}

#[derive(Parser, Debug)]
struct StatusArgs {
    #[command(flatten)]
    target: SessionArgs,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct SendArgs {
    /// tmux session name
    session: String,

    /// Text to send; read from stdin when omitted
    text: Option<String>,

    /// Delay between a multi-line payload and Enter (overrides config)
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct BootstrapArgs {
    #[command(flatten)]
    target: SessionArgs,

    /// Give up after this long (overrides config)
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Interval between polls (overrides config)
    #[arg(long, value_name = "MS")]
    poll_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable.
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = OrchestratorConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    debug!(?config, "configuration loaded");
    let tmux = Arc::new(TmuxTransport::from_config(&config));

    match cli.command {
        Commands::Status(args) => status_command(&config, tmux, args).await,
        Commands::Send(args) => send_command(&config, tmux, args).await,
        Commands::Bootstrap(args) => bootstrap_command(&config, tmux, args).await,
        Commands::Response(args) => response_command(&config, tmux, args).await,
    }
}

async fn status_command(
    config: &OrchestratorConfig,
    tmux: Arc<TmuxTransport>,
    args: StatusArgs,
) -> Result<()> {
    let classification = detect_pane_status(
        &*tmux,
        &args.target.session,
        args.target.tool,
        Some(config.capture_lines),
    )
    .await;

    if args.json {
        let output = serde_json::json!({
            "session": args.target.session,
            "tool": args.target.tool,
            "result": classification.result,
            "prompt": classification.prompt,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let result = classification.result;
    println!(
        "{}: {:?} ({:?} confidence, {:?})",
        args.target.session, result.status, result.confidence, result.reason
    );
    if let Some(prompt) = classification.prompt {
        print!("{}", describe_prompt(&prompt));
    }
    Ok(())
}

/// Human-readable prompt summary, one line per option.
fn describe_prompt(prompt: &PromptData) -> String {
    let mut out = format!("prompt: {}\n", prompt.question);
    match &prompt.options {
        PromptOptions::YesNo(options) => {
            out.push_str(&format!("  y = {}\n  n = {}\n", options.yes, options.no));
        }
        PromptOptions::MultipleChoice(options) => {
            let default = prompt.default_option().map(|o| o.number);
            for option in options {
                let marker = if Some(option.number) == default { '*' } else { ' ' };
                out.push_str(&format!("{marker} {}. {}\n", option.number, option.label));
            }
        }
    }
    out
}

async fn send_command(
    config: &OrchestratorConfig,
    tmux: Arc<TmuxTransport>,
    args: SendArgs,
) -> Result<()> {
    let payload = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read payload from stdin")?;
            // Shells and editors end piped input with a newline; the dispatcher
            // adds its own Enter.
            buffer.truncate(buffer.trim_end_matches(['\n', '\r']).len());
            buffer
        }
    };

    let delay = args.delay_ms.unwrap_or(config.inter_key_delay_ms);
    let command = CommandDispatcher::new(tmux)
        .dispatch(&args.session, &payload, delay)
        .await
        .with_context(|| format!("failed to send to session {}", args.session))?;

    eprintln!(
        "sent {} bytes to {} ({:?} mode)",
        command.payload().len(),
        command.session_name(),
        command.transmission_mode()
    );
    Ok(())
}

async fn bootstrap_command(
    config: &OrchestratorConfig,
    tmux: Arc<TmuxTransport>,
    args: BootstrapArgs,
) -> Result<()> {
    let timeout = args
        .timeout_ms
        .map_or_else(|| config.bootstrap_timeout(), Duration::from_millis);
    let poll_interval = args
        .poll_ms
        .map_or_else(|| config.poll_interval(), Duration::from_millis);

    if !tmux.has_session(&args.target.session).await {
        bail!("no tmux session named {}", args.target.session);
    }

    let capture: Arc<dyn CaptureSource> = tmux.clone();
    let outcome = TrustBootstrapper::new(capture, CommandDispatcher::new(tmux))
        .with_capture_lines(config.capture_lines)
        .bootstrap(&args.target.session, args.target.tool, timeout, poll_interval)
        .await
        .with_context(|| format!("bootstrap of session {} failed", args.target.session))?;

    if outcome.enter_sent {
        println!("{}: ready (trust dialog accepted)", args.target.session);
    } else {
        println!("{}: ready", args.target.session);
    }
    Ok(())
}

async fn response_command(
    config: &OrchestratorConfig,
    tmux: Arc<TmuxTransport>,
    args: SessionArgs,
) -> Result<()> {
    let raw = tmux
        .capture_pane(&args.session, Some(config.capture_lines))
        .await
        .with_context(|| format!("failed to capture session {}", args.session))?;

    match extract_last_response(&raw, args.tool) {
        Some(response) => {
            println!("{response}");
            Ok(())
        }
        None => bail!(
            "no completed response found in session {} (agent busy or not idle)",
            args.session
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentmux_proto::MultipleChoiceOption;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tool_aliases_parse() {
        let cli =
            Cli::try_parse_from(["agentmux", "status", "work", "--tool", "codex-cli", "--json"])
                .unwrap();
        match cli.command {
            Commands::Status(args) => {
                assert_eq!(args.target.session, "work");
                assert_eq!(args.target.tool, ToolVariant::Codex);
                assert!(args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_describe_prompt_marks_default() {
        let prompt = PromptData::multiple_choice(
            "Which package manager?",
            vec![
                MultipleChoiceOption {
                    number: 1,
                    label: "npm".to_string(),
                    is_default: false,
                },
                MultipleChoiceOption {
                    number: 2,
                    label: "pnpm".to_string(),
                    is_default: true,
                },
            ],
        );
        assert_eq!(
            describe_prompt(&prompt),
            "prompt: Which package manager?\n  1. npm\n* 2. pnpm\n"
        );
        assert_eq!(
            describe_prompt(&PromptData::yes_no("Proceed?")),
            "prompt: Proceed?\n  y = yes\n  n = no\n"
        );
    }

    #[test]
    fn test_unknown_tool_rejected() {
        assert!(Cli::try_parse_from(["agentmux", "response", "work", "--tool", "vim"]).is_err());
    }

    #[test]
    fn test_send_text_optional() {
        let cli =
            Cli::try_parse_from(["agentmux", "-v", "send", "work", "--delay-ms", "0"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Send(args) => {
                assert_eq!(args.text, None);
                assert_eq!(args.delay_ms, Some(0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
