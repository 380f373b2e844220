//! Local agent CLI binary.
//!
//! Discovers tool modules, wires up the Ollama-backed controller, and either
//! answers a single query from the command line or runs an interactive loop.
//!
//! # Environment Variables
//!
//! - `AGENT_TEXT_MODEL` — Ollama model for resolution and direct answers
//! - `OLLAMA_API_BASE_URL` — Ollama API base (default: http://localhost:11434/api)
//! - `AGENT_MODULES_DIR` — Tool module directory (default: modules)
//! - `AGENT_RAG_DB` — SQLite knowledge base path (default: data/knowledge.db)
//! - `RUST_LOG` — Log filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin agent -- --prompt "find my quarterly report"
//! cargo run --bin agent -- --image photo.png --prompt "what is in this picture?"
//! cargo run --bin agent -- --verbose --prompt "ai safety news"
//! cargo run --bin agent            # interactive loop
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use localagent::{AgentController, AgentResponse, ModuleLoader, OllamaClient, ToolSet};

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    prompt: Option<String>,
    image_path: Option<String>,
    /// Also print the full execution history as JSON.
    verbose: bool,
}

fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();
    let mut prompt_parts: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--prompt" | "-p" => {
                prompt_parts.push(
                    args.next()
                        .context("--prompt requires a text argument")?,
                );
            }
            "--image" | "-i" => {
                parsed.image_path = Some(
                    args.next()
                        .context("--image requires a file path argument")?,
                );
            }
            "--verbose" | "-v" => parsed.verbose = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                bail!("unknown option '{}', try --help", other);
            }
            other => prompt_parts.push(other.to_string()),
        }
    }

    if !prompt_parts.is_empty() {
        parsed.prompt = Some(prompt_parts.join(" "));
    }
    Ok(parsed)
}

fn print_usage() {
    println!("Usage: agent [--verbose] [--image <path>] [--prompt <text>]");
    println!();
    println!("With a prompt, answers it and exits. Without one, starts an");
    println!("interactive loop (type 'quit' or 'exit' to leave).");
    println!();
    println!("  -p, --prompt <text>  The query to answer");
    println!("  -i, --image <path>   Attach an image reference to the query");
    println!("  -v, --verbose        Also print the execution history as JSON");
}

fn print_response(response: &AgentResponse, verbose: bool) {
    println!("Status: {}", response.status);
    match serde_json::to_string_pretty(&response.response) {
        Ok(pretty) => println!("Response: {}", pretty),
        Err(_) => println!("Response: {}", response.response),
    }
    if response.execution_history.is_empty() {
        return;
    }
    println!("Steps executed: {}", response.execution_history.len());
    if verbose {
        match serde_json::to_string_pretty(&response.execution_history) {
            Ok(pretty) => println!("Execution history:\n{}", pretty),
            Err(e) => log::warn!("could not render execution history: {}", e),
        }
    }
}

async fn interactive_loop(
    controller: &AgentController,
    image_path: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("Local agent ready. Type 'quit' or 'exit' to leave.");

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("quit") || query.eq_ignore_ascii_case("exit") {
            break;
        }

        let response = controller.handle_query(query, image_path).await;
        print_response(&response, verbose);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;

    let toolset = ToolSet::with_builtins();
    let loader = ModuleLoader::new(toolset);
    let registry = loader
        .load_modules()
        .context("failed to discover tool modules")?;
    log::info!("loaded {} tool(s): {:?}", registry.len(), registry.names());

    let resolver = Arc::new(OllamaClient::from_config());
    let controller = AgentController::new(registry, resolver);

    match args.prompt {
        Some(prompt) => {
            let response = controller
                .handle_query(&prompt, args.image_path.as_deref())
                .await;
            print_response(&response, args.verbose);
        }
        None => {
            interactive_loop(&controller, args.image_path.as_deref(), args.verbose).await?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_prompt_image_and_verbose() {
        let parsed =
            parse_args(args(&["--verbose", "--image", "a.png", "--prompt", "find it"])).unwrap();
        assert_eq!(parsed.prompt.as_deref(), Some("find it"));
        assert_eq!(parsed.image_path.as_deref(), Some("a.png"));
        assert!(parsed.verbose);
    }

    #[test]
    fn test_parse_short_flags() {
        let parsed = parse_args(args(&["-v", "-i", "a.png", "-p", "hello"])).unwrap();
        assert_eq!(parsed.prompt.as_deref(), Some("hello"));
        assert_eq!(parsed.image_path.as_deref(), Some("a.png"));
        assert!(parsed.verbose);
    }

    #[test]
    fn test_bare_words_fold_into_prompt() {
        let parsed = parse_args(args(&["find", "my", "report"])).unwrap();
        assert_eq!(parsed.prompt.as_deref(), Some("find my report"));
        assert!(!parsed.verbose);
    }

    #[test]
    fn test_no_args_means_interactive() {
        let parsed = parse_args(args(&[])).unwrap();
        assert_eq!(parsed, CliArgs::default());
    }

    #[test]
    fn test_missing_flag_values_error() {
        assert!(parse_args(args(&["--prompt"])).is_err());
        assert!(parse_args(args(&["--image"])).is_err());
    }

    #[test]
    fn test_unknown_option_errors() {
        assert!(parse_args(args(&["--frobnicate"])).is_err());
    }
}
