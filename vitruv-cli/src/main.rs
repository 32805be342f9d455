use clap::Parser;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "vitruv",
    version,
    about = "Analyze legacy source structure and propose a refactored architecture"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Classify an error into a stable exit code.
///
/// Exit codes:
///   0 — success
///   1 — general/unknown error
///   2 — configuration error (including grammar/query startup failures)
///   3 — source file not found / unreadable
///   6 — LLM/advice error
///   7 — render failed
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    let msg = format!("{err:#}");
    let lower = msg.to_lowercase();

    if lower.contains("source file") || lower.contains("cannot read") {
        3 // input file error
    } else if lower.contains("config") || lower.contains("grammar") || lower.contains("query") {
        2 // config / startup error
    } else if lower.contains("advice")
        || lower.contains("contract violation")
        || lower.contains("api error")
        || lower.contains("network error")
    {
        6 // LLM/advice error
    } else if lower.contains("graphviz") || lower.contains("render") {
        7 // render failed
    } else {
        1 // general error
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // Run the selected command
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create runtime: {e}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(commands::run(cli.command)) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_missing_input() {
        let err = anyhow::anyhow!("Input error: Source file not found: /tmp/nope.py");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_unreadable_input() {
        let err = anyhow::anyhow!("Cannot read /tmp/locked.py: permission denied");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_grammar() {
        let err = anyhow::anyhow!("Cannot load Python grammar: version mismatch");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_config() {
        let err = anyhow::anyhow!("Configuration error: Parse error: bad toml");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_advice() {
        let err = anyhow::anyhow!("Advice error: API error (HTTP 500): boom");
        assert_eq!(classify_exit_code(&err), 6);
    }

    #[test]
    fn exit_code_contract_violation() {
        let err = anyhow::anyhow!("Contract violation: missing field `summary`");
        assert_eq!(classify_exit_code(&err), 6);
    }

    #[test]
    fn exit_code_render() {
        let err = anyhow::anyhow!("Graphviz executable 'dot' not found.");
        assert_eq!(classify_exit_code(&err), 7);
    }

    #[test]
    fn exit_code_general() {
        let err = anyhow::anyhow!("Something unexpected happened");
        assert_eq!(classify_exit_code(&err), 1);
    }
}
