//! Pinfile CLI — entry point.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use pinfile_cli::{commands, output};

#[derive(Parser)]
#[command(
    name = "pinfile",
    about = "pinfile — check, list, format, and diff pinned-dependency manifests",
    version,
    after_help = "FILE defaults to $PINFILE_MANIFEST, then ./requirements.txt."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manifest and report every finding
    Check {
        /// Manifest file to check
        file: Option<String>,
        /// Fail on warnings too, not just errors
        #[arg(long)]
        strict: bool,
    },
    /// Print the pins of a manifest in order
    List {
        /// Manifest file to list
        file: Option<String>,
    },
    /// Print (or rewrite) a manifest in canonical form
    Fmt {
        /// Manifest file to format
        file: Option<String>,
        /// Rewrite the file in place instead of printing
        #[arg(long)]
        write: bool,
    },
    /// Compare two manifests
    Diff {
        /// Old manifest
        old: String,
        /// New manifest
        new: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Global flags go through env vars so every module can check them.
    if cli.json {
        std::env::set_var("PINFILE_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("PINFILE_QUIET", "1");
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check { file, strict } => commands::check::run(file.as_deref(), strict),
        Commands::List { file } => commands::list::run(file.as_deref()),
        Commands::Fmt { file, write } => commands::fmt::run(file.as_deref(), write),
        Commands::Diff { old, new } => commands::diff_cmd::run(&old, &new),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pinfile", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !output::is_quiet() && !output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
