//! Atlas - searchable documentation catalogs for unpacked game asset trees.
//!
//! CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use atlas::config::Config;
use atlas::error::exit_codes;

// =============================================================================
// CLI Definition
// =============================================================================

/// Atlas - searchable documentation catalogs for unpacked game asset trees
#[derive(Parser)]
#[command(name = "atlas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest catalog entries for a partial query
    Suggest {
        /// The partial query to complete
        query: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Maximum number of suggestions
        #[arg(long, short)]
        limit: Option<usize>,
        /// Load the catalog from a local file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Resolve a selected entry to its documentation page
    Open {
        /// The entry name to open
        name: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Load the catalog from a local file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Fetch the catalog from the configured endpoint into the local cache
    Fetch {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Fetch from this endpoint instead of the configured one
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Generate objects.json from an unpacked asset tree
    Generate {
        /// Path to the root of the unpacked asset tree
        asset_root: PathBuf,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Write the catalog to this path
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Initialize atlas configuration
    Init {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Force overwrite existing files
        #[arg(long, short)]
        force: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("atlas error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest {
            query,
            json,
            quiet,
            limit,
            catalog,
        } => run_suggest(&query, json, quiet, limit, catalog),
        Commands::Open {
            name,
            json,
            quiet,
            catalog,
        } => run_open(&name, json, quiet, catalog),
        Commands::Fetch {
            json,
            quiet,
            endpoint,
        } => run_fetch(json, quiet, endpoint),
        Commands::Generate {
            asset_root,
            json,
            quiet,
            output,
        } => run_generate(&asset_root, json, quiet, output),
        Commands::Init { json, quiet, force } => run_init(json, quiet, force),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn run_suggest(
    query: &str,
    json: bool,
    quiet: bool,
    limit: Option<usize>,
    catalog: Option<PathBuf>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use atlas::cli::suggest::{SuggestCommand, SuggestOptions};

    let config = Config::load();

    let cmd = SuggestCommand::new(config);
    let options = SuggestOptions {
        json,
        quiet,
        limit,
        catalog,
    };

    let output = cmd.run(query, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_open(
    name: &str,
    json: bool,
    quiet: bool,
    catalog: Option<PathBuf>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use atlas::cli::open::{OpenCommand, OpenOptions};

    let config = Config::load();

    let cmd = OpenCommand::new(config);
    let options = OpenOptions {
        json,
        quiet,
        catalog,
    };

    let output = cmd.run(name, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        print!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_fetch(
    json: bool,
    quiet: bool,
    endpoint: Option<String>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use atlas::cli::fetch::{FetchCommand, FetchOptions};

    let config = Config::load();

    let cmd = FetchCommand::new(config);
    let options = FetchOptions {
        json,
        quiet,
        endpoint,
    };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_generate(
    asset_root: &std::path::Path,
    json: bool,
    quiet: bool,
    output: Option<PathBuf>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use atlas::cli::generate::{GenerateCommand, GenerateOptions};

    let config = Config::load();

    let cmd = GenerateCommand::new(config);
    let options = GenerateOptions {
        json,
        quiet,
        output,
    };

    let output = cmd.run(asset_root, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_init(json: bool, quiet: bool, force: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use atlas::cli::init::{InitCommand, InitOptions};

    let cwd = std::env::current_dir()?;

    let cmd = InitCommand::new(cwd.to_string_lossy().to_string());
    let options = InitOptions { json, quiet, force };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

// =============================================================================
// Tests
// =============================================================================
