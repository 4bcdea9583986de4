mod commands;
mod logging;
mod output;
mod quarantine;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ixcost",
    version,
    about = "Extract generator interconnection costs from study reports and workbooks"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by the extracting commands.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, default_value = "table", value_parser = ["table", "json", "csv"])]
    pub output: String,

    /// Write the table to a file instead of stdout
    #[arg(short = 'O', long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Move unparseable source files into this directory
    #[arg(long, value_name = "DIR")]
    pub quarantine_dir: Option<PathBuf>,

    /// Print review flags for documents that parsed with doubts
    #[arg(long)]
    pub review: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract costs from PDF study reports (or pre-extracted .txt files)
    Extract {
        /// PDF/TXT files or directories containing them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Predefined profile: total-upgrade, interconnection
        #[arg(short, long, value_name = "NAME", default_value = "total-upgrade")]
        preset: String,

        /// Custom JSON profile (overrides --preset)
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Run pdftotext with -layout
        #[arg(long)]
        layout: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Extract costs from study workbooks (.xlsx/.xls)
    Workbook {
        /// Workbook files or directories containing them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Predefined workbook profile: workbook-interconnection, workbook-interconnection-2016
        #[arg(short, long, value_name = "NAME", default_value = "workbook-interconnection")]
        preset: String,

        /// Custom JSON workbook profile (overrides --preset)
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Inspect and validate extraction profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List predefined profiles
    List,
    /// Explain a profile in plain language
    Explain {
        /// Preset name (e.g., "total-upgrade")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom profile file
    Validate {
        /// Path to JSON profile
        file: PathBuf,

        /// Validate as a workbook profile
        #[arg(long)]
        workbook: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            inputs,
            preset,
            profile,
            layout,
            output,
        } => commands::extract::run(&inputs, &preset, profile.as_deref(), layout, &output),
        Commands::Workbook {
            inputs,
            preset,
            profile,
            output,
        } => commands::workbook::run(&inputs, &preset, profile.as_deref(), &output),
        Commands::Profiles { action } => match action {
            ProfilesAction::List => commands::profiles::list(),
            ProfilesAction::Explain { preset } => commands::profiles::explain(&preset),
            ProfilesAction::Schema => commands::profiles::schema(),
            ProfilesAction::Validate { file, workbook } => {
                commands::profiles::validate(&file, workbook)
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
