use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Grammar file: `.json` or text notation
    pub file: PathBuf,

    /// TOML file overriding the search budgets
    #[arg(short, long, value_name = "FILE")]
    pub budget: Option<PathBuf>,

    /// Print the event log after the command
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show type, style and productions
    Info,

    /// Show the productions reachable from the start symbol
    Tree,

    /// Decide whether a string belongs to the language (`ε` is the empty string)
    Parse { input: String },

    /// List the shortest words of the language
    Generate {
        #[arg(short = 'n', long, value_name = "AMOUNT", default_value_t = 10)]
        amount: usize,
    },

    /// Write the grammar as JSON
    Save { output: PathBuf },

    /// Report every problem in the grammar file at once
    Check,
}
