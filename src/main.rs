use std::path::Path;
use std::process;

use chomsky::configuration::{load_budget, ConfigReadError, SearchBudget};
use chomsky::grammar::validate_grammar::report_problems;
use chomsky::grammar::Grammar;
use chomsky::{log, persistence};
use clap::Parser;

use crate::cli::{Cli, Command};

mod cli;

fn read_budget(path: Option<&Path>) -> SearchBudget {
    let Some(path) = path else {
        return SearchBudget::default();
    };

    match load_budget(path) {
        Ok(budget) => budget,
        Err(ConfigReadError::ReadError(e)) => {
            eprintln!("failed to read {}: {e}", path.display());
            process::exit(exitcode::IOERR)
        }
        Err(ConfigReadError::ParseError(e)) => {
            eprintln!("{e}");
            process::exit(exitcode::CONFIG)
        }
    }
}

fn read_grammar(path: &Path) -> Grammar {
    let is_json = path.extension().map_or(false, |ext| ext == "json");
    if is_json {
        return match persistence::load_grammar(path) {
            Ok(grammar) => grammar,
            Err(persistence::PersistenceError::Io(e)) => {
                eprintln!("error reading grammar file: {e}");
                process::exit(exitcode::IOERR)
            }
            Err(e) => {
                eprintln!("{e}");
                process::exit(exitcode::DATAERR)
            }
        };
    }

    let description = match persistence::read_description(path) {
        Ok(description) => description,
        Err(e) => {
            eprintln!("errors while parsing grammar");
            eprintln!("{e:#}");
            process::exit(exitcode::DATAERR)
        }
    };

    match description.build() {
        Ok(grammar) => grammar,
        Err(e) => {
            eprintln!("invalid grammar: {e}");
            eprintln!("run `check` to list every problem");
            process::exit(exitcode::DATAERR)
        }
    }
}

fn check(path: &Path) -> i32 {
    let description = match persistence::read_description(path) {
        Ok(description) => description,
        Err(e) => {
            eprintln!("{e:#}");
            return exitcode::DATAERR;
        }
    };

    match report_problems(&description) {
        Ok(()) => {
            println!("no problems found");
            exitcode::OK
        }
        Err(e) => {
            eprintln!("{e}");
            exitcode::DATAERR
        }
    }
}

fn run(cli: &Cli, budget: &SearchBudget) -> i32 {
    match &cli.command {
        Command::Check => return check(&cli.file),
        Command::Info => println!("{}", read_grammar(&cli.file).describe()),
        Command::Tree => println!("{}", read_grammar(&cli.file).production_tree()),
        Command::Parse { input } => {
            let grammar = read_grammar(&cli.file);
            let outcome = grammar.parse_with(input, budget);
            println!("{}", grammar.render_trace(&outcome));
        }
        Command::Generate { amount } => {
            let words = read_grammar(&cli.file).generate_strings_with(*amount, budget);
            if words.is_empty() {
                println!("no words found within the search budget");
            }
            for (i, word) in words.iter().enumerate() {
                println!("{:>3}. {word}", i + 1);
            }
        }
        Command::Save { output } => {
            let grammar = read_grammar(&cli.file);
            if let Err(e) = persistence::save_grammar(&grammar, output) {
                eprintln!("{e}");
                return exitcode::IOERR;
            }
            println!("saved to {}", output.display());
        }
    }

    exitcode::OK
}

fn main() {
    let cli = Cli::parse();
    let budget = read_budget(cli.budget.as_deref());

    let code = run(&cli, &budget);

    if cli.verbose {
        println!();
        println!("log:");
        for message in log::pull_messages(128) {
            println!("    {message}");
        }
    }

    process::exit(code)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn cli_for(content: &str, command: &str) -> (tempfile::TempDir, Cli) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("grammar.txt");
        fs::write(&path, content).unwrap();

        let cli = Cli::parse_from(["chomsky", path.to_str().unwrap(), command]);
        (dir, cli)
    }

    #[test]
    fn check_reports_through_exit_code() {
        let (_dir, cli) = cli_for("N = { S }\nT = { a }\nstart = S\nS -> aS | ε ;\n", "check");
        assert_eq!(run(&cli, &SearchBudget::default()), exitcode::OK);

        let (_dir, cli) = cli_for("N = { S }\nT = { a }\nstart = Q\nS -> aX ;\n", "check");
        assert_eq!(run(&cli, &SearchBudget::default()), exitcode::DATAERR);
    }

    #[test]
    fn grammar_commands_succeed() {
        for command in ["info", "tree", "generate"] {
            let (_dir, cli) = cli_for("N = { S }\nT = { a }\nstart = S\nS -> aS | ε ;\n", command);
            assert_eq!(run(&cli, &SearchBudget::default()), exitcode::OK, "{command}");
        }
    }
}
