use std::path::Path;

use anyhow::Context;

use crate::grammar::{Grammar, GrammarDescription, GrammarError};
use crate::log::log;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("cannot access grammar file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed grammar JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored grammar is invalid: {0}")]
    Grammar(#[from] GrammarError),
}

pub fn to_json(grammar: &Grammar) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(&grammar.to_description())?)
}

/// Builds a grammar from JSON. A stored `type` is only informational.
pub fn from_json(content: &str) -> Result<Grammar, PersistenceError> {
    let description: GrammarDescription = serde_json::from_str(content)?;
    let grammar = description.build()?;

    if let Some(stored) = description.chomsky_type {
        if stored != grammar.chomsky_type().level() {
            log!(
                "stored type {stored} disagrees with computed {}, using computed",
                grammar.chomsky_type()
            );
        }
    }

    Ok(grammar)
}

pub fn save_grammar<P: AsRef<Path>>(grammar: &Grammar, path: P) -> Result<(), PersistenceError> {
    std::fs::write(&path, to_json(grammar)?)?;
    log!("saved grammar to {}", path.as_ref().display());
    Ok(())
}

pub fn load_grammar<P: AsRef<Path>>(path: P) -> Result<Grammar, PersistenceError> {
    let content = std::fs::read_to_string(&path)?;
    let grammar = from_json(&content)?;
    log!("loaded grammar from {}", path.as_ref().display());
    Ok(grammar)
}

/// Reads a description without validating it: `.json` files as JSON, anything else as text notation.
pub fn read_description<P: AsRef<Path>>(path: P) -> anyhow::Result<GrammarDescription> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path.extension().map_or(false, |ext| ext == "json");
    if is_json {
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    } else {
        GrammarDescription::from_text(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}
