use itertools::Itertools;
use serde_derive::{Deserialize, Serialize};

use super::classify::LinearStyle;
use super::parse::grammar_parser;
use super::production::{Production, Right};
use super::symbols::Symbol;
use super::{Grammar, GrammarError};

/// A grammar as the user wrote it, before any validation.
///
/// This is also the persisted JSON shape; `type` and `grammar_style` are
/// informational and recomputed whenever the description is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarDescription {
    pub nonterminals: Vec<String>,
    pub terminals: Vec<String>,

    #[serde(with = "ordered_productions")]
    pub productions: Vec<(String, Vec<String>)>,

    pub start_symbol: String,

    #[serde(rename = "type", default)]
    pub chomsky_type: Option<u8>,

    #[serde(default)]
    pub grammar_style: Option<LinearStyle>,
}

impl GrammarDescription {
    /// Reads the text notation, e.g.
    ///
    /// ```text
    /// N = { S }
    /// T = { a, b }
    /// start = S
    /// S -> aSb | ε ;
    /// ```
    pub fn from_text(content: &str) -> Result<GrammarDescription, anyhow::Error> {
        Ok(grammar_parser::description(content)?)
    }

    pub fn build(&self) -> Result<Grammar, GrammarError> {
        let nonterminals = self
            .nonterminals
            .iter()
            .map(|s| to_symbol(s))
            .collect::<Result<Vec<_>, _>>()?;
        let terminals = self
            .terminals
            .iter()
            .map(|s| to_symbol(s))
            .collect::<Result<Vec<_>, _>>()?;
        let start = to_symbol(&self.start_symbol)
            .map_err(|_| GrammarError::InvalidStartSymbol(self.start_symbol.clone()))?;

        let productions = self
            .productions
            .iter()
            .map(|(left, rights)| Production::new(left, rights.iter().map(|r| Right::parse(r))))
            .collect::<Result<Vec<_>, _>>()?;

        Grammar::construct(nonterminals, terminals, productions, start)
    }
}

pub(crate) fn to_symbol(text: &str) -> Result<Symbol, GrammarError> {
    text.chars()
        .exactly_one()
        .map_err(|_| GrammarError::MultiCharacterSymbol(text.to_string()))
}

/// Keeps productions as a JSON object while preserving the order they were written in.
mod ordered_productions {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    type Productions = Vec<(String, Vec<String>)>;

    pub fn serialize<S: Serializer>(productions: &Productions, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(productions.iter().map(|(left, rights)| (left, rights)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Productions, D::Error> {
        struct ProductionsVisitor;

        impl<'de> Visitor<'de> for ProductionsVisitor {
            type Value = Productions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map from left-hand sides to lists of alternatives")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut productions = Productions::new();
                while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                    productions.push(entry);
                }
                Ok(productions)
            }
        }

        deserializer.deserialize_map(ProductionsVisitor)
    }
}
