use std::collections::BTreeSet;

use itertools::Itertools;

use super::GrammarError;

pub type Symbol = char;

/// Glyph used when the empty word has to be shown or read back as text.
pub const EPSILON: &str = "ε";
pub const EPSILON_SYMBOL: Symbol = 'ε';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolSet {
    nonterminals: BTreeSet<Symbol>,
    terminals: BTreeSet<Symbol>,
}

impl SymbolSet {
    pub fn new<N, T>(nonterminals: N, terminals: T) -> Result<Self, GrammarError>
    where
        N: IntoIterator<Item = Symbol>,
        T: IntoIterator<Item = Symbol>,
    {
        let nonterminals: BTreeSet<Symbol> = nonterminals.into_iter().collect();
        let terminals: BTreeSet<Symbol> = terminals.into_iter().collect();

        if nonterminals.is_empty() {
            return Err(GrammarError::InvalidSymbolSet(
                "no nonterminals declared".to_string(),
            ));
        }

        let shared = nonterminals.intersection(&terminals).join(", ");
        if !shared.is_empty() {
            return Err(GrammarError::InvalidSymbolSet(format!(
                "symbols declared both terminal and nonterminal: {shared}"
            )));
        }

        if nonterminals
            .iter()
            .chain(terminals.iter())
            .any(|s| *s == EPSILON_SYMBOL)
        {
            return Err(GrammarError::InvalidSymbolSet(format!(
                "`{EPSILON}` is reserved for the empty word"
            )));
        }

        Ok(SymbolSet {
            nonterminals,
            terminals,
        })
    }

    pub fn is_terminal(&self, s: Symbol) -> bool {
        self.terminals.contains(&s)
    }

    pub fn is_nonterminal(&self, s: Symbol) -> bool {
        self.nonterminals.contains(&s)
    }

    pub fn is_declared(&self, s: Symbol) -> bool {
        self.is_terminal(s) || self.is_nonterminal(s)
    }

    /// Fails on the first character that is neither a terminal nor a nonterminal.
    pub fn validate_string(&self, s: &str) -> Result<(), GrammarError> {
        match s.chars().find(|c| !self.is_declared(*c)) {
            Some(symbol) => Err(GrammarError::UndeclaredSymbol {
                symbol,
                context: s.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn all_terminals(&self, s: &str) -> bool {
        s.chars().all(|c| self.is_terminal(c))
    }

    pub fn has_nonterminal(&self, s: &str) -> bool {
        s.chars().any(|c| self.is_nonterminal(c))
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.nonterminals.iter().copied()
    }

    pub fn terminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terminals.iter().copied()
    }
}
