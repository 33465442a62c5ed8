pub mod classify;
pub mod description;
pub mod earley;
pub mod generation;
mod parse;
pub mod production;
pub mod regular;
pub mod rewrite;
pub mod symbols;
pub mod trace;
mod tree;
pub mod validate_grammar;

use itertools::Itertools;

use crate::configuration::SearchBudget;
use crate::log::log;

pub use classify::{ChomskyType, Classification, LinearStyle};
pub use description::GrammarDescription;
pub use earley::EarleyParser;
pub use generation::LanguageEnumerator;
pub use production::{Production, Right};
pub use regular::RegularParser;
pub use rewrite::RewriteParser;
pub use symbols::{Symbol, SymbolSet, EPSILON};
pub use trace::{ChartSummary, DerivationKind, DerivationRecord, ParseOutcome, ParseTree, Trace};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("invalid symbol set: {0}")]
    InvalidSymbolSet(String),

    #[error("production for `{0}` has no alternatives")]
    EmptyProduction(String),

    #[error("production with an empty left-hand side")]
    EmptyLeftSide,

    #[error("symbol `{symbol}` used in `{context}` is not declared")]
    UndeclaredSymbol { symbol: Symbol, context: String },

    #[error("start symbol `{0}` is not a declared nonterminal")]
    InvalidStartSymbol(String),

    #[error("`{0}` is not a single-character symbol")]
    MultiCharacterSymbol(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    symbols: SymbolSet,
    productions: Vec<Production>,
    start: Symbol,
    classification: Classification,
}

impl Grammar {
    /// Productions sharing a left-hand side are merged in order of appearance.
    pub fn construct<N, T, P>(
        nonterminals: N,
        terminals: T,
        productions: P,
        start: Symbol,
    ) -> Result<Grammar, GrammarError>
    where
        N: IntoIterator<Item = Symbol>,
        T: IntoIterator<Item = Symbol>,
        P: IntoIterator<Item = Production>,
    {
        let symbols = SymbolSet::new(nonterminals, terminals)?;
        let productions = merge_productions(productions);

        validate_grammar::validate_grammar(&symbols, &productions, start)?;

        let classification = classify::classify(&symbols, &productions, start);
        log!(
            "constructed grammar with {} productions: {}",
            productions.len(),
            classification.chomsky_type
        );

        Ok(Grammar {
            symbols,
            productions,
            start,
            classification,
        })
    }

    /// Shorthand for tests and examples: every character is one symbol.
    pub fn from_rules(
        nonterminals: &str,
        terminals: &str,
        rules: &[(&str, &[&str])],
        start: Symbol,
    ) -> Result<Grammar, GrammarError> {
        let productions = rules
            .iter()
            .map(|(left, rights)| Production::new(left, rights.iter().map(|r| Right::parse(r))))
            .collect::<Result<Vec<_>, _>>()?;

        Grammar::construct(nonterminals.chars(), terminals.chars(), productions, start)
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn start(&self) -> Symbol {
        self.start
    }

    pub fn classify(&self) -> Classification {
        self.classification
    }

    pub fn chomsky_type(&self) -> ChomskyType {
        self.classification.chomsky_type
    }

    pub fn style(&self) -> Option<LinearStyle> {
        self.classification.style
    }

    /// Alternatives of the production whose left side is exactly `symbol`.
    pub fn alternatives(&self, symbol: Symbol) -> impl Iterator<Item = &Right> + '_ {
        self.productions
            .iter()
            .filter(move |p| p.single_left() == Some(symbol))
            .flat_map(Production::rights)
    }

    pub fn parse(&self, input: &str) -> ParseOutcome {
        self.parse_with(input, &SearchBudget::default())
    }

    /// Dispatches to the strategy matching the grammar's type. The input `ε` means the empty word.
    pub fn parse_with(&self, input: &str, budget: &SearchBudget) -> ParseOutcome {
        let input = if input == EPSILON { "" } else { input };

        if let Some(stray) = input.chars().find(|c| !self.symbols.is_terminal(*c)) {
            log!("input contains `{stray}`, which is not a terminal");
            return ParseOutcome::rejected();
        }

        match self.chomsky_type() {
            ChomskyType::Regular => RegularParser::new(self, budget).parse(input),
            ChomskyType::ContextFree => EarleyParser::new(self, budget).parse(input),
            ChomskyType::ContextSensitive | ChomskyType::Unrestricted => {
                RewriteParser::new(self, budget).parse(input)
            }
        }
    }

    pub fn generate_strings(&self, n: usize) -> Vec<String> {
        self.generate_strings_with(n, &SearchBudget::default())
    }

    pub fn generate_strings_with(&self, n: usize, budget: &SearchBudget) -> Vec<String> {
        LanguageEnumerator::new(self, budget).enumerate(n)
    }

    pub fn render_trace(&self, outcome: &ParseOutcome) -> String {
        trace::render_trace(outcome)
    }

    pub fn production_tree(&self) -> String {
        tree::render_production_tree(self)
    }

    pub fn describe(&self) -> String {
        let mut lines = vec![self.chomsky_type().to_string()];
        if let Some(style) = self.style() {
            lines.push(format!("Style: {style}"));
        }
        lines.push(format!(
            "Nonterminals (N): {}",
            self.symbols.nonterminals().join(", ")
        ));
        lines.push(format!(
            "Terminals (T): {}",
            self.symbols.terminals().join(", ")
        ));
        lines.push(format!("Start symbol (S): {}", self.start));
        lines.push("Productions (P):".to_string());
        lines.extend(self.productions.iter().map(|p| format!("  {p}")));

        lines.join("\n")
    }

    pub fn to_description(&self) -> GrammarDescription {
        GrammarDescription {
            nonterminals: self.symbols.nonterminals().map(String::from).collect(),
            terminals: self.symbols.terminals().map(String::from).collect(),
            productions: self
                .productions
                .iter()
                .map(|p| {
                    let rights = p.rights().iter().map(Right::to_string).collect();
                    (p.left().to_string(), rights)
                })
                .collect(),
            start_symbol: self.start.to_string(),
            chomsky_type: Some(self.chomsky_type().level()),
            grammar_style: self.style(),
        }
    }
}

fn merge_productions<P: IntoIterator<Item = Production>>(productions: P) -> Vec<Production> {
    let mut merged: Vec<Production> = vec![];

    for production in productions {
        match merged.iter_mut().find(|p| p.left() == production.left()) {
            Some(existing) => {
                for right in production.rights() {
                    existing.add_right(right.clone());
                }
            }
            None => merged.push(production),
        }
    }

    merged
}
