use std::fmt::Display;

use serde_derive::{Deserialize, Serialize};

use super::production::{Production, Right};
use super::symbols::{Symbol, SymbolSet};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChomskyType {
    Unrestricted = 0,
    ContextSensitive = 1,
    ContextFree = 2,
    Regular = 3,
}

impl ChomskyType {
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_level(level: u8) -> Option<ChomskyType> {
        match level {
            0 => Some(ChomskyType::Unrestricted),
            1 => Some(ChomskyType::ContextSensitive),
            2 => Some(ChomskyType::ContextFree),
            3 => Some(ChomskyType::Regular),
            _ => None,
        }
    }
}

impl Display for ChomskyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChomskyType::Regular => "Regular",
            ChomskyType::ContextFree => "Context-Free",
            ChomskyType::ContextSensitive => "Context-Sensitive",
            ChomskyType::Unrestricted => "Unrestricted",
        };
        write!(f, "Type {} ({name})", self.level())
    }
}

/// Which side of a regular production carries the nonterminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinearStyle {
    Right,
    Left,
}

impl Display for LinearStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinearStyle::Right => write!(f, "right-linear"),
            LinearStyle::Left => write!(f, "left-linear"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Classification {
    pub chomsky_type: ChomskyType,
    /// Only set for regular grammars.
    pub style: Option<LinearStyle>,
}

struct Context<'g> {
    symbols: &'g SymbolSet,
    productions: &'g [Production],
    start: Symbol,
}

type Rule = fn(&Context) -> bool;

const RULES: [(ChomskyType, Rule); 3] = [
    (ChomskyType::Regular, is_regular),
    (ChomskyType::ContextFree, is_context_free),
    (ChomskyType::ContextSensitive, is_context_sensitive),
];

pub fn classify(symbols: &SymbolSet, productions: &[Production], start: Symbol) -> Classification {
    let context = Context {
        symbols,
        productions,
        start,
    };

    let chomsky_type = RULES
        .iter()
        .find(|(_, holds)| holds(&context))
        .map_or(ChomskyType::Unrestricted, |(chomsky_type, _)| *chomsky_type);

    let style = match chomsky_type {
        ChomskyType::Regular => resolve_style(&context),
        _ => None,
    };

    Classification {
        chomsky_type,
        style,
    }
}

fn every(context: &Context, predicate: impl Fn(&Production) -> bool) -> bool {
    context.productions.iter().all(predicate)
}

fn is_regular(context: &Context) -> bool {
    let fits = |style| every(context, |p| p.is_type3_compliant(context.symbols, style));

    (fits(LinearStyle::Right) || fits(LinearStyle::Left)) && resolve_style(context).is_some()
}

fn is_context_free(context: &Context) -> bool {
    every(context, |p| p.is_type2_compliant(context.symbols))
}

fn is_context_sensitive(context: &Context) -> bool {
    every(context, |p| p.is_type1_compliant(context.start)) && start_epsilon_is_isolated(context)
}

/// `S → ε` is only allowed when `S` never shows up on a right-hand side.
fn start_epsilon_is_isolated(context: &Context) -> bool {
    let start_has_epsilon = context
        .productions
        .iter()
        .any(|p| p.single_left() == Some(context.start) && p.has_epsilon());

    !start_has_epsilon
        || context
            .productions
            .iter()
            .flat_map(Production::rights)
            .all(|right| !right.as_str().contains(context.start))
}

/// Scans the two-symbol alternatives. Both directions at once leave no style.
fn resolve_style(context: &Context) -> Option<LinearStyle> {
    let symbols = context.symbols;
    let pairs = context
        .productions
        .iter()
        .flat_map(Production::rights)
        .filter_map(|right| match right {
            Right::Symbols(s) if s.chars().count() == 2 => {
                let mut chars = s.chars();
                Some((chars.next()?, chars.next()?))
            }
            _ => None,
        });

    let mut right_shaped = false;
    let mut left_shaped = false;
    for (a, b) in pairs {
        right_shaped |= symbols.is_terminal(a) && symbols.is_nonterminal(b);
        left_shaped |= symbols.is_nonterminal(a) && symbols.is_terminal(b);
    }

    match (right_shaped, left_shaped) {
        (true, true) => None,
        (false, true) => Some(LinearStyle::Left),
        _ => Some(LinearStyle::Right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_rules(
        nonterminals: &str,
        terminals: &str,
        rules: &[(&str, &[&str])],
    ) -> Classification {
        let symbols = SymbolSet::new(nonterminals.chars(), terminals.chars()).unwrap();
        let productions: Vec<_> = rules
            .iter()
            .map(|(left, rights)| {
                Production::new(left, rights.iter().map(|r| Right::parse(r))).unwrap()
            })
            .collect();
        let start = nonterminals.chars().next().unwrap();
        classify(&symbols, &productions, start)
    }

    #[test]
    fn right_linear_grammar_is_regular() {
        let c = classify_rules("SA", "ab", &[("S", &["aA"]), ("A", &["b"])]);
        assert_eq!(c.chomsky_type, ChomskyType::Regular);
        assert_eq!(c.style, Some(LinearStyle::Right));
    }

    #[test]
    fn left_linear_grammar_is_regular() {
        let c = classify_rules("SA", "ab", &[("S", &["Ab"]), ("A", &["a", "Aa"])]);
        assert_eq!(c.chomsky_type, ChomskyType::Regular);
        assert_eq!(c.style, Some(LinearStyle::Left));
    }

    #[test]
    fn degenerate_regular_grammar_defaults_to_right() {
        let c = classify_rules("S", "a", &[("S", &["a", "ε"])]);
        assert_eq!(c.chomsky_type, ChomskyType::Regular);
        assert_eq!(c.style, Some(LinearStyle::Right));
    }

    #[test]
    fn mixed_directions_fall_back_to_context_free() {
        let c = classify_rules("SA", "ab", &[("S", &["aA"]), ("A", &["Ab", "b"])]);
        assert_eq!(c.chomsky_type, ChomskyType::ContextFree);
        assert_eq!(c.style, None);
    }

    #[test]
    fn balanced_brackets_are_context_free() {
        let c = classify_rules("S", "ab", &[("S", &["aSb", "ε"])]);
        assert_eq!(c.chomsky_type, ChomskyType::ContextFree);
    }

    #[test]
    fn non_contracting_grammar_is_context_sensitive() {
        let c = classify_rules(
            "SBC",
            "abc",
            &[
                ("S", &["aSBC", "aBC"]),
                ("CB", &["BC"]),
                ("aB", &["ab"]),
                ("bB", &["bb"]),
                ("bC", &["bc"]),
                ("cC", &["cc"]),
            ],
        );
        assert_eq!(c.chomsky_type, ChomskyType::ContextSensitive);
        assert_eq!(c.style, None);
    }

    #[test]
    fn start_epsilon_on_right_side_breaks_type1() {
        let isolated = classify_rules("SA", "a", &[("S", &["Aa", "ε"]), ("AA", &["aA"])]);
        assert_eq!(isolated.chomsky_type, ChomskyType::ContextSensitive);

        let recursive = classify_rules("SA", "a", &[("S", &["aS", "ε"]), ("AA", &["aA"])]);
        assert_eq!(recursive.chomsky_type, ChomskyType::Unrestricted);
    }

    #[test]
    fn contracting_grammar_is_unrestricted() {
        let c = classify_rules("SAB", "a", &[("S", &["AB"]), ("AB", &["a"])]);
        assert_eq!(c.chomsky_type, ChomskyType::Unrestricted);
    }

    #[test]
    fn regular_implies_context_free_shape() {
        let symbols = SymbolSet::new("SA".chars(), "ab".chars()).unwrap();
        let productions = vec![
            Production::new("S", vec![Right::parse("aA"), Right::Epsilon]).unwrap(),
            Production::new("A", vec![Right::parse("b")]).unwrap(),
        ];
        let c = classify(&symbols, &productions, 'S');
        assert_eq!(c.chomsky_type, ChomskyType::Regular);
        assert!(productions.iter().all(|p| p.is_type2_compliant(&symbols)));
    }

    #[test]
    fn type_names() {
        assert_eq!(ChomskyType::Regular.to_string(), "Type 3 (Regular)");
        assert_eq!(ChomskyType::Unrestricted.to_string(), "Type 0 (Unrestricted)");
        assert_eq!(ChomskyType::from_level(2), Some(ChomskyType::ContextFree));
        assert_eq!(ChomskyType::from_level(7), None);
    }
}
