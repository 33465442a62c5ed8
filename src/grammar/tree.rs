use std::collections::HashSet;

use itertools::Itertools;

use super::production::Right;
use super::symbols::{Symbol, EPSILON};
use super::Grammar;

/// ASCII rendering of the productions reachable from the start symbol.
///
/// Every branch carries its own copy of the visited set, so a nonterminal is
/// expanded again on an independent path but never inside its own expansion.
pub(super) fn render_production_tree(grammar: &Grammar) -> String {
    let mut lines = vec![];
    branch(grammar, grammar.start(), "", HashSet::new(), &mut lines);
    lines.join("\n")
}

fn branch(
    grammar: &Grammar,
    symbol: Symbol,
    prefix: &str,
    mut visited: HashSet<Symbol>,
    lines: &mut Vec<String>,
) {
    if !visited.insert(symbol) {
        lines.push(format!("{prefix}├─ {symbol} (already visited)"));
        return;
    }

    let alternatives = grammar.alternatives(symbol).collect_vec();
    if alternatives.is_empty() {
        lines.push(format!("{prefix}└─ {symbol} (no productions)"));
        return;
    }

    lines.push(format!("{prefix}├─ {symbol}"));

    for (i, right) in alternatives.iter().enumerate() {
        let last = i + 1 == alternatives.len();
        let connector = if last { "└─" } else { "├─" };

        let Right::Symbols(text) = right else {
            lines.push(format!("{prefix}│  {connector} {EPSILON} (empty)"));
            continue;
        };
        lines.push(format!("{prefix}│  {connector} {text}"));

        let indent = if last { "   " } else { "│  " };
        let child_prefix = format!("{prefix}{indent}{indent}");
        let nonterminals = text
            .chars()
            .filter(|c| grammar.symbols().is_nonterminal(*c))
            .unique();

        for nonterminal in nonterminals {
            lines.push(format!("{child_prefix}│"));
            branch(grammar, nonterminal, &child_prefix, visited.clone(), lines);
        }
    }
}
