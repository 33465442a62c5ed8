use std::ops::Range;

use itertools::Itertools;

use super::symbols::{Symbol, EPSILON};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DerivationKind {
    /// One rewrite after another along a single path.
    Linear,
    /// Reconstructed from an Earley chart.
    ChartBased,
}

/// Human-readable rewrite steps. Only meant for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivationRecord {
    pub kind: DerivationKind,
    pub steps: Vec<String>,
}

impl DerivationRecord {
    pub fn linear(steps: Vec<String>) -> Self {
        DerivationRecord {
            kind: DerivationKind::Linear,
            steps,
        }
    }

    pub fn chart_based(steps: Vec<String>) -> Self {
        DerivationRecord {
            kind: DerivationKind::ChartBased,
            steps,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseTree {
    Node {
        symbol: Symbol,
        span: Range<usize>,
        children: Vec<ParseTree>,
    },
    Leaf {
        symbol: Symbol,
        position: usize,
    },
}

impl ParseTree {
    pub fn symbol(&self) -> Symbol {
        match self {
            ParseTree::Node { symbol, .. } | ParseTree::Leaf { symbol, .. } => *symbol,
        }
    }

    /// The terminals under this node, left to right.
    pub fn yield_string(&self) -> String {
        match self {
            ParseTree::Leaf { symbol, .. } => symbol.to_string(),
            ParseTree::Node { children, .. } => children.iter().map(ParseTree::yield_string).collect(),
        }
    }

    /// Top-down list of the productions used, one per nonterminal node.
    pub fn productions(&self) -> Vec<String> {
        let mut steps = vec![];
        self.collect_productions(&mut steps);
        steps
    }

    fn collect_productions(&self, steps: &mut Vec<String>) {
        let ParseTree::Node {
            symbol,
            span,
            children,
        } = self
        else {
            return;
        };

        let right = if children.is_empty() {
            EPSILON.to_string()
        } else {
            children.iter().map(ParseTree::symbol).collect()
        };
        steps.push(format!("{symbol} → {right}  [{}..{}]", span.start, span.end));

        for child in children {
            child.collect_productions(steps);
        }
    }

    fn render(&self, prefix: &str, is_last: bool, lines: &mut Vec<String>) {
        let connector = if is_last { "└─" } else { "├─" };
        let label = match self {
            ParseTree::Leaf { symbol, .. } => format!("{symbol}"),
            ParseTree::Node { symbol, children, .. } if children.is_empty() => {
                format!("{symbol} → {EPSILON}")
            }
            ParseTree::Node { symbol, .. } => format!("{symbol}"),
        };
        lines.push(format!("{prefix}{connector} {label}"));

        if let ParseTree::Node { children, .. } = self {
            let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });
            for (i, child) in children.iter().enumerate() {
                child.render(&child_prefix, i + 1 == children.len(), lines);
            }
        }
    }
}

/// What an Earley run leaves behind for inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartSummary {
    /// Completed states ending at the last input position, e.g. `S → aSb •  [0, 4]`.
    pub completed: Vec<String>,
    pub derivation: DerivationRecord,
    pub tree: Option<ParseTree>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trace {
    Derivation(DerivationRecord),
    Chart(ChartSummary),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOutcome {
    pub accepted: bool,
    pub trace: Option<Trace>,
}

impl ParseOutcome {
    pub fn accepted(trace: Trace) -> Self {
        ParseOutcome {
            accepted: true,
            trace: Some(trace),
        }
    }

    pub fn rejected() -> Self {
        ParseOutcome {
            accepted: false,
            trace: None,
        }
    }
}

fn numbered(steps: &[String]) -> String {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .join("\n")
}

pub fn render_trace(outcome: &ParseOutcome) -> String {
    let verdict = if outcome.accepted {
        "ACCEPTED"
    } else {
        "REJECTED"
    };

    let body = match &outcome.trace {
        None => "No derivation available".to_string(),
        Some(Trace::Derivation(record)) => {
            format!(
                "Step-by-step derivation:\n{}",
                textwrap::indent(&numbered(&record.steps), "  ")
            )
        }
        Some(Trace::Chart(summary)) => render_chart(summary),
    };

    format!("{verdict}\n{body}")
}

fn render_chart(summary: &ChartSummary) -> String {
    let mut sections = vec![];

    if summary.completed.is_empty() {
        sections.push("Completed states at end of input: none".to_string());
    } else {
        sections.push(format!(
            "Completed states at end of input:\n{}",
            textwrap::indent(&summary.completed.join("\n"), "  ")
        ));
    }

    if !summary.derivation.steps.is_empty() {
        sections.push(format!(
            "Derivation:\n{}",
            textwrap::indent(&numbered(&summary.derivation.steps), "  ")
        ));
    }

    if let Some(tree) = &summary.tree {
        let mut lines = vec![];
        tree.render("", true, &mut lines);
        sections.push(format!(
            "Parse tree:\n{}",
            textwrap::indent(&lines.join("\n"), "  ")
        ));
    }

    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(symbol: Symbol, position: usize) -> ParseTree {
        ParseTree::Leaf { symbol, position }
    }

    fn ab_tree() -> ParseTree {
        ParseTree::Node {
            symbol: 'S',
            span: 0..2,
            children: vec![
                leaf('a', 0),
                ParseTree::Node {
                    symbol: 'S',
                    span: 1..1,
                    children: vec![],
                },
                leaf('b', 1),
            ],
        }
    }

    #[test]
    fn tree_productions_are_top_down() {
        let tree = ab_tree();
        assert_eq!(tree.yield_string(), "ab");
        assert_eq!(
            tree.productions(),
            vec!["S → aSb  [0..2]".to_string(), "S → ε  [1..1]".to_string()]
        );
    }

    #[test]
    fn linear_trace_is_numbered() {
        let outcome = ParseOutcome::accepted(Trace::Derivation(DerivationRecord::linear(vec![
            "S".to_string(),
            "S → aA  ⇒  aA".to_string(),
        ])));
        let text = render_trace(&outcome);
        assert!(text.starts_with("ACCEPTED\n"));
        assert!(text.contains("  1. S\n"));
        assert!(text.contains("  2. S → aA  ⇒  aA"));
    }

    #[test]
    fn chart_trace_shows_tree() {
        let outcome = ParseOutcome::accepted(Trace::Chart(ChartSummary {
            completed: vec!["S → aSb •  [0, 2]".to_string()],
            derivation: DerivationRecord::chart_based(ab_tree().productions()),
            tree: Some(ab_tree()),
        }));
        let text = render_trace(&outcome);
        assert!(text.contains("Completed states at end of input:\n  S → aSb •  [0, 2]"));
        assert!(text.contains("Parse tree:\n  └─ S\n     ├─ a\n     ├─ S → ε\n     └─ b"));
    }

    #[test]
    fn rejection_without_trace() {
        assert_eq!(
            render_trace(&ParseOutcome::rejected()),
            "REJECTED\nNo derivation available"
        );
    }
}
