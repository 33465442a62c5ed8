use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::configuration::SearchBudget;
use crate::log::log;

use super::symbols::{Symbol, SymbolSet, EPSILON};
use super::trace::{ChartSummary, DerivationRecord, ParseOutcome, ParseTree, Trace};
use super::Grammar;

struct Rule {
    lhs: Symbol,
    rhs: Vec<Symbol>,
}

/// `lhs → rhs` with a dot, started at `origin`. The rule is stored by index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct EarleyState {
    rule: usize,
    dot: usize,
    origin: usize,
}

impl EarleyState {
    fn advance(self) -> Self {
        EarleyState {
            dot: self.dot + 1,
            ..self
        }
    }
}

struct EarleyChart {
    sets: Vec<Vec<EarleyState>>,
    seen: Vec<HashSet<EarleyState>>,
}

impl EarleyChart {
    fn new(input_len: usize) -> Self {
        EarleyChart {
            sets: vec![vec![]; input_len + 1],
            seen: vec![HashSet::new(); input_len + 1],
        }
    }

    /// Returns true if the state was not yet in the set at `position`.
    fn add(&mut self, position: usize, state: EarleyState) -> bool {
        let fresh = self.seen[position].insert(state);
        if fresh {
            self.sets[position].push(state);
        }
        fresh
    }
}

struct BudgetExhausted;

/// Chart parser for context-free grammars.
pub struct EarleyParser<'g> {
    grammar: &'g Grammar,
    budget: &'g SearchBudget,
    rules: Vec<Rule>,
}

impl<'g> EarleyParser<'g> {
    pub fn new(grammar: &'g Grammar, budget: &'g SearchBudget) -> Self {
        let rules = grammar
            .productions()
            .iter()
            .filter_map(|p| Some((p.single_left()?, p)))
            .flat_map(|(lhs, p)| {
                p.rights().iter().map(move |right| Rule {
                    lhs,
                    rhs: right.as_str().chars().collect(),
                })
            })
            .collect();

        EarleyParser {
            grammar,
            budget,
            rules,
        }
    }

    pub fn parse(&self, input: &str) -> ParseOutcome {
        let input = input.chars().collect_vec();

        let chart = match self.build_chart(&input) {
            Ok(chart) => chart,
            Err(BudgetExhausted) => {
                log!(
                    "earley chart exceeded {} steps, input rejected",
                    self.budget.earley_steps
                );
                return ParseOutcome::rejected();
            }
        };

        let n = input.len();
        let start = self.grammar.start();
        let accepted = chart.sets[n]
            .iter()
            .any(|s| s.origin == 0 && self.is_complete(s) && self.rules[s.rule].lhs == start);

        let completed = chart.sets[n]
            .iter()
            .filter(|s| self.is_complete(s))
            .take(self.budget.completed_state_cap)
            .map(|s| self.describe_state(s, n))
            .collect_vec();

        let tree = if accepted {
            Reconstruction::new(self, &chart, &input).node(start, 0, n)
        } else {
            None
        };
        let derivation =
            DerivationRecord::chart_based(tree.as_ref().map(ParseTree::productions).unwrap_or_default());

        ParseOutcome {
            accepted,
            trace: Some(Trace::Chart(ChartSummary {
                completed,
                derivation,
                tree,
            })),
        }
    }

    fn rules_for(&self, symbol: Symbol) -> impl Iterator<Item = usize> + '_ {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.lhs == symbol)
            .map(|(index, _)| index)
    }

    fn next_symbol(&self, state: &EarleyState) -> Option<Symbol> {
        self.rules[state.rule].rhs.get(state.dot).copied()
    }

    fn is_complete(&self, state: &EarleyState) -> bool {
        state.dot == self.rules[state.rule].rhs.len()
    }

    fn describe_state(&self, state: &EarleyState, end: usize) -> String {
        let rule = &self.rules[state.rule];
        let (before, after): (String, String) = (
            rule.rhs[..state.dot].iter().collect(),
            rule.rhs[state.dot..].iter().collect(),
        );
        let body = if rule.rhs.is_empty() {
            format!("{EPSILON} •")
        } else {
            format!("{before} • {after}").trim().to_string()
        };
        format!("{} → {body}  [{}, {end}]", rule.lhs, state.origin)
    }

    fn build_chart(&self, input: &[Symbol]) -> Result<EarleyChart, BudgetExhausted> {
        let symbols = self.grammar.symbols();
        let mut chart = EarleyChart::new(input.len());
        let mut steps = 0;

        for rule in self.rules_for(self.grammar.start()) {
            chart.add(
                0,
                EarleyState {
                    rule,
                    dot: 0,
                    origin: 0,
                },
            );
        }

        for position in 0..=input.len() {
            // A completion spanning nothing advances states of this same set,
            // including ones added after it ran, so only then sweep again.
            loop {
                let mut grew = false;
                let mut nullable_completed = false;
                let mut index = 0;

                while index < chart.sets[position].len() {
                    if steps >= self.budget.earley_steps {
                        return Err(BudgetExhausted);
                    }
                    steps += 1;

                    let state = chart.sets[position][index];
                    index += 1;

                    match self.next_symbol(&state) {
                        Some(next) if symbols.is_nonterminal(next) => {
                            for rule in self.rules_for(next) {
                                let predicted = EarleyState {
                                    rule,
                                    dot: 0,
                                    origin: position,
                                };
                                grew |= chart.add(position, predicted);
                            }
                        }
                        Some(next) => {
                            if input.get(position) == Some(&next) {
                                chart.add(position + 1, state.advance());
                            }
                        }
                        None => {
                            nullable_completed |= state.origin == position;

                            let lhs = self.rules[state.rule].lhs;
                            let advanced = chart.sets[state.origin]
                                .iter()
                                .filter(|waiting| self.next_symbol(waiting) == Some(lhs))
                                .map(|waiting| waiting.advance())
                                .collect_vec();
                            for state in advanced {
                                grew |= chart.add(position, state);
                            }
                        }
                    }
                }

                if !(grew && nullable_completed) {
                    break;
                }
            }
        }

        Ok(chart)
    }
}

/// Rebuilds one parse tree from the completed states of a finished chart.
struct Reconstruction<'p> {
    rules: &'p [Rule],
    input: &'p [Symbol],
    symbols: &'p SymbolSet,
    completed: HashMap<(Symbol, usize, usize), Vec<usize>>,
    in_progress: HashSet<(Symbol, usize, usize)>,
    remaining: usize,
}

impl<'p> Reconstruction<'p> {
    fn new(parser: &'p EarleyParser, chart: &EarleyChart, input: &'p [Symbol]) -> Self {
        let mut completed: HashMap<_, Vec<usize>> = HashMap::new();
        for (end, set) in chart.sets.iter().enumerate() {
            for state in set.iter().filter(|s| parser.is_complete(s)) {
                let lhs = parser.rules[state.rule].lhs;
                completed
                    .entry((lhs, state.origin, end))
                    .or_default()
                    .push(state.rule);
            }
        }

        Reconstruction {
            rules: &parser.rules,
            input,
            symbols: parser.grammar.symbols(),
            completed,
            in_progress: HashSet::new(),
            remaining: parser.budget.earley_steps,
        }
    }

    fn node(&mut self, symbol: Symbol, from: usize, to: usize) -> Option<ParseTree> {
        let key = (symbol, from, to);
        if self.remaining == 0 || !self.in_progress.insert(key) {
            return None;
        }
        self.remaining -= 1;

        let rules = self.rules;
        let candidates = self.completed.get(&key).cloned().unwrap_or_default();
        let tree = candidates.into_iter().find_map(|rule| {
            let children = self.sequence(&rules[rule].rhs, from, to)?;
            Some(ParseTree::Node {
                symbol,
                span: from..to,
                children,
            })
        });

        self.in_progress.remove(&key);
        tree
    }

    fn sequence(&mut self, rhs: &[Symbol], from: usize, to: usize) -> Option<Vec<ParseTree>> {
        let Some((&first, rest)) = rhs.split_first() else {
            return (from == to).then(Vec::new);
        };

        if self.symbols.is_terminal(first) {
            if from >= to || self.input.get(from) != Some(&first) {
                return None;
            }
            let mut tail = self.sequence(rest, from + 1, to)?;
            tail.insert(
                0,
                ParseTree::Leaf {
                    symbol: first,
                    position: from,
                },
            );
            return Some(tail);
        }

        for middle in from..=to {
            if !self.completed.contains_key(&(first, from, middle)) {
                continue;
            }
            let Some(child) = self.node(first, from, middle) else {
                continue;
            };
            if let Some(mut tail) = self.sequence(rest, middle, to) {
                tail.insert(0, child);
                return Some(tail);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced() -> Grammar {
        Grammar::from_rules("S", "ab", &[("S", &["aSb", "ε"])], 'S').unwrap()
    }

    fn summary(outcome: &ParseOutcome) -> &ChartSummary {
        match &outcome.trace {
            Some(Trace::Chart(summary)) => summary,
            other => panic!("expected a chart summary, got {other:?}"),
        }
    }

    fn parse(grammar: &Grammar, input: &str) -> ParseOutcome {
        EarleyParser::new(grammar, &SearchBudget::default()).parse(input)
    }

    #[test]
    fn balanced_brackets() {
        let g = balanced();
        assert!(parse(&g, "").accepted);
        assert!(parse(&g, "ab").accepted);
        assert!(parse(&g, "aabb").accepted);
        assert!(!parse(&g, "aba").accepted);
        assert!(!parse(&g, "abab").accepted);
        assert!(!parse(&g, "aab").accepted);
    }

    #[test]
    fn accepted_parse_carries_tree_and_derivation() {
        let outcome = parse(&balanced(), "aabb");
        let summary = summary(&outcome);

        let tree = summary.tree.as_ref().unwrap();
        assert_eq!(tree.yield_string(), "aabb");
        assert_eq!(
            summary.derivation.steps,
            vec!["S → aSb  [0..4]", "S → aSb  [1..3]", "S → ε  [2..2]"]
        );
        assert!(summary.completed.contains(&"S → aSb •  [0, 4]".to_string()));
    }

    #[test]
    fn rejected_parse_still_reports_chart() {
        let outcome = parse(&balanced(), "aba");
        assert!(!outcome.accepted);
        let summary = summary(&outcome);
        assert!(summary.tree.is_none());
        assert!(summary.derivation.steps.is_empty());
    }

    #[test]
    fn nullable_nonterminals_complete_late() {
        let g = Grammar::from_rules(
            "SAB",
            "x",
            &[("S", &["ABx"]), ("A", &["B", "ε"]), ("B", &["ε"])],
            'S',
        )
        .unwrap();
        assert!(parse(&g, "x").accepted);
        assert!(!parse(&g, "").accepted);
    }

    #[test]
    fn left_recursion_and_cycles() {
        let g = Grammar::from_rules(
            "SE",
            "n+",
            &[("S", &["E"]), ("E", &["E+n", "n", "S"])],
            'S',
        )
        .unwrap();

        let outcome = parse(&g, "n+n+n");
        assert!(outcome.accepted);
        assert_eq!(summary(&outcome).tree.as_ref().unwrap().yield_string(), "n+n+n");
        assert!(!parse(&g, "n+").accepted);
    }

    #[test]
    fn each_state_is_processed_once_without_empty_rules() {
        let g = Grammar::from_rules("SA", "ab", &[("S", &["aA"]), ("A", &["b"])], 'S').unwrap();

        // S → •aA, S → a•A, A → •b, A → b•, S → aA•
        let budget = SearchBudget::default().with_step_limit(5);
        assert!(EarleyParser::new(&g, &budget).parse("ab").accepted);

        let budget = SearchBudget::default().with_step_limit(4);
        assert!(!EarleyParser::new(&g, &budget).parse("ab").accepted);
    }

    #[test]
    fn nullable_completion_reaches_states_predicted_later() {
        let g = Grammar::from_rules(
            "SAB",
            "x",
            &[("S", &["AB"]), ("A", &["ε"]), ("B", &["Ax"])],
            'S',
        )
        .unwrap();
        assert!(parse(&g, "x").accepted);
    }

    #[test]
    fn completed_states_are_capped() {
        let g = balanced();
        let budget = SearchBudget {
            completed_state_cap: 1,
            ..SearchBudget::default()
        };
        let outcome = EarleyParser::new(&g, &budget).parse("ab");
        assert_eq!(summary(&outcome).completed.len(), 1);
    }

    #[test]
    fn exhausted_budget_rejects() {
        let g = Grammar::from_rules("SA", "a", &[("S", &["AA"]), ("A", &["a"])], 'S').unwrap();
        assert!(parse(&g, "aa").accepted);

        let budget = SearchBudget::default().with_step_limit(1);
        let outcome = EarleyParser::new(&g, &budget).parse("aa");
        assert!(!outcome.accepted);
        assert!(outcome.trace.is_none());
    }
}
