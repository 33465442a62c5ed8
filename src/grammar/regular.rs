use std::collections::{HashSet, VecDeque};

use itertools::Itertools;

use crate::configuration::SearchBudget;
use crate::log::log;

use super::classify::LinearStyle;
use super::production::Right;
use super::symbols::Symbol;
use super::trace::{DerivationRecord, ParseOutcome, Trace};
use super::Grammar;

/// Breadth-first walk over `(nonterminal, position)` pairs of a regular grammar.
///
/// Right-linear grammars consume the input left to right starting at 0,
/// left-linear ones consume it right to left starting at the end.
pub struct RegularParser<'g> {
    grammar: &'g Grammar,
    budget: &'g SearchBudget,
}

struct Node {
    state: Symbol,
    position: usize,
    parent: Option<usize>,
    step: String,
}

struct Walk<'i> {
    input: &'i [Symbol],
    style: LinearStyle,
}

impl Walk<'_> {
    fn origin(&self) -> usize {
        match self.style {
            LinearStyle::Right => 0,
            LinearStyle::Left => self.input.len(),
        }
    }

    fn goal(&self) -> usize {
        match self.style {
            LinearStyle::Right => self.input.len(),
            LinearStyle::Left => 0,
        }
    }

    /// The symbol consumed when moving away from `position`, with the position reached.
    fn next(&self, position: usize) -> Option<(Symbol, usize)> {
        match self.style {
            LinearStyle::Right => self.input.get(position).map(|s| (*s, position + 1)),
            LinearStyle::Left => {
                let before = position.checked_sub(1)?;
                Some((self.input[before], before))
            }
        }
    }

    /// Splits a two-symbol alternative into (terminal, nonterminal).
    fn split(&self, right: &str) -> Option<(Symbol, Symbol)> {
        let (first, second) = right.chars().collect_tuple()?;
        match self.style {
            LinearStyle::Right => Some((first, second)),
            LinearStyle::Left => Some((second, first)),
        }
    }

    /// Sentential form once `state` sits at `position`.
    fn form(&self, state: Option<Symbol>, position: usize) -> String {
        let state = state.map(String::from).unwrap_or_default();
        match self.style {
            LinearStyle::Right => {
                let consumed: String = self.input[..position].iter().collect();
                format!("{consumed}{state}")
            }
            LinearStyle::Left => {
                let consumed: String = self.input[position..].iter().collect();
                format!("{state}{consumed}")
            }
        }
    }
}

impl<'g> RegularParser<'g> {
    pub fn new(grammar: &'g Grammar, budget: &'g SearchBudget) -> Self {
        RegularParser { grammar, budget }
    }

    pub fn parse(&self, input: &str) -> ParseOutcome {
        let input = input.chars().collect_vec();
        let walk = Walk {
            input: &input,
            style: self.grammar.style().unwrap_or(LinearStyle::Right),
        };

        let start = self.grammar.start();
        let mut nodes = vec![Node {
            state: start,
            position: walk.origin(),
            parent: None,
            step: start.to_string(),
        }];
        let mut queue = VecDeque::from([0]);
        let mut visited = HashSet::from([(start, walk.origin())]);
        let mut steps = 0;

        while let Some(index) = queue.pop_front() {
            if steps >= self.budget.regular_steps {
                log!("regular search gave up after {steps} steps");
                return ParseOutcome::rejected();
            }
            steps += 1;

            let (state, position) = (nodes[index].state, nodes[index].position);

            for right in self.grammar.alternatives(state) {
                let rule = format!("{state} → {right}");

                match right {
                    Right::Epsilon => {
                        if position == walk.goal() {
                            let step = format!("{rule}  ⇒  {}", walk.form(None, position));
                            return self.accept(&nodes, index, step);
                        }
                    }
                    Right::Symbols(s) if s.chars().count() == 1 => {
                        let Some((symbol, reached)) = walk.next(position) else {
                            continue;
                        };
                        if s.starts_with(symbol) && reached == walk.goal() {
                            let step = format!("{rule}  ⇒  {}", walk.form(None, reached));
                            return self.accept(&nodes, index, step);
                        }
                    }
                    Right::Symbols(s) => {
                        let (Some((terminal, target)), Some((symbol, reached))) =
                            (walk.split(s), walk.next(position))
                        else {
                            continue;
                        };
                        if terminal != symbol || !visited.insert((target, reached)) {
                            continue;
                        }

                        nodes.push(Node {
                            state: target,
                            position: reached,
                            parent: Some(index),
                            step: format!("{rule}  ⇒  {}", walk.form(Some(target), reached)),
                        });
                        queue.push_back(nodes.len() - 1);
                    }
                }
            }
        }

        ParseOutcome::rejected()
    }

    fn accept(&self, nodes: &[Node], last: usize, final_step: String) -> ParseOutcome {
        let mut steps = vec![final_step];
        let mut cursor = Some(last);
        while let Some(index) = cursor {
            steps.push(nodes[index].step.clone());
            cursor = nodes[index].parent;
        }
        steps.reverse();

        ParseOutcome::accepted(Trace::Derivation(DerivationRecord::linear(steps)))
    }
}
