use std::collections::{BTreeSet, HashSet, VecDeque};

use itertools::Itertools;

use crate::configuration::SearchBudget;
use crate::log::log;

use super::symbols::EPSILON;
use super::Grammar;

/// Breadth-first enumeration of the shortest words a grammar derives.
///
/// Each production rewrites only the first occurrence of its left side in a
/// form, which keeps branching small at the cost of completeness for some
/// unrestricted grammars.
pub struct LanguageEnumerator<'g> {
    grammar: &'g Grammar,
    budget: &'g SearchBudget,
}

impl<'g> LanguageEnumerator<'g> {
    pub fn new(grammar: &'g Grammar, budget: &'g SearchBudget) -> Self {
        LanguageEnumerator { grammar, budget }
    }

    /// At most `n` words, shortest first. The empty word is reported as `ε`.
    pub fn enumerate(&self, n: usize) -> Vec<String> {
        let symbols = self.grammar.symbols();
        let start = self.grammar.start().to_string();

        let mut words = BTreeSet::new();
        let mut queue = VecDeque::from([start.clone()]);
        let mut visited = HashSet::from([start]);
        let mut iterations = 0;

        while words.len() < n {
            if iterations >= self.budget.enumeration_iterations {
                log!(
                    "enumeration stopped after {iterations} iterations with {} of {n} words",
                    words.len()
                );
                break;
            }
            let Some(form) = queue.pop_front() else {
                log!("enumeration exhausted the language with {} words", words.len());
                break;
            };
            iterations += 1;

            if symbols.all_terminals(&form) {
                words.insert((form.chars().count(), form.clone()));
            }

            for production in self.grammar.productions() {
                let Some(position) = form.find(production.left()) else {
                    continue;
                };
                let (before, after) = (
                    &form[..position],
                    &form[position + production.left().len()..],
                );

                for right in production.rights() {
                    let next = format!("{before}{}{after}", right.as_str());
                    if next.chars().count() > self.budget.enumeration_max_length {
                        continue;
                    }
                    if visited.insert(next.clone()) {
                        queue.push_back(next);
                    }
                }
            }
        }

        words
            .into_iter()
            .take(n)
            .map(|(_, word)| if word.is_empty() { EPSILON.to_string() } else { word })
            .collect_vec()
    }
}
