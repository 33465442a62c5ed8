use std::collections::{HashSet, VecDeque};

use crate::configuration::SearchBudget;
use crate::log::log;

use super::classify::ChomskyType;
use super::production::Production;
use super::trace::{DerivationRecord, ParseOutcome, Trace};
use super::Grammar;

/// Breadth-first search over sentential forms for grammars without a better strategy.
///
/// This is not a decision procedure: the search stops after
/// `SearchBudget::rewrite_steps` dequeues and reports rejection.
/// Context-sensitive rules never shrink a form, so for those grammars
/// forms longer than the target are dropped as well.
pub struct RewriteParser<'g> {
    grammar: &'g Grammar,
    budget: &'g SearchBudget,
}

struct Form {
    text: String,
    parent: Option<usize>,
    step: String,
}

/// Every way of rewriting one occurrence of a left side in `form`, in production order.
pub fn successors<'a>(
    form: &'a str,
    productions: &'a [Production],
) -> impl Iterator<Item = (String, String)> + 'a {
    productions.iter().flat_map(move |production| {
        let left = production.left();
        form.char_indices()
            .filter(move |(position, _)| form[*position..].starts_with(left))
            .flat_map(move |(position, _)| {
                production.rights().iter().map(move |right| {
                    let rewritten = format!(
                        "{}{}{}",
                        &form[..position],
                        right.as_str(),
                        &form[position + left.len()..]
                    );
                    (rewritten, format!("{left} → {right}"))
                })
            })
    })
}

impl<'g> RewriteParser<'g> {
    pub fn new(grammar: &'g Grammar, budget: &'g SearchBudget) -> Self {
        RewriteParser { grammar, budget }
    }

    pub fn parse(&self, target: &str) -> ParseOutcome {
        let length_cap = self.length_cap(target.chars().count());
        let start = self.grammar.start().to_string();

        let mut forms = vec![Form {
            text: start.clone(),
            parent: None,
            step: start.clone(),
        }];
        let mut queue = VecDeque::from([0]);
        let mut visited = HashSet::from([start]);
        let mut steps = 0;

        while let Some(index) = queue.pop_front() {
            if steps >= self.budget.rewrite_steps {
                log!(
                    "rewrite search gave up after {steps} steps with {} forms queued",
                    queue.len() + 1
                );
                return ParseOutcome::rejected();
            }
            steps += 1;

            if forms[index].text == target {
                return self.accept(&forms, index);
            }

            let expansions = successors(&forms[index].text, self.grammar.productions())
                .filter(|(text, _)| text.chars().count() <= length_cap)
                .filter(|(text, _)| visited.insert(text.clone()))
                .collect::<Vec<_>>();

            for (text, rule) in expansions {
                let step = format!("{rule}  ⇒  {}", display_form(&text));
                forms.push(Form {
                    text,
                    parent: Some(index),
                    step,
                });
                queue.push_back(forms.len() - 1);
            }
        }

        ParseOutcome::rejected()
    }

    fn length_cap(&self, target_len: usize) -> usize {
        let cap = self.budget.rewrite_length_cap(target_len);
        match self.grammar.chomsky_type() {
            // `S → ε` only ever rewrites the one-symbol start form
            ChomskyType::ContextSensitive => cap.min(target_len.max(1)),
            _ => cap,
        }
    }

    fn accept(&self, forms: &[Form], last: usize) -> ParseOutcome {
        let mut steps = vec![];
        let mut cursor = Some(last);
        while let Some(index) = cursor {
            steps.push(forms[index].step.clone());
            cursor = forms[index].parent;
        }
        steps.reverse();

        ParseOutcome::accepted(Trace::Derivation(DerivationRecord::linear(steps)))
    }
}

fn display_form(text: &str) -> &str {
    if text.is_empty() {
        super::symbols::EPSILON
    } else {
        text
    }
}
