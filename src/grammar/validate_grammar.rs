use std::collections::BTreeSet;

use anyhow::anyhow;
use beau_collector::BeauCollector;
use itertools::Itertools;

use super::description::{to_symbol, GrammarDescription};
use super::production::{Production, Right};
use super::symbols::{Symbol, SymbolSet};
use super::GrammarError;

type ValidateResult = Result<(), GrammarError>;

struct Draft<'g> {
    symbols: &'g SymbolSet,
    productions: &'g [Production],
    start: Symbol,
}

/// Runs the construction checks in order and stops at the first failure.
pub(super) fn validate_grammar(
    symbols: &SymbolSet,
    productions: &[Production],
    start: Symbol,
) -> ValidateResult {
    let draft = Draft {
        symbols,
        productions,
        start,
    };
    let checks = [find_start, resolve_symbols];

    checks.into_iter().try_for_each(|check| check(&draft))
}

fn find_start(draft: &Draft) -> ValidateResult {
    if draft.symbols.is_nonterminal(draft.start) {
        Ok(())
    } else {
        Err(GrammarError::InvalidStartSymbol(draft.start.to_string()))
    }
}

fn resolve_symbols(draft: &Draft) -> ValidateResult {
    draft
        .productions
        .iter()
        .try_for_each(|production| production.validate_symbols(draft.symbols))
}

/// Collects every problem in a description instead of stopping at the first one.
pub fn report_problems(description: &GrammarDescription) -> Result<(), anyhow::Error> {
    let mut problems: Vec<GrammarError> = vec![];

    let mut declared = |texts: &[String]| {
        texts
            .iter()
            .filter_map(|text| to_symbol(text).map_err(|e| problems.push(e)).ok())
            .collect::<BTreeSet<Symbol>>()
    };
    let nonterminals = declared(&description.nonterminals);
    let terminals = declared(&description.terminals);

    let symbols = SymbolSet::new(nonterminals, terminals).map_err(|e| problems.push(e)).ok();

    let start = to_symbol(&description.start_symbol).ok();
    let start_is_nonterminal = match (&symbols, start) {
        (Some(symbols), Some(start)) => symbols.is_nonterminal(start),
        _ => false,
    };
    if !start_is_nonterminal {
        problems.push(GrammarError::InvalidStartSymbol(
            description.start_symbol.clone(),
        ));
    }

    for (left, rights) in &description.productions {
        if let Err(e) = Production::new(left, rights.iter().map(|r| Right::parse(r))) {
            problems.push(e);
        }
    }

    if let Some(symbols) = &symbols {
        let texts = description
            .productions
            .iter()
            .flat_map(|(left, rights)| std::iter::once(left).chain(rights.iter()))
            .map(|text| Right::parse(text));

        let undeclared = texts
            .flat_map(|right| {
                let text = right.as_str().to_string();
                right
                    .as_str()
                    .chars()
                    .filter(|c| !symbols.is_declared(*c))
                    .map(move |symbol| (symbol, text.clone()))
                    .collect_vec()
            })
            .unique_by(|(symbol, _)| *symbol);

        problems.extend(
            undeclared.map(|(symbol, context)| GrammarError::UndeclaredSymbol { symbol, context }),
        );
    }

    problems
        .into_iter()
        .map(|e| Err::<(), anyhow::Error>(anyhow!(e)))
        .bcollect::<Vec<_>>()?;

    Ok(())
}
