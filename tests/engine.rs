// End-to-end checks of the grammar engine through its public API

use chomsky::configuration::SearchBudget;
use chomsky::grammar::{
    ChomskyType, Grammar, GrammarDescription, GrammarError, LinearStyle, Trace,
};

fn balanced() -> Grammar {
    Grammar::from_rules("S", "ab", &[("S", &["aSb", "ε"])], 'S').unwrap()
}

fn right_linear() -> Grammar {
    Grammar::from_rules("SA", "ab", &[("S", &["aA"]), ("A", &["b"])], 'S').unwrap()
}

fn left_linear() -> Grammar {
    Grammar::from_rules("SA", "ab", &[("S", &["Ab"]), ("A", &["a", "Aa"])], 'S').unwrap()
}

fn kleene() -> Grammar {
    Grammar::from_rules("S", "a", &[("S", &["aS", "ε"])], 'S').unwrap()
}

fn anbncn() -> Grammar {
    Grammar::from_rules(
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
        'S',
    )
    .unwrap()
}

#[test]
fn balanced_brackets_example() {
    let g = balanced();
    assert_eq!(g.chomsky_type(), ChomskyType::ContextFree);
    assert_eq!(g.style(), None);

    assert!(g.parse("aabb").accepted);
    assert!(!g.parse("aba").accepted);
    assert_eq!(g.generate_strings(3), vec!["ε", "ab", "aabb"]);
}

#[test]
fn right_linear_example() {
    let g = right_linear();
    assert_eq!(g.chomsky_type(), ChomskyType::Regular);
    assert_eq!(g.style(), Some(LinearStyle::Right));

    assert!(g.parse("ab").accepted);
    assert!(!g.parse("a").accepted);
    assert!(!g.parse("abb").accepted);
}

#[test]
fn budget_exhaustion_reads_as_rejection() {
    let g = Grammar::from_rules("SA", "a", &[("S", &["AA"]), ("A", &["a"])], 'S').unwrap();
    assert!(g.parse("aa").accepted);

    let starved = SearchBudget::default().with_step_limit(1);
    assert!(!g.parse_with("aa", &starved).accepted);
}

#[test]
fn construction_failures() {
    assert!(matches!(
        Grammar::from_rules("Sa", "a", &[("S", &["a"])], 'S'),
        Err(GrammarError::InvalidSymbolSet(_))
    ));
    assert!(matches!(
        Grammar::from_rules("S", "a", &[("S", &["a"])], 'T'),
        Err(GrammarError::InvalidStartSymbol(_))
    ));
}

#[test]
fn classification_is_deterministic() {
    let text = "N = { S, A }\nT = { a, b }\nstart = S\nS -> Ab ;\nA -> a | Aa ;\n";
    let first = GrammarDescription::from_text(text).unwrap().build().unwrap();
    let second = GrammarDescription::from_text(text).unwrap().build().unwrap();

    assert_eq!(first.classify(), second.classify());
    assert_eq!(first.style(), Some(LinearStyle::Left));
}

#[test]
fn regular_grammars_are_context_free_shaped() {
    for g in [right_linear(), left_linear(), kleene()] {
        assert_eq!(g.chomsky_type(), ChomskyType::Regular);
        assert!(g
            .productions()
            .iter()
            .all(|p| p.is_type2_compliant(g.symbols())));
    }
}

#[test]
fn generated_words_are_accepted() {
    for g in [balanced(), right_linear(), left_linear(), kleene()] {
        let words = g.generate_strings(5);
        assert!(!words.is_empty());
        for word in words {
            assert!(g.parse(&word).accepted, "`{word}` rejected by {}", g.chomsky_type());
        }
    }

    let g = anbncn();
    let words = g.generate_strings(5);
    assert_eq!(
        words,
        vec!["abc", "aabbcc", "aaabbbccc", "aaaabbbbcccc", "aaaaabbbbbccccc"]
    );
    for word in words {
        assert!(g.parse(&word).accepted, "`{word}` rejected");
    }
}

#[test]
fn each_strategy_reports_its_trace_shape() {
    assert!(matches!(
        right_linear().parse("ab").trace,
        Some(Trace::Derivation(_))
    ));
    assert!(matches!(balanced().parse("ab").trace, Some(Trace::Chart(_))));
    assert!(matches!(anbncn().parse("abc").trace, Some(Trace::Derivation(_))));
}

#[test]
fn rendered_trace_for_context_free_parse() {
    let g = balanced();
    let text = g.render_trace(&g.parse("ab"));

    assert!(text.starts_with("ACCEPTED"), "{text}");
    assert!(text.contains("S → aSb •  [0, 2]"), "{text}");
    assert!(text.contains("1. S → aSb  [0..2]"), "{text}");
}

#[test]
fn epsilon_input_means_empty_word() {
    let g = balanced();
    assert!(g.parse("ε").accepted);
    assert!(!right_linear().parse("ε").accepted);
}
