// Saving and loading grammars through the filesystem

use std::fs;

use chomsky::grammar::{ChomskyType, Grammar};
use chomsky::persistence::{load_grammar, read_description, save_grammar, PersistenceError};
use tempfile::TempDir;

fn sample() -> Grammar {
    Grammar::from_rules(
        "SAB",
        "ab",
        &[("S", &["AB", "ε"]), ("B", &["b"]), ("A", &["aA", "a"])],
        'S',
    )
    .unwrap()
}

#[test]
fn save_then_load_reproduces_grammar() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grammar.json");

    let original = sample();
    save_grammar(&original, &path).unwrap();
    let loaded = load_grammar(&path).unwrap();

    assert_eq!(loaded, original);
    assert_eq!(loaded.chomsky_type(), ChomskyType::ContextFree);
    assert_eq!(
        loaded.productions().iter().map(|p| p.left()).collect::<Vec<_>>(),
        vec!["S", "B", "A"]
    );
}

#[test]
fn text_and_json_descriptions_agree() {
    let dir = TempDir::new().unwrap();
    let text_path = dir.path().join("grammar.txt");
    fs::write(
        &text_path,
        "N = { S, A, B }\nT = { a, b }\nstart = S\nS -> AB | ε ;\nB -> b ;\nA -> aA | a ;\n",
    )
    .unwrap();

    let from_text = read_description(&text_path).unwrap().build().unwrap();
    assert_eq!(from_text, sample());

    let json_path = dir.path().join("grammar.json");
    save_grammar(&from_text, &json_path).unwrap();
    let from_json = read_description(&json_path).unwrap();
    assert_eq!(from_json.chomsky_type, Some(2));
    assert_eq!(from_json.build().unwrap(), from_text);
}

#[test]
fn tampered_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grammar.json");
    save_grammar(&sample(), &path).unwrap();

    let content = fs::read_to_string(&path).unwrap().replace("\"b\"", "\"S\"");
    fs::write(&path, content).unwrap();

    assert!(matches!(load_grammar(&path), Err(PersistenceError::Grammar(_))));
}

#[test]
fn unreadable_description_has_context() {
    let err = read_description("/nonexistent/grammar.txt").unwrap_err();
    assert!(format!("{err:#}").contains("failed to read"));
}
