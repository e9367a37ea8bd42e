use std::cell::RefCell;
use std::collections::HashSet;

use rusqlite::Connection;

use super::run::run_embed;
use super::types::EmbedOptions;
use crate::embedder::Embedder;
use crate::store::{count_pending, embedding_of, test_connection};

/// Returns a fixed vector for every prompt except those listed as failing.
struct ScriptedEmbedder {
    vector: Vec<f64>,
    failing_prompts: HashSet<String>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedEmbedder {
    fn always(vector: Vec<f64>) -> Self {
        Self {
            vector,
            failing_prompts: HashSet::new(),
            prompts: RefCell::new(Vec::new()),
        }
    }

    fn failing_on(vector: Vec<f64>, prompts: &[&str]) -> Self {
        Self {
            vector,
            failing_prompts: prompts.iter().map(|value| value.to_string()).collect(),
            prompts: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Embedder for ScriptedEmbedder {
    fn embed(&self, text: &str) -> Option<Vec<f64>> {
        self.prompts.borrow_mut().push(text.to_string());
        if self.failing_prompts.contains(text) {
            None
        } else {
            Some(self.vector.clone())
        }
    }
}

fn library() -> Connection {
    test_connection(&[
        (3, Some("Trzeci"), None, Some("<p>treść   trzecia</p>"), None),
        (1, Some("Pierwszy"), Some("Podtytuł"), None, None),
        (2, Some("Drugi"), None, None, Some("[9,9]")),
    ])
}

fn console(output: Vec<u8>) -> String {
    String::from_utf8(output).expect("console output should be utf-8")
}

#[test]
fn run_embed_stores_vectors_for_pending_rows_in_id_order() {
    let mut connection = library();
    let embedder = ScriptedEmbedder::always(vec![0.1, 0.2, 0.3]);
    let mut out = Vec::<u8>::new();

    let summary = run_embed(&mut connection, &embedder, &EmbedOptions::default(), &mut out)
        .expect("run should succeed");

    assert_eq!(summary.total, 2);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.errors, 0);
    assert_eq!(
        embedder.calls(),
        vec!["Pierwszy. Podtytuł".to_string(), "Trzeci. treść trzecia".to_string()]
    );
    assert_eq!(embedding_of(&connection, 1).as_deref(), Some("[0.1,0.2,0.3]"));
    assert_eq!(embedding_of(&connection, 3).as_deref(), Some("[0.1,0.2,0.3]"));
    assert_eq!(embedding_of(&connection, 2).as_deref(), Some("[9,9]"));

    let text = console(out);
    assert!(text.starts_with("Dokumentów do przetworzenia: 2\n"));
    assert!(text.contains("\r  2/2 [100.0%]"));
    assert!(text.contains("Gotowe: 2/2\n"));
    assert!(!text.contains("błędy"));
}

#[test]
fn run_embed_with_force_reprocesses_embedded_rows() {
    let mut connection = library();
    let embedder = ScriptedEmbedder::always(vec![0.5]);
    let options = EmbedOptions {
        force: true,
        ..EmbedOptions::default()
    };
    let mut out = Vec::<u8>::new();

    let summary =
        run_embed(&mut connection, &embedder, &options, &mut out).expect("run should succeed");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.processed, 3);
    assert_eq!(embedder.calls().len(), 3);
    assert_eq!(embedder.calls()[1], "Drugi");
    assert_eq!(embedding_of(&connection, 2).as_deref(), Some("[0.5]"));
}

#[test]
fn run_embed_skips_failed_rows_and_keeps_going() {
    let mut connection = library();
    let embedder = ScriptedEmbedder::failing_on(vec![0.25], &["Pierwszy. Podtytuł"]);
    let mut out = Vec::<u8>::new();

    let summary = run_embed(&mut connection, &embedder, &EmbedOptions::default(), &mut out)
        .expect("row failures should not abort the run");

    assert_eq!(summary.total, 2);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(embedder.calls().len(), 2);
    assert_eq!(embedding_of(&connection, 1), None);
    assert_eq!(embedding_of(&connection, 3).as_deref(), Some("[0.25]"));

    let text = console(out);
    assert!(text.contains("Błąd: ID=1"));
    assert!(text.contains("Gotowe: 1/2 (błędy: 1)"));
}

#[test]
fn run_embed_with_nothing_pending_issues_no_requests() {
    let mut connection = test_connection(&[(1, Some("A"), None, None, Some("[1]"))]);
    let embedder = ScriptedEmbedder::always(vec![0.0]);
    let mut out = Vec::<u8>::new();

    let summary = run_embed(&mut connection, &embedder, &EmbedOptions::default(), &mut out)
        .expect("run should succeed");

    assert_eq!(summary.total, 0);
    assert_eq!(summary.processed, 0);
    assert!(embedder.calls().is_empty());
    assert_eq!(embedding_of(&connection, 1).as_deref(), Some("[1]"));
    assert!(console(out).starts_with("Wszystkie dokumenty mają już embeddingi."));
}

#[test]
fn second_run_without_force_has_nothing_to_do() {
    let mut connection = library();
    let embedder = ScriptedEmbedder::always(vec![0.1, 0.2]);

    let first = run_embed(
        &mut connection,
        &embedder,
        &EmbedOptions::default(),
        &mut Vec::<u8>::new(),
    )
    .expect("first run should succeed");
    assert_eq!(first.processed, 2);
    assert_eq!(count_pending(&connection, false).expect("count"), 0);

    let second = run_embed(
        &mut connection,
        &embedder,
        &EmbedOptions::default(),
        &mut Vec::<u8>::new(),
    )
    .expect("second run should succeed");
    assert_eq!(second.total, 0);
    assert_eq!(second.processed, 0);
    assert_eq!(embedder.calls().len(), 2);
}

#[test]
fn run_embed_truncates_prompt_to_configured_limit() {
    let mut connection = test_connection(&[(1, Some("abcdefgh"), None, None, None)]);
    let embedder = ScriptedEmbedder::always(vec![1.0]);
    let options = EmbedOptions {
        force: false,
        max_chars: 4,
    };

    run_embed(&mut connection, &embedder, &options, &mut Vec::<u8>::new())
        .expect("run should succeed");

    assert_eq!(embedder.calls(), vec!["abcd".to_string()]);
}

#[test]
fn run_embed_fails_fast_without_documents_table() {
    let mut connection = Connection::open_in_memory().expect("in-memory DB should open");
    let embedder = ScriptedEmbedder::always(vec![1.0]);

    let result = run_embed(
        &mut connection,
        &embedder,
        &EmbedOptions::default(),
        &mut Vec::<u8>::new(),
    );

    assert!(result.is_err());
    assert!(embedder.calls().is_empty());
}
