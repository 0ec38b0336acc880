//! Shared helpers for transbeam-search integration tests.

#![allow(dead_code)]

use transbeam_test::{sentence, ArcGraph, Sentence};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber honoring `RUST_LOG`. Safe to call
/// from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const NSUBJ: usize = 0;
pub const OBJ: usize = 1;
pub const ROOT: usize = 2;
pub const DET: usize = 3;
pub const RELATIONS: usize = 4;

/// Small projective treebank.
pub fn treebank() -> Vec<(Sentence, ArcGraph)> {
    vec![
        (
            sentence(&[("dogs", "NNS"), ("chase", "VBP"), ("cats", "NNS")]),
            ArcGraph::new()
                .with_arc(2, 1, NSUBJ)
                .with_arc(2, 3, OBJ)
                .with_arc(0, 2, ROOT),
        ),
        (
            sentence(&[("the", "DT"), ("dog", "NN"), ("barks", "VBZ")]),
            ArcGraph::new()
                .with_arc(2, 1, DET)
                .with_arc(3, 2, NSUBJ)
                .with_arc(0, 3, ROOT),
        ),
        (
            sentence(&[
                ("the", "DT"),
                ("cat", "NN"),
                ("sees", "VBZ"),
                ("the", "DT"),
                ("bird", "NN"),
            ]),
            ArcGraph::new()
                .with_arc(2, 1, DET)
                .with_arc(3, 2, NSUBJ)
                .with_arc(5, 4, DET)
                .with_arc(3, 5, OBJ)
                .with_arc(0, 3, ROOT),
        ),
    ]
}

/// A longer sentence for search-only tests.
pub fn long_sentence() -> Sentence {
    sentence(&[
        ("a", "DT"),
        ("quick", "JJ"),
        ("brown", "JJ"),
        ("fox", "NN"),
        ("jumps", "VBZ"),
        ("over", "IN"),
        ("the", "DT"),
        ("lazy", "JJ"),
        ("dog", "NN"),
    ])
}
