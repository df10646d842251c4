//! Shared test setup: logging and sample hierarchies.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{NodeId, Placement, Record, Tree};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    // RUST_LOG wins; otherwise keep test output readable at debug
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
    debug!(rust_log = ?env::var("RUST_LOG").ok(), "test logging ready");
}

/// The eight-member sample hierarchy used throughout the tests.
///
/// ```text
/// A
/// ├── B
/// └── C
///     ├── D
///     │   ├── G
///     │   └── H
///     └── E
///         └── F
/// ```
pub fn sample_records() -> Vec<Record<i64, &'static str>> {
    vec![
        Record::new(1, 0, "A"),
        Record::new(2, 1, "B"),
        Record::new(3, 1, "C"),
        Record::new(4, 3, "D"),
        Record::new(5, 3, "E"),
        Record::new(6, 5, "F"),
        Record::new(7, 4, "G"),
        Record::new(8, 4, "H"),
    ]
}

/// Tree grown from nothing by `count` insertions under `placement`; values are 1..=count.
pub fn grown_tree(count: usize, placement: Placement) -> Tree<usize> {
    let mut tree = Tree::new();
    for value in 1..=count {
        tree.insert(value, None, placement)
            .unwrap_or_else(|e| panic!("insert {} failed: {}", value, e));
    }
    tree
}

/// Value of a node's left/right child, for compact structural assertions.
pub fn child_values<T: Clone>(tree: &Tree<T>, idx: NodeId) -> (Option<T>, Option<T>) {
    let value = |child: Option<NodeId>| child.and_then(|c| tree.value(c)).cloned();
    (value(tree.left(Some(idx))), value(tree.right(Some(idx))))
}
