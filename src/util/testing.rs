//! Shared helpers for unit and integration tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::domain::{Definition, GroupMapping, Member};

static TEST_SETUP: Once = Once::new();

/// Install the global test subscriber once. Honours `RUST_LOG`, default `debug`.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
}

/// Mapping with one group per entry of `sizes`, named `type-<index>`.
pub fn mapping_with_sizes(sizes: &[usize]) -> GroupMapping {
    let mut mapping = GroupMapping::new();
    for (g, &size) in sizes.iter().enumerate() {
        let name = format!("type-{g}");
        let definition = Arc::new(Definition::named(name.clone()));
        for i in 0..size {
            mapping.push(&name, Member::new(format!("{g}-{i}"), Arc::clone(&definition)));
        }
    }
    mapping
}

/// JSON for a block instance node referencing definition `def_id` named `name`.
pub fn instance_json(id: &str, def_id: &str, name: &str) -> String {
    format!(
        r#"{{"id": "{id}", "speckle_type": "Objects.Other.BlockInstance", "definition": {{"id": "{def_id}", "name": "{name}"}}}}"#
    )
}

/// Scene JSON holding `count` instances of each `(definition name, count)` pair.
pub fn scene_json(groups: &[(&str, usize)]) -> String {
    let elements: Vec<String> = groups
        .iter()
        .enumerate()
        .flat_map(|(g, (name, count))| {
            (0..*count).map(move |i| instance_json(&format!("{g}-{i}"), &format!("def-{g}"), name))
        })
        .collect();
    format!(
        r#"{{"id": "root", "speckle_type": "Base", "elements": [{}]}}"#,
        elements.join(", ")
    )
}

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}
