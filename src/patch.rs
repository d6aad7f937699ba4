//! Deletion-aware deep merge of configuration trees.
//!
//! A [`Patch`] first removes every deletion path from a copy of the target,
//! then merges each entry into that copy:
//!
//! - table + table: union of keys, merging recursively on shared keys
//! - array + array: the overlay's items are appended to the base
//! - anything else: the overlay replaces the base
//!
//! The target passed to [`Patch::apply`] is never modified, so a failed patch
//! leaves no trace.

use crate::error::{ConfigError, Result};
use crate::path::DottedPath;
use toml::{Table, Value};

/// A replacement subtree merged at `path`
#[derive(Debug, Clone, PartialEq)]
pub struct PatchEntry {
    pub path: DottedPath,
    pub value: Value,
}

/// Deletions followed by deep-merge insertions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    deletions: Vec<DottedPath>,
    entries: Vec<PatchEntry>,
}

impl Patch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `path` before any entry is merged
    #[must_use]
    pub fn delete(mut self, path: DottedPath) -> Self {
        self.deletions.push(path);
        self
    }

    /// Merge `value` into the node at `path`
    #[must_use]
    pub fn add(mut self, path: DottedPath, value: Value) -> Self {
        self.entries.push(PatchEntry { path, value });
        self
    }

    #[must_use]
    pub fn deletions(&self) -> &[DottedPath] {
        &self.deletions
    }

    #[must_use]
    pub fn entries(&self) -> &[PatchEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.entries.is_empty()
    }

    /// Apply this patch to a copy of `target` and return the result.
    ///
    /// Deletions always run before insertions, in the order they were added.
    pub fn apply(&self, target: &Value) -> Result<Value> {
        let mut working = target.clone();

        for path in &self.deletions {
            if remove_path(&mut working, path)?.is_some() {
                tracing::debug!("Deleted {path}");
            } else {
                tracing::trace!("Nothing to delete at {path}");
            }
        }

        for entry in &self.entries {
            working = insert_at(working, &entry.path, 0, entry.value.clone())?;
            tracing::debug!("Merged {} into {}", entry.value.type_str(), entry.path);
        }

        Ok(working)
    }
}

/// Deep-merge `overlay` into `base`.
pub fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Table(base), Value::Table(overlay)) => Value::Table(merge_tables(base, overlay)),
        (Value::Array(mut base), Value::Array(overlay)) => {
            base.extend(overlay);
            Value::Array(base)
        }
        (_, overlay) => overlay,
    }
}

fn merge_tables(mut base: Table, overlay: Table) -> Table {
    for (key, overlay_val) in overlay {
        let merged = match base.remove(&key) {
            Some(base_val) => merge(base_val, overlay_val),
            None => overlay_val,
        };
        base.insert(key, merged);
    }
    base
}

/// Remove the node at `path`, returning it if it existed.
///
/// A missing key anywhere along the way is not an error. Walking through an
/// existing node that is not a table is.
fn remove_path(root: &mut Value, path: &DottedPath) -> Result<Option<Value>> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(ConfigError::Patch(
            "cannot delete the root of the tree".to_string(),
        ));
    };

    let mut node = root;
    for (depth, segment) in parents.iter().enumerate() {
        node = match node {
            Value::Table(table) => match table.get_mut(segment) {
                Some(child) => child,
                None => return Ok(None),
            },
            other => return Err(not_a_table("delete", path, depth, other)),
        };
    }

    match node {
        Value::Table(table) => Ok(table.remove(last)),
        other => Err(not_a_table("delete", path, parents.len(), other)),
    }
}

/// Merge `overlay` at `path` below `node`, creating missing tables on the way.
fn insert_at(node: Value, path: &DottedPath, depth: usize, overlay: Value) -> Result<Value> {
    let Some(segment) = path.segments().get(depth) else {
        return Ok(merge(node, overlay));
    };

    let mut table = match node {
        Value::Table(table) => table,
        other => return Err(not_a_table("merge into", path, depth, &other)),
    };

    let child = table
        .remove(segment)
        .unwrap_or_else(|| Value::Table(Table::new()));
    table.insert(segment.clone(), insert_at(child, path, depth + 1, overlay)?);

    Ok(Value::Table(table))
}

fn not_a_table(action: &str, path: &DottedPath, depth: usize, found: &Value) -> ConfigError {
    ConfigError::Patch(format!(
        "cannot {action} `{path}`: `{}` is {} {}, not a table",
        path.prefix(depth),
        article(found.type_str()),
        found.type_str()
    ))
}

fn article(kind: &str) -> &'static str {
    if kind.starts_with(['a', 'e', 'i', 'o', 'u']) {
        "an"
    } else {
        "a"
    }
}
