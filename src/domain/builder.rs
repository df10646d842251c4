//! Flat-to-tree construction from parent-referencing records.
//!
//! Building happens in two phases. `flatten` orders the records in preorder of
//! the parent/child graph, tagging each with its nesting level and direct child
//! count. `replay` then walks that sequence with the tree cursor: records with
//! children become the new cursor, leaves do not, and the cursor climbs when the
//! next record is shallower.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt::Debug;

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::domain::arena::Tree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::{AscendMode, BuildOptions, Record};

/// A record in flattened (preorder) position.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry<K, T> {
    pub record: Record<K, T>,
    /// Nesting depth below the starting parent, 0 for top-level records
    pub level: usize,
    /// Number of records naming this one as parent
    pub children: usize,
}

/// Result of flattening: the ordered entries plus records no walk reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened<K, T> {
    pub entries: Vec<FlatEntry<K, T>>,
    pub orphans: Vec<Record<K, T>>,
}

/// Groups record positions by parent id, keeping the given order inside a group.
fn children_by_parent<K: Ord + Clone, T>(records: &[Record<K, T>]) -> BTreeMap<K, Vec<usize>> {
    let mut by_parent: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (pos, record) in records.iter().enumerate() {
        by_parent
            .entry(record.parent_id.clone())
            .or_default()
            .push(pos);
    }
    by_parent
}

/// Orders `records` in preorder starting below `options.starting_parent_id`.
///
/// Records whose parent chain never reaches the starting parent are returned
/// as orphans and logged.
#[instrument(level = "debug", skip(records), fields(count = records.len()))]
pub fn flatten<K, T>(mut records: Vec<Record<K, T>>, options: &BuildOptions<K>) -> Flattened<K, T>
where
    K: Ord + Clone + Debug,
{
    if options.sort_first {
        records.sort_by(|a, b| a.id.cmp(&b.id));
    }
    let by_parent = children_by_parent(&records);

    let mut order: Vec<(usize, usize)> = Vec::with_capacity(records.len());
    let mut visited: HashSet<usize> = HashSet::new();
    let mut stack: Vec<(usize, usize)> = Vec::new();
    if let Some(top) = by_parent.get(&options.starting_parent_id) {
        stack.extend(top.iter().rev().map(|&pos| (pos, 0)));
    }

    while let Some((pos, level)) = stack.pop() {
        if !visited.insert(pos) {
            warn!(id = ?records[pos].id, "record reached twice, skipping");
            continue;
        }
        order.push((pos, level));
        if let Some(children) = by_parent.get(&records[pos].id) {
            stack.extend(
                children
                    .iter()
                    .rev()
                    .filter(|&&child| !visited.contains(&child))
                    .map(|&child| (child, level + 1)),
            );
        }
    }

    // direct children counted among the reachable records only
    let mut child_counts: BTreeMap<K, usize> = BTreeMap::new();
    for &(pos, _) in &order {
        *child_counts.entry(records[pos].parent_id.clone()).or_default() += 1;
    }

    let mut slots: Vec<Option<Record<K, T>>> = records.into_iter().map(Some).collect();
    let entries: Vec<FlatEntry<K, T>> = order
        .into_iter()
        .filter_map(|(pos, level)| {
            let record = slots[pos].take()?;
            let children = child_counts.get(&record.id).copied().unwrap_or(0);
            Some(FlatEntry {
                record,
                level,
                children,
            })
        })
        .collect();

    let orphans: Vec<Record<K, T>> = slots.into_iter().flatten().collect();
    for orphan in &orphans {
        warn!(id = ?orphan.id, parent = ?orphan.parent_id, "unreachable record dropped");
    }
    debug!(entries = entries.len(), orphans = orphans.len(), "flattened");

    Flattened { entries, orphans }
}

/// Orders records breadth-first below `starting_parent_id`, siblings ascending by id.
///
/// Unreachable records are left out.
#[instrument(level = "debug", skip(records), fields(count = records.len()))]
pub fn level_sort<K, T>(records: Vec<Record<K, T>>, starting_parent_id: &K) -> Vec<Record<K, T>>
where
    K: Ord + Clone + Debug,
{
    let by_parent = children_by_parent(&records);
    let mut visited: HashSet<usize> = HashSet::new();
    let mut order = Vec::with_capacity(records.len());
    let mut parents = VecDeque::from([starting_parent_id.clone()]);

    while let Some(parent) = parents.pop_front() {
        let Some(children) = by_parent.get(&parent) else {
            continue;
        };
        for &pos in children
            .iter()
            .sorted_by(|a, b| records[**a].id.cmp(&records[**b].id))
        {
            if visited.insert(pos) {
                order.push(pos);
                parents.push_back(records[pos].id.clone());
            }
        }
    }

    let mut slots: Vec<Option<Record<K, T>>> = records.into_iter().map(Some).collect();
    order.into_iter().filter_map(|pos| slots[pos].take()).collect()
}

/// Builds binary trees from flat records.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder<K> {
    options: BuildOptions<K>,
}

impl<K> TreeBuilder<K>
where
    K: Ord + Clone + Debug,
{
    pub fn new(options: BuildOptions<K>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions<K> {
        &self.options
    }

    /// Flattens and replays `records`. Empty input yields an empty tree.
    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub fn build<T>(&self, records: Vec<Record<K, T>>) -> DomainResult<Tree<Record<K, T>>> {
        let flattened = flatten(records, &self.options);
        self.replay(flattened.entries)
    }

    /// Replays flattened entries through the tree cursor.
    #[instrument(level = "debug", skip(self, entries), fields(count = entries.len()))]
    pub fn replay<T>(&self, entries: Vec<FlatEntry<K, T>>) -> DomainResult<Tree<Record<K, T>>> {
        let mut tree = Tree::new();
        let levels: Vec<usize> = entries.iter().map(|e| e.level).collect();

        for (k, entry) in entries.into_iter().enumerate() {
            let FlatEntry {
                record,
                level,
                children,
            } = entry;
            let id = record.id.clone();

            if k == 0 {
                tree.branch(record)?;
                continue;
            }

            let attached = if children > 0 {
                tree.branch(record)
            } else {
                tree.leaf(record)
            };
            attached.map_err(|e| match e {
                DomainError::StructuralOverflow(_) => DomainError::RecordOverflow {
                    record: format!("{:?}", id),
                },
                other => other,
            })?;

            match levels.get(k + 1) {
                None => {
                    tree.end();
                }
                Some(&next) if next < level => self.ascend(&mut tree, next),
                Some(_) => {}
            }
        }
        tree.reset_cursor();
        Ok(tree)
    }

    fn ascend<T>(&self, tree: &mut Tree<T>, next_level: usize) {
        match self.options.ascend {
            AscendMode::Single => {
                tree.end();
            }
            AscendMode::ToLevel => {
                // cursor at depth d holds children of level d
                while tree.depth(tree.current()) > next_level.max(1) {
                    tree.end();
                }
            }
        }
    }
}
