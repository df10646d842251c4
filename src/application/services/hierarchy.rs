//! Hierarchy service
//!
//! Loads member records, builds the binary hierarchy and answers the queries
//! the command line exposes: walks, structural stats and placements.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::application::records::{load_records, MemberRecord, MemberTree, RecordFields};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    flatten, level_sort, BuildOptions, NodeId, Placement, Record, Side, TreeBuilder,
};

/// Walk order exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOrder {
    Pre,
    In,
    Post,
    Level,
}

/// A loaded hierarchy plus the records that could not be placed.
#[derive(Debug)]
pub struct Hierarchy {
    pub tree: MemberTree,
    pub orphans: Vec<MemberRecord>,
}

/// Structural summary of a subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub label: Option<String>,
    pub size: usize,
    pub depth: usize,
    pub height: usize,
    pub min_height: usize,
    pub full: bool,
    pub complete: bool,
    pub break_label: Option<String>,
}

/// Where a new member was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub id: i64,
    pub label: String,
    /// Parent label, None when the member became root
    pub parent: Option<String>,
    pub side: Option<Side>,
}

/// Service for building and querying member hierarchies.
pub struct HierarchyService {
    fields: RecordFields,
    builder: TreeBuilder<i64>,
}

impl HierarchyService {
    pub fn new(fields: RecordFields, options: BuildOptions<i64>) -> Self {
        Self {
            fields,
            builder: TreeBuilder::new(options),
        }
    }

    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    /// Load a records file and build its hierarchy.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Hierarchy> {
        let records = load_records(path, &self.fields)?;
        self.build(records)
    }

    /// Build a hierarchy from records already in memory.
    pub fn build(&self, records: Vec<MemberRecord>) -> ApplicationResult<Hierarchy> {
        let flattened = flatten(records, self.builder.options());
        let tree = self.builder.replay(flattened.entries)?;
        info!(
            orphans = flattened.orphans.len(),
            "built hierarchy with {} member(s)",
            tree.len()
        );
        Ok(Hierarchy {
            tree,
            orphans: flattened.orphans,
        })
    }

    /// Records of a file ordered breadth-first.
    pub fn level_sorted(&self, path: &Path) -> ApplicationResult<Vec<MemberRecord>> {
        let records = load_records(path, &self.fields)?;
        Ok(level_sort(
            records,
            &self.builder.options().starting_parent_id,
        ))
    }

    pub fn label(&self, tree: &MemberTree, idx: NodeId) -> Option<String> {
        tree.value(idx).map(|record| self.fields.label(record))
    }

    /// Node holding the record with `id`.
    pub fn node_by_id(&self, tree: &MemberTree, id: i64) -> ApplicationResult<NodeId> {
        tree.position(|record| record.id == id)
            .ok_or(ApplicationError::UnknownRecord(id))
    }

    /// Labels in walk order; level order reports empty slots as None.
    pub fn walk(&self, tree: &MemberTree, order: WalkOrder) -> Vec<Option<String>> {
        let label = |record: &MemberRecord| Some(self.fields.label(record));
        let root = tree.root();
        match order {
            WalkOrder::Pre => tree.iter_preorder(root).map(|(_, n)| label(&n.value)).collect(),
            WalkOrder::In => tree.iter_inorder(root).map(|(_, n)| label(&n.value)).collect(),
            WalkOrder::Post => tree.iter_postorder(root).map(|(_, n)| label(&n.value)).collect(),
            WalkOrder::Level => tree
                .iter_level_order(root)
                .map(|slot| slot.and_then(|(_, n)| label(&n.value)))
                .collect(),
        }
    }

    /// Structural stats of the subtree at `node` (the root when None).
    pub fn stats(&self, tree: &MemberTree, node: Option<NodeId>) -> TreeStats {
        let node = node.or(tree.root());
        let (complete, break_node) = tree.break_node(node);
        TreeStats {
            label: node.and_then(|idx| self.label(tree, idx)),
            size: tree.size(node),
            depth: tree.depth(node),
            height: tree.height(node),
            min_height: tree.min_height(node),
            full: tree.is_full(node),
            complete,
            break_label: break_node.and_then(|idx| self.label(tree, idx)),
        }
    }

    /// Insert new members one after another, each placed by `placement`.
    ///
    /// New ids continue after the largest id in the tree or among its orphans.
    #[instrument(level = "debug", skip(self, hierarchy))]
    pub fn insert_members(
        &self,
        hierarchy: &mut Hierarchy,
        labels: &[String],
        at: Option<NodeId>,
        placement: Placement,
    ) -> ApplicationResult<Vec<Insertion>> {
        let Hierarchy { tree, orphans } = hierarchy;
        let mut next_id = tree
            .iter_preorder(tree.root())
            .map(|(_, n)| n.value.id)
            .chain(orphans.iter().map(|record| record.id))
            .max()
            .map_or(1, |max| max + 1);
        let starting_parent_id = self.builder.options().starting_parent_id;

        let mut placed = Vec::with_capacity(labels.len());
        for label in labels {
            let id = next_id;
            let idx = tree.insert_with(at, placement, |parent: Option<&MemberRecord>| {
                let parent_id = parent.map_or(starting_parent_id, |p| p.id);
                Record::new(id, parent_id, self.fields.new_payload(id, parent_id, label))
            })?;
            next_id += 1;

            let parent = tree.parent(Some(idx));
            let insertion = Insertion {
                id,
                label: label.clone(),
                parent: parent.and_then(|p| self.label(tree, p)),
                side: tree.side_of(idx),
            };
            debug!(?insertion, %placement, "member placed");
            placed.push(insertion);
        }
        Ok(placed)
    }
}
