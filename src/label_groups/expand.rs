//! Label group expansion.
//!
//! Resolves a label group into the flat set of labels it covers, following
//! nested subgroups to any depth.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::api::types::Href;
use crate::label_groups::table::LabelGroupTable;

/// Expands label groups against one table snapshot.
pub struct LabelGroupExpander<'a> {
    table: &'a LabelGroupTable,
}

impl<'a> LabelGroupExpander<'a> {
    pub fn new(table: &'a LabelGroupTable) -> Self {
        Self { table }
    }

    /// Every label reachable from `root`, each exactly once.
    ///
    /// Unknown hrefs (the root or any subgroup) contribute nothing. Each
    /// group is expanded at most once, so reference cycles terminate.
    pub fn expand(&self, root: &Href) -> BTreeSet<Href> {
        let mut labels = BTreeSet::new();
        let mut visited: HashSet<&Href> = HashSet::new();
        let mut queue: VecDeque<&Href> = VecDeque::new();
        queue.push_back(root);

        while let Some(href) = queue.pop_front() {
            if !visited.insert(href) {
                continue;
            }
            let Some(group) = self.table.get(href) else {
                tracing::debug!(href = %href, "Label group not in lookup table");
                continue;
            };

            labels.extend(group.label_hrefs().cloned());
            queue.extend(group.subgroup_hrefs().filter(|sg| !visited.contains(sg)));
        }

        tracing::debug!(root = %root, groups = visited.len(), labels = labels.len(), "Expanded label group");
        labels
    }
}

impl LabelGroupTable {
    /// Shorthand for [`LabelGroupExpander::expand`] on this table.
    pub fn expand(&self, root: &Href) -> BTreeSet<Href> {
        LabelGroupExpander::new(self).expand(root)
    }
}
