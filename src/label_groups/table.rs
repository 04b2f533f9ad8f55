//! In-memory lookup table of label groups.
//!
//! # Responsibilities
//! - Index a fetched collection by href (canonical) and by name (secondary)
//! - Serve read-only lookups during expansion
//!
//! # Design Decisions
//! - Built wholesale from one collection fetch, never mutated afterwards
//! - A group is only ever keyed under its own href; groups without one are
//!   skipped
//! - Names are not unique, so the name index maps to every matching href

use std::collections::HashMap;

use crate::api::types::Href;
use crate::label_groups::types::LabelGroup;

/// Read-only snapshot of every known label group.
#[derive(Debug, Clone, Default)]
pub struct LabelGroupTable {
    by_href: HashMap<Href, LabelGroup>,
    by_name: HashMap<String, Vec<Href>>,
}

impl LabelGroupTable {
    /// Build a table from a collection. A later group with the same href
    /// replaces an earlier one.
    pub fn new(groups: impl IntoIterator<Item = LabelGroup>) -> Self {
        let mut by_href = HashMap::new();
        for group in groups {
            match group.href.clone() {
                Some(href) if !href.is_empty() => {
                    by_href.insert(href, group);
                }
                _ => tracing::warn!(name = %group.name, "Skipping label group without href"),
            }
        }

        let mut by_name: HashMap<String, Vec<Href>> = HashMap::new();
        for (href, group) in &by_href {
            by_name.entry(group.name.clone()).or_default().push(href.clone());
        }
        for hrefs in by_name.values_mut() {
            hrefs.sort();
        }

        Self { by_href, by_name }
    }

    pub fn get(&self, href: &Href) -> Option<&LabelGroup> {
        self.by_href.get(href)
    }

    /// Every group carrying `name`, ordered by href.
    pub fn find_by_name<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a LabelGroup> + 'a {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|href| self.by_href.get(href))
    }

    /// The group carrying `name`, only if exactly one does.
    pub fn get_by_name(&self, name: &str) -> Option<&LabelGroup> {
        match self.by_name.get(name).map(Vec::as_slice) {
            Some([href]) => self.by_href.get(href),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelGroup> {
        self.by_href.values()
    }

    pub fn len(&self) -> usize {
        self.by_href.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_href.is_empty()
    }
}
