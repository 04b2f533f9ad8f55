//! Label group resource types.

use serde::{Deserialize, Serialize};

use crate::api::types::Href;

/// A named collection of labels and nested label groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<Href>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Label dimension the group belongs to. Immutable once created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Directly contained labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<LabelRef>>,

    /// Directly contained label groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_groups: Option<Vec<SubGroup>>,

    /// Server-computed; never sent on create or update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_data_reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_data_set: Option<String>,
}

impl LabelGroup {
    /// Hrefs of the directly contained labels, in server order.
    pub fn label_hrefs(&self) -> impl Iterator<Item = &Href> {
        self.labels.iter().flatten().map(|l| &l.href)
    }

    /// Hrefs of the directly contained label groups, in server order.
    pub fn subgroup_hrefs(&self) -> impl Iterator<Item = &Href> {
        self.sub_groups.iter().flatten().map(|sg| &sg.href)
    }

    /// Copy with the fields the server refuses on PUT removed.
    pub fn for_update(&self) -> Self {
        Self {
            usage: None,
            key: None,
            ..self.clone()
        }
    }
}

/// Reference to a label inside a label group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRef {
    pub href: Href,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl LabelRef {
    pub fn new(href: impl Into<Href>) -> Self {
        Self {
            href: href.into(),
            key: None,
            value: None,
        }
    }
}

/// Reference to a nested label group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubGroup {
    pub href: Href,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SubGroup {
    pub fn new(href: impl Into<Href>) -> Self {
        Self {
            href: href.into(),
            name: None,
        }
    }
}

/// Where a label group is referenced from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub label_group: bool,
    #[serde(default)]
    pub rule: bool,
    #[serde(default)]
    pub ruleset: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_policy_scopes: Option<bool>,
}
