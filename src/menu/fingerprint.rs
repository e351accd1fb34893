//! # Change Detection
//!
//! Recomputing the tree is cheap and happens on every snapshot. Rebuilding a
//! native menu is not: it flickers and closes open submenus. The
//! [`ChangeDetector`] sits between the two and only lets a tree through when
//! its observable structure differs from the last one applied.
//!
//! A [`Fingerprint`] is the tree with the handlers stripped: ids, labels,
//! flags, accelerators and nesting, in order. Two trees that render the same
//! have equal fingerprints whatever closures they carry.

use serde::Serialize;

use crate::menu::node::MenuNode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalNode {
    Leaf {
        id: String,
        label: String,
        enabled: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        accelerator: Option<String>,
    },
    Submenu {
        id: String,
        label: String,
        children: Vec<CanonicalNode>,
    },
    Separator,
}

impl From<&MenuNode> for CanonicalNode {
    fn from(node: &MenuNode) -> Self {
        match node {
            MenuNode::Leaf(leaf) => CanonicalNode::Leaf {
                id: leaf.id.clone(),
                label: leaf.label.clone(),
                enabled: leaf.enabled,
                checked: leaf.checked,
                accelerator: leaf.accelerator.clone(),
            },
            MenuNode::Submenu(submenu) => CanonicalNode::Submenu {
                id: submenu.id.clone(),
                label: submenu.label.clone(),
                children: submenu.children.iter().map(CanonicalNode::from).collect(),
            },
            MenuNode::Separator => CanonicalNode::Separator,
        }
    }
}

/// Canonical, callback-free form of a composed tree, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(CanonicalNode);

impl Fingerprint {
    pub fn of(tree: &MenuNode) -> Self {
        Self(CanonicalNode::from(tree))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Owns the last applied fingerprint. Nothing else reads or writes it.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_applied: Option<Fingerprint>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `candidate` differs from the last applied tree, in which case
    /// it becomes the last applied tree.
    pub fn should_apply(&mut self, candidate: &MenuNode) -> bool {
        let fingerprint = Fingerprint::of(candidate);
        if self.last_applied.as_ref() == Some(&fingerprint) {
            return false;
        }
        self.last_applied = Some(fingerprint);
        true
    }
}
