//! # Composition
//!
//! Derivations return [`Fragment`]s: a top-level submenu whose children come
//! in predicate-tagged [`Block`]s. The composer resolves every block against
//! the host [`Capabilities`] once per pass, then concatenates the fragments
//! in their declared order under one root.
//!
//! ```text
//! Fragment(appMenu)    Fragment(viewMenu)    Fragment(windowMenu)
//!   [always]             [always]              [mac ∧ add-servers]
//!   [¬mac ∧ add-servers] [¬mac]                [always]
//!   ...                  [mac]                 ...
//!          │                   │                     │
//!          └──── compose(fragments, capabilities) ───┘
//!                              │
//!                   MenuNode::Submenu("menuBar")
//! ```
//!
//! Platform checks live here, as data, instead of being scattered through
//! the derivations. A block whose predicate fails contributes nothing: no
//! items, no separators, nothing in the fingerprint.

use std::collections::HashSet;
use std::fmt;

use crate::core::state::{Platform, StateSnapshot};
use crate::menu::node::{MenuNode, Submenu};

/// Id of the composed root node.
pub const ROOT_ID: &str = "menuBar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    AddNewServers,
}

/// The flags block predicates are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub platform: Platform,
    pub add_new_servers: bool,
}

impl Capabilities {
    pub fn of(snapshot: &StateSnapshot) -> Self {
        Self {
            platform: snapshot.platform,
            add_new_servers: snapshot.is_add_new_servers_enabled,
        }
    }

    pub fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::AddNewServers => self.add_new_servers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    On(Platform),
    NotOn(Platform),
    Enabled(Feature),
}

impl Condition {
    fn holds(self, caps: &Capabilities) -> bool {
        match self {
            Condition::On(platform) => caps.platform == platform,
            Condition::NotOn(platform) => caps.platform != platform,
            Condition::Enabled(feature) => caps.has(feature),
        }
    }
}

/// A conjunction of conditions. The empty predicate always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate(Vec<Condition>);

impl Predicate {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn when(condition: Condition) -> Self {
        Self(vec![condition])
    }

    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self(conditions.into_iter().collect())
    }

    pub fn holds(&self, caps: &Capabilities) -> bool {
        self.0.iter().all(|c| c.holds(caps))
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub when: Predicate,
    pub items: Vec<MenuNode>,
}

/// One top-level submenu as produced by a derivation.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub id: String,
    pub label: String,
    pub blocks: Vec<Block>,
}

impl Fragment {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            blocks: Vec::new(),
        }
    }

    /// Append an unconditional block.
    pub fn items(self, items: Vec<MenuNode>) -> Self {
        self.block(Predicate::always(), items)
    }

    /// Append a block that only appears when `when` holds.
    pub fn block(mut self, when: Predicate, items: Vec<MenuNode>) -> Self {
        if !items.is_empty() {
            self.blocks.push(Block { when, items });
        }
        self
    }

    /// Flatten the blocks that hold into a submenu, in declared order.
    pub fn resolve(&self, caps: &Capabilities) -> Submenu {
        let children = self
            .blocks
            .iter()
            .filter(|block| block.when.holds(caps))
            .flat_map(|block| block.items.iter().cloned())
            .collect();
        Submenu {
            id: self.id.clone(),
            label: self.label.clone(),
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    /// Two siblings under `parent` share `id`. This is a bug in a derivation
    /// or in the state it was given, never something to paper over.
    DuplicateId { parent: String, id: String },
}

impl fmt::Display for CompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositionError::DuplicateId { parent, id } => {
                write!(f, "duplicate menu id {id:?} under {parent:?}")
            }
        }
    }
}

impl std::error::Error for CompositionError {}

/// Merge fragments into one root, in the order given.
pub fn compose(fragments: &[Fragment], caps: &Capabilities) -> Result<MenuNode, CompositionError> {
    let root = MenuNode::Submenu(Submenu {
        id: ROOT_ID.to_string(),
        label: String::new(),
        children: fragments
            .iter()
            .map(|fragment| MenuNode::Submenu(fragment.resolve(caps)))
            .collect(),
    });
    check_unique_ids(&root)?;
    Ok(root)
}

fn check_unique_ids(node: &MenuNode) -> Result<(), CompositionError> {
    let MenuNode::Submenu(submenu) = node else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    for child in &submenu.children {
        if let Some(id) = child.id()
            && !seen.insert(id)
        {
            return Err(CompositionError::DuplicateId {
                parent: submenu.id.clone(),
                id: id.to_string(),
            });
        }
        check_unique_ids(child)?;
    }
    Ok(())
}
