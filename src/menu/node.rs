//! # Menu Tree
//!
//! The declarative description of a menu. Trees are built by the derivation
//! functions, never mutated afterwards, and thrown away once rendered.
//!
//! A leaf's handler is a pure function from the click to an [`Activation`]:
//! it describes what the user asked for and nothing else. Carrying it out
//! (finding the window, dispatching the intent) is the bridge's job.

use std::fmt;
use std::sync::Arc;

use crate::core::intent::Intent;

/// What the native layer reports when an item is clicked.
///
/// For checkable items `checked` is the state *after* the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Click {
    pub checked: bool,
}

/// Operations on the web content of a server view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOp {
    Reload,
    ReloadIgnoringCache,
    GoBack,
    GoForward,
    ResetZoom,
    ZoomIn,
    ZoomOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOp {
    Minimize,
    Close,
}

/// The result of activating a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Send an intent to the store.
    Dispatch(Intent),
    /// Act on the content target for `url`, if one resolves.
    Content { url: Option<String>, op: ContentOp },
    FullScreen(bool),
    Window(WindowOp),
    Quit,
}

pub type Handler = Arc<dyn Fn(&Click) -> Activation + Send + Sync>;

#[derive(Clone)]
pub struct Leaf {
    pub id: String,
    pub label: String,
    pub enabled: bool,
    /// `None` for plain items, `Some(state)` for checkable ones.
    pub checked: Option<bool>,
    pub accelerator: Option<String>,
    pub on_activate: Handler,
}

impl Leaf {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        on_activate: impl Fn(&Click) -> Activation + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            enabled: true,
            checked: None,
            accelerator: None,
            on_activate: Arc::new(on_activate),
        }
    }

    /// A leaf that always dispatches the same intent.
    pub fn dispatch(id: impl Into<String>, label: impl Into<String>, intent: Intent) -> Self {
        Self::new(id, label, move |_| Activation::Dispatch(intent.clone()))
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn checkbox(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn accelerator(mut self, accelerator: impl Into<String>) -> Self {
        self.accelerator = Some(accelerator.into());
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked == Some(true)
    }

    /// The click a native menu delivers for this item: checkboxes flip.
    pub fn click(&self) -> Click {
        Click {
            checked: self.checked.map(|c| !c).unwrap_or(false),
        }
    }

    pub fn activate(&self, click: &Click) -> Activation {
        (self.on_activate)(click)
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("enabled", &self.enabled)
            .field("checked", &self.checked)
            .field("accelerator", &self.accelerator)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Submenu {
    pub id: String,
    pub label: String,
    pub children: Vec<MenuNode>,
}

#[derive(Debug, Clone)]
pub enum MenuNode {
    Leaf(Leaf),
    Submenu(Submenu),
    Separator,
}

impl MenuNode {
    /// Separators are the only nodes without an id.
    pub fn id(&self) -> Option<&str> {
        match self {
            MenuNode::Leaf(leaf) => Some(&leaf.id),
            MenuNode::Submenu(submenu) => Some(&submenu.id),
            MenuNode::Separator => None,
        }
    }

    pub fn children(&self) -> &[MenuNode] {
        match self {
            MenuNode::Submenu(submenu) => &submenu.children,
            _ => &[],
        }
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: &str) -> Option<&MenuNode> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Depth-first search for a leaf by id.
    pub fn find_leaf(&self, id: &str) -> Option<&Leaf> {
        match self {
            MenuNode::Leaf(leaf) if leaf.id == id => Some(leaf),
            _ => self.children().iter().find_map(|child| child.find_leaf(id)),
        }
    }

    /// Ids of the direct children, separators skipped.
    pub fn child_ids(&self) -> Vec<&str> {
        self.children().iter().filter_map(MenuNode::id).collect()
    }
}

impl From<Leaf> for MenuNode {
    fn from(leaf: Leaf) -> Self {
        MenuNode::Leaf(leaf)
    }
}

impl From<Submenu> for MenuNode {
    fn from(submenu: Submenu) -> Self {
        MenuNode::Submenu(submenu)
    }
}
