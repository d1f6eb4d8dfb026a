//! Menu bookkeeping
//!
//! A headless stand-in for the host application's menu: an ordered list of
//! command items. Tours use it to record which launch entries they added.

use serde_json::Value as JsonValue;
use ulid::Ulid;

/// Identity of a menu item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MenuItemId(pub Ulid);

impl MenuItemId {
    /// Generate new item ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MenuItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One command entry
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Identity
    pub id: MenuItemId,
    /// Command executed on activation
    pub command: String,
    /// Command arguments
    pub args: JsonValue,
}

/// Ordered list of command entries
#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Create empty menu
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command entry
    pub fn add_item(&mut self, command: impl Into<String>, args: JsonValue) -> MenuItem {
        let item = MenuItem {
            id: MenuItemId::new(),
            command: command.into(),
            args,
        };
        self.items.push(item.clone());
        item
    }

    /// Remove an entry by identity
    pub fn remove_item(&mut self, id: MenuItemId) -> Option<MenuItem> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Entries in display order
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Whether an entry is present
    #[inline]
    #[must_use]
    pub fn contains(&self, id: MenuItemId) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
