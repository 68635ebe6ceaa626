//! Navigation - Panes, Tabs and the Active Pane
//!
//! Which pane has the keyboard is tracked in a [`NavigationContext`] shared by
//! both panes instead of global state.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// The two panes of the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaneId {
    #[default]
    Left,
    Right,
}

impl PaneId {
    /// The opposite pane
    pub fn other(self) -> Self {
        match self {
            PaneId::Left => PaneId::Right,
            PaneId::Right => PaneId::Left,
        }
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaneId::Left => write!(f, "left"),
            PaneId::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Default)]
struct ContextState {
    active: PaneId,
    previous: Option<PaneId>,
}

/// Shared record of the active pane and the one active before it
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    state: Arc<Mutex<ContextState>>,
}

impl NavigationContext {
    pub fn new(active: PaneId) -> Self {
        Self {
            state: Arc::new(Mutex::new(ContextState {
                active,
                previous: None,
            })),
        }
    }

    /// Make `pane` the active pane
    pub fn activate(&self, pane: PaneId) {
        let mut state = self.state.lock();
        if state.active != pane {
            state.previous = Some(state.active);
            state.active = pane;
            tracing::trace!(%pane, "Pane activated");
        }
    }

    pub fn active(&self) -> PaneId {
        self.state.lock().active
    }

    /// The pane that was active before the current one
    pub fn other(&self) -> PaneId {
        let state = self.state.lock();
        state.previous.unwrap_or(state.active.other())
    }
}

/// Represents an open tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Unique identifier for the tab
    pub id: u64,
    /// Display name of the listed directory
    pub name: String,
    /// Directory shown by the tab; the service root when absent
    pub path: Option<String>,
}

impl Tab {
    /// Create a new tab for a directory
    pub fn new(id: u64, path: Option<String>) -> Self {
        Self {
            id,
            name: String::new(),
            path,
        }
    }

    /// Title shown in the tab strip
    pub fn title(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else {
            self.path.as_deref().unwrap_or("/")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_tracks_previous_pane() {
        let context = NavigationContext::new(PaneId::Left);
        assert_eq!(context.active(), PaneId::Left);
        assert_eq!(context.other(), PaneId::Right);

        context.activate(PaneId::Right);
        assert_eq!(context.active(), PaneId::Right);
        assert_eq!(context.other(), PaneId::Left);

        context.activate(PaneId::Right);
        assert_eq!(context.other(), PaneId::Left);
    }

    #[test]
    fn test_tab_title() {
        let mut tab = Tab::new(1, Some("/home/user".to_string()));
        assert_eq!(tab.title(), "/home/user");
        tab.name = "user".to_string();
        assert_eq!(tab.title(), "user");
        assert_eq!(Tab::new(2, None).title(), "/");
    }
}
