//! TabsState - Tab Navigation State

use crate::app::navigation::Tab;

/// State for the tabs of one pane
#[derive(Debug, Clone)]
pub struct TabsState {
    /// Open tabs, in strip order
    pub tabs: Vec<Tab>,
    /// Currently active tab
    pub active_tab: u64,
    /// Next tab ID
    next_id: u64,
}

impl Default for TabsState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TabsState {
    /// Start with one tab showing `path`
    pub fn new(path: Option<String>) -> Self {
        Self {
            tabs: vec![Tab::new(1, path)],
            active_tab: 1,
            next_id: 2,
        }
    }

    /// Open a tab at the end of the strip and select it
    pub fn add_tab(&mut self, path: Option<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.tabs.push(Tab::new(id, path));
        self.active_tab = id;
        id
    }

    /// Record the listing shown by the active tab
    pub fn update_active_tab(&mut self, name: impl Into<String>, path: impl Into<String>) {
        let active = self.active_tab;
        if let Some(tab) = self.tabs.iter_mut().find(|t| t.id == active) {
            tab.name = name.into();
            tab.path = Some(path.into());
        }
    }

    /// Select a tab by ID
    pub fn select_tab(&mut self, tab_id: u64) -> bool {
        if self.tabs.iter().any(|t| t.id == tab_id) {
            self.active_tab = tab_id;
            true
        } else {
            false
        }
    }

    /// Close a tab by ID; the last remaining tab stays open
    pub fn close_tab(&mut self, tab_id: u64) -> bool {
        if self.tabs.len() <= 1 {
            return false;
        }
        let Some(pos) = self.tabs.iter().position(|t| t.id == tab_id) else {
            return false;
        };

        // If closing the active tab, switch to the one before or after
        if tab_id == self.active_tab {
            let neighbour = if pos > 0 { pos - 1 } else { pos + 1 };
            self.active_tab = self.tabs[neighbour].id;
        }

        self.tabs.remove(pos);
        true
    }

    /// Get the active tab
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == self.active_tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(state: &TabsState) -> Vec<u64> {
        state.tabs.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_add_tab_appends() {
        let mut state = TabsState::new(Some("/".to_string()));
        let second = state.add_tab(Some("/a".to_string()));
        state.select_tab(1);
        let third = state.add_tab(None);

        assert_eq!(ids(&state), vec![1, second, third]);
        assert_eq!(state.active_tab, third);
    }

    #[test]
    fn test_update_active_tab() {
        let mut state = TabsState::default();
        state.update_active_tab("src", "/home/src");
        let tab = state.active_tab().expect("active tab");
        assert_eq!(tab.name, "src");
        assert_eq!(tab.path.as_deref(), Some("/home/src"));
    }

    #[test]
    fn test_close_last_tab_is_refused() {
        let mut state = TabsState::default();
        assert!(!state.close_tab(1));
        assert_eq!(ids(&state), vec![1]);
    }

    #[test]
    fn test_close_active_selects_neighbour() {
        let mut state = TabsState::default();
        let b = state.add_tab(None);
        let c = state.add_tab(None);

        assert!(state.close_tab(c));
        assert_eq!(state.active_tab, b);

        state.select_tab(1);
        assert!(state.close_tab(1));
        assert_eq!(state.active_tab, b);
        assert_eq!(ids(&state), vec![b]);
    }

    #[test]
    fn test_close_inactive_keeps_selection() {
        let mut state = TabsState::default();
        let b = state.add_tab(None);
        assert!(state.close_tab(1));
        assert_eq!(state.active_tab, b);
        assert!(!state.select_tab(1));
        assert!(!state.close_tab(99));
    }
}
