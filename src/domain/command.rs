//! Command - Palette Commands

/// Commands reachable from the command palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    FocusOtherPane,
    NewTab,
    GoToParent,
    ReloadPane,
    PreviewFile,
}

/// A named palette command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteCommand {
    pub id: CommandId,
    pub name: String,
}

impl PaletteCommand {
    pub fn new(id: CommandId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Built-in commands in display order
    pub fn builtin() -> Vec<PaletteCommand> {
        vec![
            Self::new(CommandId::FocusOtherPane, "Pane: Focus Other Pane"),
            Self::new(CommandId::NewTab, "Pane: New Tab"),
            Self::new(CommandId::GoToParent, "Pane: Go To Parent Directory"),
            Self::new(CommandId::ReloadPane, "Pane: Reload Directory"),
            Self::new(CommandId::PreviewFile, "File: Preview"),
        ]
    }
}
