//! Palette Controller
//!
//! Filters the command list by word prefixes and shows the hits in a render
//! window with the matched prefixes emphasized.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::components::vtable::{
    ArrayDataSource, FieldTransform, FieldValue, NavigationController, Record, RenderWindow,
    RowTemplate, SharedIconCache, SlotBinding, VisibleRange,
};
use crate::domain::command::PaletteCommand;
use crate::error::Result;

/// A command matching the current query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub command: PaletteCommand,
    /// Matched prefix of each word of the command name
    pub matched_key: Vec<String>,
}

impl Record for PaletteEntry {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "name" => FieldValue::Text(self.command.name.clone()),
            "matchedKey" => FieldValue::Words(self.matched_key.clone()),
            _ => FieldValue::Missing,
        }
    }
}

/// Match `query` words against the words of `name`, in order
///
/// Each query word must be a case-insensitive prefix of a later name word.
/// Returns the matched prefix per name word, empty for unmatched words.
pub fn match_words(name: &str, query: &str) -> Option<Vec<String>> {
    let words: Vec<&str> = name.split_whitespace().collect();
    let mut matched = vec![String::new(); words.len()];
    let mut next = 0;

    for needle in query.split_whitespace() {
        let needle = needle.to_lowercase();
        let found = (next..words.len()).find(|&i| words[i].to_lowercase().starts_with(&needle))?;
        matched[found] = words[found].chars().take(needle.chars().count()).collect();
        next = found + 1;
    }
    Some(matched)
}

/// Controller of the command palette
pub struct PaletteController {
    commands: Arc<Vec<PaletteCommand>>,
    navigation: NavigationController<PaletteEntry>,
    entries: Mutex<Arc<Vec<PaletteEntry>>>,
    query: Mutex<String>,
}

impl PaletteController {
    pub fn new(
        commands: Vec<PaletteCommand>,
        row_height: f64,
        viewport_height: f64,
        icons: SharedIconCache,
    ) -> Result<Self> {
        let template = RowTemplate::new(row_height)
            .slot(SlotBinding::transform("name", FieldTransform::Match).percent_width(100.0));
        let window = RenderWindow::new(template, viewport_height, icons)?;
        Ok(Self {
            commands: Arc::new(commands),
            navigation: NavigationController::new(window),
            entries: Mutex::new(Arc::new(Vec::new())),
            query: Mutex::new(String::new()),
        })
    }

    pub fn navigation(&self) -> &NavigationController<PaletteEntry> {
        &self.navigation
    }

    pub fn query(&self) -> String {
        self.query.lock().clone()
    }

    /// Entries matching the current query
    pub fn entries(&self) -> Arc<Vec<PaletteEntry>> {
        Arc::clone(&self.entries.lock())
    }

    /// Filter the commands and show the matches
    pub async fn set_query(&self, query: impl Into<String>) -> Result<VisibleRange> {
        let query = query.into();
        let entries: Arc<Vec<PaletteEntry>> = Arc::new(
            self.commands
                .iter()
                .filter_map(|command| {
                    match_words(&command.name, &query).map(|matched_key| PaletteEntry {
                        command: command.clone(),
                        matched_key,
                    })
                })
                .collect(),
        );
        tracing::debug!(%query, matches = entries.len(), "Palette filtered");

        *self.query.lock() = query;
        *self.entries.lock() = Arc::clone(&entries);
        self.navigation
            .window()
            .set_data_source(Arc::new(ArrayDataSource::from_arc(entries)))
            .await
    }

    /// The command under the active row
    pub fn selected(&self) -> Option<PaletteCommand> {
        let active = self.navigation.window().active_index();
        self.entries.lock().get(active).map(|e| e.command.clone())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::components::vtable::{IconCache, KeyCode, KeyInput, SlotValue, SlotWidth};
    use crate::domain::command::CommandId;
    use crate::utils::format::HighlightSpan;

    fn palette() -> PaletteController {
        PaletteController::new(PaletteCommand::builtin(), 24.0, 240.0, IconCache::shared(1))
            .expect("palette")
    }

    #[test]
    fn test_match_words() {
        assert_eq!(
            match_words("Pane: New Tab", "new t"),
            Some(vec![String::new(), "New".to_string(), "T".to_string()])
        );
        assert_eq!(
            match_words("Pane: Go To Parent Directory", "pa dir"),
            Some(vec![
                "Pa".to_string(),
                String::new(),
                String::new(),
                String::new(),
                "Dir".to_string(),
            ])
        );
        assert_eq!(match_words("Pane: New Tab", "tab new"), None);
        assert_eq!(match_words("File: Preview", ""), Some(vec![String::new(); 2]));
    }

    #[test]
    fn test_name_column_spans_the_row() {
        let palette = palette();
        let slots = palette.navigation().window().template().slots();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].width, SlotWidth::Percent(100.0));
    }

    #[tokio::test]
    async fn test_empty_query_lists_everything() {
        let palette = palette();
        let range = palette.set_query("").await.expect("query");
        assert_eq!(range, VisibleRange::new(0, PaletteCommand::builtin().len()));
        assert_eq!(
            palette.selected().map(|c| c.id),
            Some(CommandId::FocusOtherPane)
        );
    }

    #[tokio::test]
    async fn test_query_filters_and_highlights() {
        let palette = palette();
        palette.set_query("prev").await.expect("query");

        assert_eq!(palette.entries().len(), 1);
        assert_eq!(palette.selected().map(|c| c.id), Some(CommandId::PreviewFile));

        let snapshot = palette.navigation().window().snapshot();
        assert_eq!(
            snapshot.rows[0].slot("name"),
            Some(&SlotValue::Highlight(vec![
                HighlightSpan {
                    text: "File:".to_string(),
                    bold: false
                },
                HighlightSpan {
                    text: " ".to_string(),
                    bold: false
                },
                HighlightSpan {
                    text: "Prev".to_string(),
                    bold: true
                },
                HighlightSpan {
                    text: "iew".to_string(),
                    bold: false
                },
            ]))
        );
    }

    #[tokio::test]
    async fn test_navigation_moves_selection() {
        let palette = palette();
        palette.set_query("pane").await.expect("query");
        palette
            .navigation()
            .handle_key(KeyInput::plain(KeyCode::Down))
            .await
            .expect("down");
        assert_eq!(palette.selected().map(|c| c.id), Some(CommandId::NewTab));

        palette.set_query("nothing matches").await.expect("query");
        assert_eq!(palette.selected(), None);
    }
}
