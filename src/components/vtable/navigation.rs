//! Keyboard and Pointer Navigation
//!
//! Translates key presses into active-row moves on a [`RenderWindow`] and
//! forwards everything else to caller-supplied callbacks.

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use parking_lot::Mutex;

use crate::error::Result;

use super::binding::Record;
use super::engine::{RenderWindow, RowTarget};

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    /// Command on macOS, Windows key elsewhere
    pub platform: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        alt: false,
        shift: false,
        platform: false,
    };

    pub const CONTROL: Modifiers = Modifiers {
        control: true,
        ..Modifiers::NONE
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Logical key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Tab,
    Escape,
    /// F1..F24
    Function(u8),
    Char(char),
    Other(String),
}

impl KeyCode {
    /// Parse a key name such as `"pagedown"`, `"f3"` or `"t"`
    pub fn parse(key: &str) -> Self {
        let lower = key.to_ascii_lowercase();
        match lower.as_str() {
            "up" | "arrowup" => KeyCode::Up,
            "down" | "arrowdown" => KeyCode::Down,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "escape" | "esc" => KeyCode::Escape,
            _ => {
                if let Some(n) = lower
                    .strip_prefix('f')
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|n| (1..=24).contains(n))
                {
                    return KeyCode::Function(n);
                }
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
                    _ => KeyCode::Other(key.to_string()),
                }
            }
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::PageUp => write!(f, "pageup"),
            KeyCode::PageDown => write!(f, "pagedown"),
            KeyCode::Home => write!(f, "home"),
            KeyCode::End => write!(f, "end"),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Escape => write!(f, "escape"),
            KeyCode::Function(n) => write!(f, "f{n}"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Other(key) => write!(f, "{key}"),
        }
    }
}

/// A key press
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Key pressed without modifiers
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    pub fn parse(key: &str, modifiers: Modifiers) -> Self {
        Self::new(KeyCode::parse(key), modifiers)
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        if m.control {
            write!(f, "ctrl-")?;
        }
        if m.alt {
            write!(f, "alt-")?;
        }
        if m.shift {
            write!(f, "shift-")?;
        }
        if m.platform {
            write!(f, "cmd-")?;
        }
        write!(f, "{}", self.code)
    }
}

/// Clamp a requested index into `[0, length - 1]`; `None` when empty
pub fn clamp_index(index: i64, length: usize) -> Option<usize> {
    let last = length.checked_sub(1)?;
    if index <= 0 {
        return Some(0);
    }
    Some(usize::try_from(index).map_or(last, |i| i.min(last)))
}

/// Row a navigation key moves to, before clamping
///
/// Only unmodified keys navigate.
pub fn target_for(key: &KeyInput, active: usize, rows_per_page: usize) -> Option<RowTarget> {
    if !key.modifiers.is_empty() {
        return None;
    }
    let active = i64::try_from(active).unwrap_or(i64::MAX);
    let page = i64::try_from(rows_per_page).unwrap_or(i64::MAX);
    let target = match key.code {
        KeyCode::Up => RowTarget::Index(active.saturating_sub(1)),
        KeyCode::Down => RowTarget::Index(active.saturating_add(1)),
        KeyCode::PageUp => RowTarget::Index(active.saturating_sub(page).saturating_add(1)),
        KeyCode::PageDown => RowTarget::Index(active.saturating_add(page).saturating_sub(1)),
        KeyCode::Home => RowTarget::Index(0),
        KeyCode::End => RowTarget::Last,
        _ => return None,
    };
    Some(target)
}

/// Callback for keys the window does not handle itself
pub type KeyHandler = Arc<dyn Fn(KeyInput) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Callback for a double-clicked row
pub type RowHandler = Arc<dyn Fn(usize) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Moved the active row; `false` when nothing could be focused
    Navigated(bool),
    /// Passed to the key-down callback
    Delegated,
}

fn log_key(key: KeyInput) -> BoxFuture<'static, Result<()>> {
    tracing::debug!(%key, "Unhandled key");
    future::ready(Ok(())).boxed()
}

fn log_double_click(index: usize) -> BoxFuture<'static, Result<()>> {
    tracing::debug!(index, "Row double-clicked");
    future::ready(Ok(())).boxed()
}

/// Navigation controller over a render window
pub struct NavigationController<T> {
    window: RenderWindow<T>,
    on_key_down: Arc<Mutex<KeyHandler>>,
    on_double_click: Arc<Mutex<RowHandler>>,
}

impl<T> Clone for NavigationController<T> {
    fn clone(&self) -> Self {
        Self {
            window: self.window.clone(),
            on_key_down: Arc::clone(&self.on_key_down),
            on_double_click: Arc::clone(&self.on_double_click),
        }
    }
}

impl<T> NavigationController<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    pub fn new(window: RenderWindow<T>) -> Self {
        let on_key_down: KeyHandler = Arc::new(log_key);
        let on_double_click: RowHandler = Arc::new(log_double_click);
        Self {
            window,
            on_key_down: Arc::new(Mutex::new(on_key_down)),
            on_double_click: Arc::new(Mutex::new(on_double_click)),
        }
    }

    pub fn window(&self) -> &RenderWindow<T> {
        &self.window
    }

    /// Replace the callback for keys that do not navigate
    pub fn set_on_key_down<F>(&self, handler: F)
    where
        F: Fn(KeyInput) -> BoxFuture<'static, Result<()>> + Send + Sync + 'static,
    {
        *self.on_key_down.lock() = Arc::new(handler);
    }

    /// Replace the double-click callback
    pub fn set_on_double_click<F>(&self, handler: F)
    where
        F: Fn(usize) -> BoxFuture<'static, Result<()>> + Send + Sync + 'static,
    {
        *self.on_double_click.lock() = Arc::new(handler);
    }

    /// Handle a key press on the window
    pub async fn handle_key(&self, key: KeyInput) -> Result<KeyOutcome> {
        let target = target_for(&key, self.window.active_index(), self.window.rows_per_page());
        match target {
            Some(target) => {
                let focused = self.window.focus_row_by_index(target).await?;
                Ok(KeyOutcome::Navigated(focused))
            }
            None => {
                let handler = Arc::clone(&*self.on_key_down.lock());
                handler(key).await?;
                Ok(KeyOutcome::Delegated)
            }
        }
    }

    /// Handle a double click on a rendered row
    pub async fn double_click(&self, index: usize) -> Result<()> {
        if !self.window.focus_in(index) {
            return Ok(());
        }
        let handler = Arc::clone(&*self.on_double_click.lock());
        handler(index).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::components::vtable::binding::{RowTemplate, SlotBinding};
    use crate::components::vtable::data_source::GeneratedDataSource;
    use crate::components::vtable::engine::Focus;
    use crate::components::vtable::icon_cache::IconCache;

    fn index_of(target: Option<RowTarget>) -> Option<i64> {
        match target {
            Some(RowTarget::Index(i)) => Some(i),
            _ => None,
        }
    }

    async fn controller(length: usize) -> NavigationController<String> {
        let window = RenderWindow::new(
            RowTemplate::new(20.0).slot(SlotBinding::field("name", "name")),
            100.0,
            IconCache::shared(4),
        )
        .expect("window");
        window
            .set_data_source(Arc::new(GeneratedDataSource::new(length, |i| format!("row{i}"))))
            .await
            .expect("populate");
        NavigationController::new(window)
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-5, 10), Some(0));
        assert_eq!(clamp_index(50, 10), Some(9));
        assert_eq!(clamp_index(4, 10), Some(4));
        assert_eq!(clamp_index(i64::MAX, 10), Some(9));
        assert_eq!(clamp_index(0, 0), None);
    }

    #[test]
    fn test_key_targets() {
        let key = |code| KeyInput::plain(code);
        assert_eq!(index_of(target_for(&key(KeyCode::Up), 7, 5)), Some(6));
        assert_eq!(index_of(target_for(&key(KeyCode::Down), 7, 5)), Some(8));
        assert_eq!(index_of(target_for(&key(KeyCode::PageUp), 7, 5)), Some(3));
        assert_eq!(index_of(target_for(&key(KeyCode::PageDown), 7, 5)), Some(11));
        assert_eq!(index_of(target_for(&key(KeyCode::Home), 7, 5)), Some(0));
        assert_eq!(index_of(target_for(&key(KeyCode::Up), 0, 5)), Some(-1));
        assert!(matches!(
            target_for(&key(KeyCode::End), 7, 5),
            Some(RowTarget::Last)
        ));
        assert!(target_for(&key(KeyCode::Enter), 7, 5).is_none());
        assert!(target_for(&KeyInput::new(KeyCode::PageDown, Modifiers::CONTROL), 7, 5).is_none());
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(KeyCode::parse("pagedown"), KeyCode::PageDown);
        assert_eq!(KeyCode::parse("F3"), KeyCode::Function(3));
        assert_eq!(KeyCode::parse("T"), KeyCode::Char('t'));
        assert_eq!(KeyCode::parse("f"), KeyCode::Char('f'));
        assert_eq!(KeyCode::parse("backspace"), KeyCode::Other("backspace".to_string()));
        assert_eq!(
            KeyInput::parse("pageup", Modifiers::CONTROL).to_string(),
            "ctrl-pageup"
        );
    }

    #[tokio::test]
    async fn test_arrow_and_page_keys_move_active_row() {
        let nav = controller(100).await;

        let outcome = nav.handle_key(KeyInput::plain(KeyCode::Down)).await.expect("key");
        assert_eq!(outcome, KeyOutcome::Navigated(true));
        assert_eq!(nav.window().active_index(), 1);

        nav.handle_key(KeyInput::plain(KeyCode::PageDown)).await.expect("key");
        assert_eq!(nav.window().active_index(), 5);
        assert_eq!(nav.window().focus_state(), Focus::Row(5));
        assert!(nav.window().snapshot().range.contains(5));

        nav.handle_key(KeyInput::plain(KeyCode::End)).await.expect("key");
        assert_eq!(nav.window().active_index(), 99);

        nav.handle_key(KeyInput::plain(KeyCode::PageUp)).await.expect("key");
        assert_eq!(nav.window().active_index(), 95);

        nav.handle_key(KeyInput::plain(KeyCode::Home)).await.expect("key");
        assert_eq!(nav.window().active_index(), 0);

        nav.handle_key(KeyInput::plain(KeyCode::Up)).await.expect("key");
        assert_eq!(nav.window().active_index(), 0);
    }

    #[tokio::test]
    async fn test_other_keys_reach_callback() {
        let nav = controller(10).await;
        let seen = Arc::new(Mutex::new(Vec::new()));
        nav.set_on_key_down({
            let seen = Arc::clone(&seen);
            move |key| {
                seen.lock().push(key.to_string());
                future::ready(Ok(())).boxed()
            }
        });

        let outcome = nav
            .handle_key(KeyInput::parse("t", Modifiers::CONTROL))
            .await
            .expect("key");
        assert_eq!(outcome, KeyOutcome::Delegated);
        nav.handle_key(KeyInput::plain(KeyCode::Tab)).await.expect("key");

        assert_eq!(*seen.lock(), vec!["ctrl-t".to_string(), "tab".to_string()]);
        assert_eq!(nav.window().active_index(), 0);
    }

    #[tokio::test]
    async fn test_double_click_focuses_then_calls_back() {
        let nav = controller(10).await;
        let clicked = Arc::new(AtomicUsize::new(usize::MAX));
        nav.set_on_double_click({
            let clicked = Arc::clone(&clicked);
            move |index| {
                clicked.store(index, Ordering::SeqCst);
                future::ready(Ok(())).boxed()
            }
        });

        nav.double_click(3).await.expect("click");
        assert_eq!(clicked.load(Ordering::SeqCst), 3);
        assert_eq!(nav.window().active_index(), 3);

        nav.double_click(40).await.expect("click");
        assert_eq!(clicked.load(Ordering::SeqCst), 3);
    }
}
