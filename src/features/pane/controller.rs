//! Pane Controller
//!
//! Drives one file pane: its directory listing, address, tabs and the keys
//! its table does not handle itself.

use std::sync::{Arc, Weak};

use futures::FutureExt;
use parking_lot::Mutex;

use crate::app::navigation::{NavigationContext, PaneId};
use crate::components::vtable::{
    BackendIconLoader, DataSource, FieldTransform, KeyCode, KeyInput, KeyOutcome, Modifiers,
    NavigationController, RemoteDataSource, RenderWindow, RowTarget, RowTemplate, SharedIconCache,
    SlotBinding,
};
use crate::domain::config::ViewConfig;
use crate::domain::file_info::{FileInfo, ListRequest, ReadRequest};
use crate::error::{Error, Result};
use crate::services::Backend;
use crate::state::tabs_state::TabsState;

/// Slots every file row template must provide
pub const REQUIRED_SLOTS: &[&str] = &["icon", "name"];

/// Notifications from a pane to the workspace
#[derive(Debug, Clone, PartialEq)]
pub enum PaneEvent {
    /// Move keyboard focus to another pane
    FocusPane(PaneId),
    /// A file was opened
    OpenFile {
        pane: PaneId,
        path: Option<String>,
        key: String,
    },
    /// Content of a file to preview
    Preview {
        pane: PaneId,
        name: String,
        content: Vec<u8>,
    },
    /// The pane now shows another directory
    AddressChanged { pane: PaneId, path: String },
    /// The pane's tabs changed
    TabsChanged(PaneId),
    /// Listing the requested directory failed
    ListingFailed { pane: PaneId, message: String },
}

/// Result of entering the active row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
    /// A directory was listed
    Directory,
    /// A file was opened
    File,
    /// No row to enter
    Nothing,
}

/// Row template of the file listing
pub fn file_row_template(row_height: f64) -> RowTemplate {
    RowTemplate::new(row_height)
        .slot(SlotBinding::transform("icon", FieldTransform::Icon).fixed_width(24.0))
        .slot(
            SlotBinding::field("name", "name")
                .label("Name")
                .flex_width(Some(160.0), None),
        )
        .slot(
            SlotBinding::field("extension", "extension")
                .label("Ext")
                .fixed_width(60.0),
        )
        .slot(
            SlotBinding::transform("size", FieldTransform::Size)
                .label("Size")
                .fixed_width(90.0),
        )
        .slot(
            SlotBinding::transform("date", FieldTransform::Date)
                .label("Date")
                .fixed_width(130.0),
        )
        .slot(
            SlotBinding::field("attributes", "attributes")
                .label("Attr")
                .fixed_width(50.0),
        )
}

struct PaneInner {
    id: PaneId,
    backend: Arc<dyn Backend>,
    navigation: NavigationController<FileInfo>,
    context: NavigationContext,
    source: Mutex<Option<Arc<RemoteDataSource>>>,
    address: Mutex<Option<String>>,
    tabs: Mutex<TabsState>,
    events: flume::Sender<PaneEvent>,
}

/// Controller of one pane; clones share the pane
#[derive(Clone)]
pub struct PaneController {
    inner: Arc<PaneInner>,
}

impl PaneController {
    /// Create a pane with the standard file row template
    pub fn new(
        id: PaneId,
        backend: Arc<dyn Backend>,
        view: &ViewConfig,
        icons: SharedIconCache,
        context: NavigationContext,
        events: flume::Sender<PaneEvent>,
    ) -> Result<Self> {
        let template = file_row_template(view.row_height);
        Self::with_template(id, backend, template, view, icons, context, events)
    }

    /// Create a pane with a custom row template
    ///
    /// The template must provide the [`REQUIRED_SLOTS`].
    pub fn with_template(
        id: PaneId,
        backend: Arc<dyn Backend>,
        template: RowTemplate,
        view: &ViewConfig,
        icons: SharedIconCache,
        context: NavigationContext,
        events: flume::Sender<PaneEvent>,
    ) -> Result<Self> {
        template.require_slots(REQUIRED_SLOTS)?;
        let window = RenderWindow::new(template, view.viewport_height, icons)?;
        window.set_icon_loader(Arc::new(BackendIconLoader::new(Arc::clone(&backend))));

        let inner = Arc::new(PaneInner {
            id,
            backend,
            navigation: NavigationController::new(window),
            context,
            source: Mutex::new(None),
            address: Mutex::new(None),
            tabs: Mutex::new(TabsState::default()),
            events,
        });
        Self::install_callbacks(&inner);
        Ok(Self { inner })
    }

    fn install_callbacks(inner: &Arc<PaneInner>) {
        let weak: Weak<PaneInner> = Arc::downgrade(inner);
        inner.navigation.set_on_key_down({
            let weak = weak.clone();
            move |key| {
                let weak = weak.clone();
                async move {
                    match weak.upgrade() {
                        Some(inner) => PaneController { inner }.handle_unhandled_key(key).await,
                        None => Ok(()),
                    }
                }
                .boxed()
            }
        });
        inner.navigation.set_on_double_click(move |_index| {
            let weak = weak.clone();
            async move {
                match weak.upgrade() {
                    Some(inner) => PaneController { inner }.enter_directory().await.map(|_| ()),
                    None => Ok(()),
                }
            }
            .boxed()
        });
    }

    pub fn id(&self) -> PaneId {
        self.inner.id
    }

    pub fn navigation(&self) -> &NavigationController<FileInfo> {
        &self.inner.navigation
    }

    pub fn window(&self) -> &RenderWindow<FileInfo> {
        self.inner.navigation.window()
    }

    /// The data source currently shown
    pub fn data_source(&self) -> Option<Arc<RemoteDataSource>> {
        self.inner.source.lock().clone()
    }

    /// Path of the listed directory
    pub fn address(&self) -> Option<String> {
        self.inner.address.lock().clone()
    }

    pub fn tabs(&self) -> TabsState {
        self.inner.tabs.lock().clone()
    }

    fn emit(&self, event: PaneEvent) {
        if self.inner.events.send(event).is_err() {
            tracing::trace!(pane = %self.inner.id, "No listener for pane events");
        }
    }

    fn is_current(&self, source: &Arc<RemoteDataSource>) -> bool {
        self.inner
            .source
            .lock()
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, source))
    }

    /// List a directory in the active tab
    ///
    /// Returns `false` when another listing replaced this one meanwhile.
    pub async fn open(&self, request: ListRequest) -> Result<bool> {
        tracing::info!(pane = %self.inner.id, ?request, "Opening directory");
        let source = Arc::new(RemoteDataSource::new(Arc::clone(&self.inner.backend), request));
        self.set_data_source(source).await
    }

    /// List the directory at `path`
    pub async fn set_address(&self, path: impl Into<String>) -> Result<bool> {
        self.open(ListRequest::path(path)).await
    }

    /// List a path typed into the address bar
    ///
    /// Blank input is ignored and issues no request.
    pub async fn submit_address(&self, typed: &str) -> Result<bool> {
        let path = typed.trim();
        if path.is_empty() {
            return Ok(false);
        }
        tracing::debug!(pane = %self.inner.id, path, "Address submitted");
        self.set_address(path).await
    }

    /// Show `source`, then sync the tab, address and focused row with it
    pub async fn set_data_source(&self, source: Arc<RemoteDataSource>) -> Result<bool> {
        *self.inner.source.lock() = Some(Arc::clone(&source));
        let shown = Arc::clone(&source);
        if let Err(e) = self.window().set_data_source(shown).await {
            if self.is_current(&source) {
                self.emit(PaneEvent::ListingFailed {
                    pane: self.inner.id,
                    message: e.to_string(),
                });
            }
            return Err(e);
        }
        if !self.is_current(&source) {
            return Ok(false);
        }

        let listing = source.listing().await?;
        if !self.is_current(&source) {
            return Ok(false);
        }
        self.inner
            .tabs
            .lock()
            .update_active_tab(listing.name.clone(), listing.path.clone());
        *self.inner.address.lock() = Some(listing.path.clone());
        self.emit(PaneEvent::AddressChanged {
            pane: self.inner.id,
            path: listing.path.clone(),
        });
        self.emit(PaneEvent::TabsChanged(self.inner.id));

        if let Some(active) = source.active_index().await? {
            self.window().focus_row_by_index(active).await?;
        }
        Ok(self.is_current(&source))
    }

    async fn active_item(&self) -> Result<Option<FileInfo>> {
        let Some(source) = self.data_source() else {
            return Ok(None);
        };
        source.item(self.window().active_index()).await
    }

    /// Enter the active row: list a directory or open a file
    pub async fn enter_directory(&self) -> Result<EnterOutcome> {
        let Some(item) = self.active_item().await? else {
            return Ok(EnterOutcome::Nothing);
        };
        let path = self.address();
        if item.is_directory {
            self.open(ListRequest::child(path, item.key)).await?;
            Ok(EnterOutcome::Directory)
        } else {
            tracing::debug!(pane = %self.inner.id, key = %item.key, "Opening file");
            self.emit(PaneEvent::OpenFile {
                pane: self.inner.id,
                path,
                key: item.key,
            });
            Ok(EnterOutcome::File)
        }
    }

    /// Enter the parent entry listed first
    pub async fn go_to_parent(&self) -> Result<EnterOutcome> {
        if !self.window().focus_row_by_index(RowTarget::Index(0)).await? {
            return Ok(EnterOutcome::Nothing);
        }
        self.enter_directory().await
    }

    /// Read the active file for preview
    ///
    /// Every call reads the content again.
    pub async fn preview(&self) -> Result<Option<Vec<u8>>> {
        let Some(item) = self.active_item().await? else {
            return Ok(None);
        };
        if item.is_directory {
            return Ok(None);
        }
        let source = self.data_source().ok_or_else(|| Error::Invalid {
            message: "pane has no listing".to_string(),
        })?;
        let content = source
            .read(ReadRequest {
                path: self.address(),
                key: item.key.clone(),
            })
            .await?;
        self.emit(PaneEvent::Preview {
            pane: self.inner.id,
            name: item.name,
            content: content.clone(),
        });
        Ok(Some(content))
    }

    /// List the current directory again
    pub async fn reload(&self) -> Result<bool> {
        let request = match self.address() {
            Some(path) => ListRequest::path(path),
            None => match self.data_source() {
                Some(source) => source.request().clone(),
                None => ListRequest::default(),
            },
        };
        self.open(request).await
    }

    /// Open a tab showing the current directory
    pub fn new_tab(&self) -> u64 {
        let address = self.address();
        let id = self.inner.tabs.lock().add_tab(address);
        self.emit(PaneEvent::TabsChanged(self.inner.id));
        id
    }

    /// Switch to a tab and list its directory
    pub async fn select_tab(&self, tab_id: u64) -> Result<bool> {
        let path = {
            let mut tabs = self.inner.tabs.lock();
            if !tabs.select_tab(tab_id) {
                return Ok(false);
            }
            tabs.active_tab().and_then(|t| t.path.clone())
        };
        self.emit(PaneEvent::TabsChanged(self.inner.id));
        match path {
            Some(path) => self.set_address(path).await,
            None => self.open(ListRequest::default()).await,
        }
    }

    /// Close a tab; closing the active tab lists its replacement
    pub async fn close_tab(&self, tab_id: u64) -> Result<bool> {
        let (closed, switched) = {
            let mut tabs = self.inner.tabs.lock();
            let was_active = tabs.active_tab == tab_id;
            let closed = tabs.close_tab(tab_id);
            let switched = (closed && was_active).then(|| tabs.active_tab().and_then(|t| t.path.clone()));
            (closed, switched)
        };
        if !closed {
            return Ok(false);
        }
        self.emit(PaneEvent::TabsChanged(self.inner.id));
        if let Some(path) = switched {
            match path {
                Some(path) => self.set_address(path).await?,
                None => self.open(ListRequest::default()).await?,
            };
        }
        Ok(true)
    }

    /// Activate this pane and focus its active row
    pub async fn focus(&self) -> Result<bool> {
        self.inner.context.activate(self.inner.id);
        self.window().focus().await
    }

    /// Key press on this pane's table
    pub async fn handle_key(&self, key: KeyInput) -> Result<KeyOutcome> {
        self.inner.context.activate(self.inner.id);
        self.inner.navigation.handle_key(key).await
    }

    /// Double click on a row of this pane's table
    pub async fn double_click(&self, index: usize) -> Result<()> {
        self.inner.context.activate(self.inner.id);
        self.inner.navigation.double_click(index).await
    }

    async fn handle_unhandled_key(&self, key: KeyInput) -> Result<()> {
        let ctrl_only = Modifiers::CONTROL;
        match (&key.code, key.modifiers) {
            (KeyCode::Tab, m) if m.is_empty() => {
                self.emit(PaneEvent::FocusPane(self.inner.context.other()));
            }
            (KeyCode::Char('t'), m) if m == ctrl_only => {
                self.new_tab();
            }
            (KeyCode::PageUp, m) if m == ctrl_only => {
                self.go_to_parent().await?;
            }
            (KeyCode::PageDown, m) if m == ctrl_only => {
                self.enter_directory().await?;
            }
            (KeyCode::Enter, m) if m.is_empty() => {
                self.enter_directory().await?;
            }
            (KeyCode::Function(3), m) if m.is_empty() => {
                self.preview().await?;
            }
            _ => tracing::debug!(pane = %self.inner.id, %key, "Unhandled key"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::components::vtable::{Focus, IconCache};
    use crate::domain::file_info::ListResponse;
    use crate::services::fake::FakeBackend;

    fn listing(path: &str, name: &str, files: Vec<FileInfo>) -> ListResponse {
        ListResponse {
            path: path.to_string(),
            name: name.to_string(),
            files,
        }
    }

    fn backend() -> Arc<FakeBackend> {
        let mut marked = FileInfo::file("marked", "txt");
        marked.is_active = true;
        Arc::new(
            FakeBackend::new()
                .with_listing(listing(
                    "/",
                    "root",
                    vec![
                        FileInfo::file("readme", "md"),
                        FileInfo::directory("src"),
                    ],
                ))
                .with_listing(listing(
                    "/src",
                    "src",
                    vec![
                        FileInfo::directory(".."),
                        FileInfo::file("main", "rs"),
                        marked,
                    ],
                ))
                .with_content("/", "readme.md", b"# readme"),
        )
    }

    fn pane(backend: Arc<FakeBackend>) -> (PaneController, flume::Receiver<PaneEvent>) {
        let (tx, rx) = flume::unbounded();
        let pane = PaneController::new(
            PaneId::Left,
            backend,
            &ViewConfig::default(),
            IconCache::shared(16),
            NavigationContext::new(PaneId::Left),
            tx,
        )
        .expect("pane");
        (pane, rx)
    }

    fn names(pane: &PaneController) -> Vec<String> {
        pane.window()
            .snapshot()
            .rows
            .iter()
            .map(|r| r.item.name.clone())
            .collect()
    }

    #[test]
    fn test_template_requires_slots() {
        let (tx, _rx) = flume::unbounded();
        let result = PaneController::with_template(
            PaneId::Right,
            Arc::new(FakeBackend::new()),
            RowTemplate::new(20.0).slot(SlotBinding::field("name", "name")),
            &ViewConfig::default(),
            IconCache::shared(1),
            NavigationContext::default(),
            tx,
        );
        assert!(matches!(result, Err(Error::Template { .. })));
    }

    #[tokio::test]
    async fn test_open_updates_tab_and_address() {
        let (pane, rx) = pane(backend());
        assert!(pane.set_address("/").await.expect("open"));

        assert_eq!(names(&pane), vec!["src", "readme"]);
        assert_eq!(pane.address().as_deref(), Some("/"));
        let tabs = pane.tabs();
        assert_eq!(tabs.active_tab().map(|t| t.name.as_str()), Some("root"));
        let events: Vec<PaneEvent> = rx.drain().collect();
        assert_eq!(
            events,
            vec![
                PaneEvent::AddressChanged {
                    pane: PaneId::Left,
                    path: "/".to_string()
                },
                PaneEvent::TabsChanged(PaneId::Left),
            ]
        );
    }

    #[tokio::test]
    async fn test_typed_address_lists_directory() {
        let backend = backend();
        let (pane, _rx) = pane(backend.clone());
        pane.set_address("/").await.expect("open");
        assert_eq!(backend.list_calls(), 1);

        assert!(pane.submit_address("  /src ").await.expect("submit"));
        assert_eq!(backend.list_calls(), 2);
        assert_eq!(pane.address().as_deref(), Some("/src"));
        assert_eq!(names(&pane), vec!["..", "main", "marked"]);
        assert_eq!(pane.tabs().active_tab().map(|t| t.name.as_str()), Some("src"));
    }

    #[tokio::test]
    async fn test_blank_address_is_ignored() {
        let backend = backend();
        let (pane, rx) = pane(backend.clone());
        pane.set_address("/").await.expect("open");
        rx.drain().for_each(drop);

        assert!(!pane.submit_address("   ").await.expect("submit"));
        assert_eq!(backend.list_calls(), 1);
        assert_eq!(pane.address().as_deref(), Some("/"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_enter_directory_and_back() {
        let backend = backend();
        let (pane, _rx) = pane(backend.clone());
        pane.set_address("/").await.expect("open");

        let outcome = pane
            .handle_key(KeyInput::plain(KeyCode::Enter))
            .await
            .expect("enter");
        assert_eq!(outcome, KeyOutcome::Delegated);
        assert_eq!(pane.address().as_deref(), Some("/src"));
        assert_eq!(names(&pane), vec!["..", "main", "marked"]);
        // the row the service marked active gets focus
        assert_eq!(pane.window().active_index(), 2);
        assert_eq!(pane.window().focus_state(), Focus::Row(2));

        pane.handle_key(KeyInput::new(KeyCode::PageUp, Modifiers::CONTROL))
            .await
            .expect("parent");
        assert_eq!(pane.address().as_deref(), Some("/"));
        assert_eq!(backend.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_enter_file_emits_open() {
        let (pane, rx) = pane(backend());
        pane.set_address("/").await.expect("open");
        pane.window().focus_row_by_index(1usize).await.expect("focus");
        rx.drain().for_each(drop);

        assert_eq!(pane.enter_directory().await.expect("enter"), EnterOutcome::File);
        assert_eq!(
            rx.try_recv().expect("event"),
            PaneEvent::OpenFile {
                pane: PaneId::Left,
                path: Some("/".to_string()),
                key: "readme.md".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_double_click_enters_directory() {
        let (pane, _rx) = pane(backend());
        pane.set_address("/").await.expect("open");
        pane.double_click(0).await.expect("double click");
        assert_eq!(pane.address().as_deref(), Some("/src"));
    }

    #[tokio::test]
    async fn test_tab_key_focuses_other_pane() {
        let (pane, rx) = pane(backend());
        pane.set_address("/").await.expect("open");
        rx.drain().for_each(drop);

        pane.handle_key(KeyInput::plain(KeyCode::Tab)).await.expect("tab");
        assert_eq!(rx.try_recv().expect("event"), PaneEvent::FocusPane(PaneId::Right));
    }

    #[tokio::test]
    async fn test_ctrl_t_opens_tab() {
        let (pane, _rx) = pane(backend());
        pane.set_address("/").await.expect("open");

        pane.handle_key(KeyInput::parse("t", Modifiers::CONTROL))
            .await
            .expect("new tab");
        let tabs = pane.tabs();
        assert_eq!(tabs.tabs.len(), 2);
        assert_eq!(tabs.active_tab().and_then(|t| t.path.as_deref()), Some("/"));
    }

    #[tokio::test]
    async fn test_preview_reads_every_time() {
        let backend = backend();
        let (pane, rx) = pane(backend.clone());
        pane.set_address("/").await.expect("open");
        pane.window().focus_row_by_index(1usize).await.expect("focus");
        rx.drain().for_each(drop);

        pane.handle_key(KeyInput::plain(KeyCode::Function(3)))
            .await
            .expect("preview");
        let content = pane.preview().await.expect("preview");

        assert_eq!(content.as_deref(), Some(&b"# readme"[..]));
        assert_eq!(
            backend.read_calls.load(std::sync::atomic::Ordering::SeqCst),
            2
        );
        assert!(matches!(
            rx.try_recv().expect("event"),
            PaneEvent::Preview { ref name, .. } if name == "readme"
        ));
    }

    #[tokio::test]
    async fn test_listing_failure_is_reported() {
        let (pane, rx) = pane(backend());
        let result = pane.set_address("/missing").await;
        assert!(result.is_err());
        assert!(matches!(
            rx.try_recv().expect("event"),
            PaneEvent::ListingFailed { pane: PaneId::Left, .. }
        ));
        assert_eq!(pane.address(), None);
    }

    #[tokio::test]
    async fn test_select_and_close_tabs() {
        let (pane, _rx) = pane(backend());
        pane.set_address("/").await.expect("open");
        let first = pane.tabs().active_tab;
        pane.new_tab();
        pane.set_address("/src").await.expect("open");

        assert!(pane.select_tab(first).await.expect("select"));
        assert_eq!(pane.address().as_deref(), Some("/"));

        assert!(pane.close_tab(first).await.expect("close"));
        assert_eq!(pane.address().as_deref(), Some("/src"));
        assert!(!pane.close_tab(pane.tabs().active_tab).await.expect("close"));
    }
}
