//! RenderWindow - Virtualized Row Engine
//!
//! Materializes only the rows intersecting the viewport and stands in for
//! the rest with chunked spacers, so the scroll extent is as if every row
//! existed.
//!
//! ## Cancellation
//!
//! Each data source replacement bumps a generation counter. A pass captures
//! the generation at start and re-checks it after every suspension; a pass
//! whose generation is no longer current returns without touching state.
//!
//! The state lock is never held across an `.await`.

use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::error::Result;

use super::binding::{BindContext, BoundSlot, IconSlot, Record, RowTemplate, SlotValue};
use super::data_source::{EmptyDataSource, SharedDataSource};
use super::icon_cache::{IconLoader, SharedIconCache};
use super::navigation::clamp_index;
use super::range::VisibleRange;
use super::spacer::Spacer;

/// Where input focus currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Focus is outside the window
    #[default]
    Blurred,
    /// The scroll container itself
    Container,
    /// A rendered row
    Row(usize),
}

/// Index to focus, possibly computed later
pub enum RowTarget {
    Index(i64),
    /// The last row of the current source
    Last,
    /// An index produced by an async computation
    Deferred(BoxFuture<'static, Result<i64>>),
}

impl From<usize> for RowTarget {
    fn from(index: usize) -> Self {
        RowTarget::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

/// A materialized row
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow<T> {
    pub index: usize,
    pub item: T,
    pub slots: Vec<BoundSlot>,
}

impl<T> RenderedRow<T> {
    /// Value bound to slot `id`
    pub fn slot(&self, id: &str) -> Option<&SlotValue> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.value)
    }
}

/// Point-in-time view of the engine for rendering
#[derive(Debug, Clone)]
pub struct WindowSnapshot<T> {
    pub range: VisibleRange,
    pub length: usize,
    pub rows: Arc<Vec<RenderedRow<T>>>,
    pub space_above: Spacer,
    pub space_below: Spacer,
    pub active_index: usize,
    pub focus: Focus,
    pub row_height: f64,
    pub scroll_top: f64,
    /// Bumped whenever the engine moves the scroll offset itself
    pub scroll_revision: u64,
    /// Bumped whenever the rendered rows change
    pub render_revision: u64,
}

struct WindowState<T> {
    source: SharedDataSource<T>,
    generation: u64,
    scroll_top: f64,
    viewport_height: f64,
    scroll_revision: u64,
    length: usize,
    rendered: Option<VisibleRange>,
    rows: Arc<Vec<RenderedRow<T>>>,
    space_above: Spacer,
    space_below: Spacer,
    active_index: usize,
    focus: Focus,
    render_revision: u64,
    icon_loader: Option<Arc<dyn IconLoader>>,
}

impl<T> WindowState<T> {
    fn max_scroll(&self, row_height: f64) -> f64 {
        (self.length as f64 * row_height - self.viewport_height).max(0.0)
    }

    /// Move the scroll offset on the engine's own initiative
    fn scroll_to(&mut self, scroll_top: f64) -> bool {
        if scroll_top == self.scroll_top {
            return false;
        }
        self.scroll_top = scroll_top;
        self.scroll_revision += 1;
        true
    }
}

/// Handle to a render window; clones share the same window
pub struct RenderWindow<T> {
    template: Arc<RowTemplate>,
    icons: SharedIconCache,
    state: Arc<Mutex<WindowState<T>>>,
}

impl<T> Clone for RenderWindow<T> {
    fn clone(&self) -> Self {
        Self {
            template: Arc::clone(&self.template),
            icons: Arc::clone(&self.icons),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> RenderWindow<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    /// Create a window over an empty source
    ///
    /// Fails when the template is structurally unusable.
    pub fn new(template: RowTemplate, viewport_height: f64, icons: SharedIconCache) -> Result<Self> {
        template.validate()?;
        let state = WindowState {
            source: EmptyDataSource::shared(),
            generation: 0,
            scroll_top: 0.0,
            viewport_height: viewport_height.max(0.0),
            scroll_revision: 0,
            length: 0,
            rendered: None,
            rows: Arc::new(Vec::new()),
            space_above: Spacer::NONE,
            space_below: Spacer::NONE,
            active_index: 0,
            focus: Focus::Blurred,
            render_revision: 0,
            icon_loader: None,
        };
        Ok(Self {
            template: Arc::new(template),
            icons,
            state: Arc::new(Mutex::new(state)),
        })
    }

    pub fn template(&self) -> &RowTemplate {
        &self.template
    }

    pub fn icons(&self) -> &SharedIconCache {
        &self.icons
    }

    /// The current data source
    pub fn data_source(&self) -> SharedDataSource<T> {
        Arc::clone(&self.state.lock().source)
    }

    /// Generation of the current data source
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    pub fn active_index(&self) -> usize {
        self.state.lock().active_index
    }

    pub fn focus_state(&self) -> Focus {
        self.state.lock().focus
    }

    /// Whole rows that fit the viewport, at least one
    pub fn rows_per_page(&self) -> usize {
        let viewport_height = self.state.lock().viewport_height;
        ((viewport_height / self.template.row_height()).floor() as usize).max(1)
    }

    pub fn set_icon_loader(&self, loader: Arc<dyn IconLoader>) {
        self.state.lock().icon_loader = Some(loader);
    }

    pub fn snapshot(&self) -> WindowSnapshot<T> {
        let s = self.state.lock();
        WindowSnapshot {
            range: s.rendered.unwrap_or(VisibleRange::EMPTY),
            length: s.length,
            rows: Arc::clone(&s.rows),
            space_above: s.space_above.clone(),
            space_below: s.space_below.clone(),
            active_index: s.active_index,
            focus: s.focus,
            row_height: self.template.row_height(),
            scroll_top: s.scroll_top,
            scroll_revision: s.scroll_revision,
            render_revision: s.render_revision,
        }
    }

    /// Record a scroll offset reported by the view
    pub fn set_scroll_top(&self, scroll_top: f64) {
        let mut s = self.state.lock();
        s.scroll_top = if scroll_top.is_finite() { scroll_top.max(0.0) } else { 0.0 };
    }

    /// Record a new viewport height reported by the view
    pub fn resize(&self, viewport_height: f64) {
        let mut s = self.state.lock();
        s.viewport_height = if viewport_height.is_finite() {
            viewport_height.max(0.0)
        } else {
            0.0
        };
    }

    /// Scroll and re-run the windowing pass
    pub async fn scroll_to(&self, scroll_top: f64) -> Result<VisibleRange> {
        self.set_scroll_top(scroll_top);
        self.populate().await
    }

    /// Replace the data source and run a fresh windowing pass
    ///
    /// Resolves once the first pass completes or is itself superseded.
    pub async fn set_data_source(&self, source: SharedDataSource<T>) -> Result<VisibleRange> {
        let generation = {
            let mut s = self.state.lock();
            s.generation += 1;
            s.source = source;
            s.rendered = None;
            s.rows = Arc::new(Vec::new());
            s.space_above = Spacer::NONE;
            s.space_below = Spacer::NONE;
            s.length = 0;
            s.active_index = 0;
            s.scroll_to(0.0);
            if s.focus != Focus::Blurred {
                s.focus = Focus::Container;
            }
            s.render_revision += 1;
            s.generation
        };
        tracing::debug!(generation, "Data source replaced");
        self.populate().await
    }

    /// Run one windowing pass
    ///
    /// Returns the committed range, or [`VisibleRange::EMPTY`] when the pass
    /// was abandoned because the data source was replaced meanwhile.
    pub async fn populate(&self) -> Result<VisibleRange> {
        let (source, generation) = {
            let s = self.state.lock();
            (Arc::clone(&s.source), s.generation)
        };
        let row_height = self.template.row_height();

        let length = match source.length().await {
            Ok(length) => length,
            Err(_) if !self.is_current(generation) => return Ok(self.abandon(generation)),
            Err(e) => return Err(e),
        };

        let range = {
            let mut s = self.state.lock();
            if s.generation != generation {
                drop(s);
                return Ok(self.abandon(generation));
            }
            s.length = length;
            let max_scroll = s.max_scroll(row_height);
            if s.scroll_top > max_scroll {
                s.scroll_to(max_scroll);
            }
            let range = VisibleRange::compute(s.scroll_top, s.viewport_height, row_height, length);
            if s.rendered == Some(range) {
                tracing::trace!(%range, "Range unchanged");
                return Ok(range);
            }
            range
        };
        tracing::trace!(%range, length, generation, "Populating");

        let mut items = Vec::with_capacity(range.len());
        for index in range.indices() {
            let item = match source.item(index).await {
                Ok(item) => item,
                Err(_) if !self.is_current(generation) => return Ok(self.abandon(generation)),
                Err(e) => return Err(e),
            };
            if !self.is_current(generation) {
                return Ok(self.abandon(generation));
            }
            let Some(item) = item else {
                tracing::debug!(index, "Item not available, pass abandoned");
                return Ok(VisibleRange::EMPTY);
            };
            items.push((index, item));
        }

        let icon_base = source.icon_base();
        let rows: Vec<RenderedRow<T>> = {
            let icons = self.icons.lock();
            let cx = BindContext {
                icon_base: icon_base.as_deref(),
                icons: &icons,
            };
            items
                .into_iter()
                .map(|(index, item)| RenderedRow {
                    index,
                    slots: self.template.bind(&item, &cx),
                    item,
                })
                .collect()
        };

        let mut s = self.state.lock();
        if s.generation != generation {
            drop(s);
            return Ok(self.abandon(generation));
        }
        s.rendered = Some(range);
        s.rows = Arc::new(rows);
        s.space_above = Spacer::new(range.start as u64, row_height);
        s.space_below = Spacer::new((length - range.end) as u64, row_height);
        if matches!(s.focus, Focus::Row(index) if !range.contains(index)) {
            s.focus = Focus::Container;
        }
        s.render_revision += 1;
        tracing::debug!(%range, length, "Rows committed");
        Ok(range)
    }

    fn abandon(&self, generation: u64) -> VisibleRange {
        tracing::trace!(generation, "Stale pass abandoned");
        VisibleRange::EMPTY
    }

    /// Make `target` the active row and focus it
    ///
    /// Scrolls the row into view first when it is not rendered. Returns
    /// `false` when there is nothing to focus or the source was replaced.
    pub async fn focus_row_by_index(&self, target: impl Into<RowTarget>) -> Result<bool> {
        let (source, generation) = {
            let s = self.state.lock();
            (Arc::clone(&s.source), s.generation)
        };
        let row_height = self.template.row_height();

        let length = match source.length().await {
            Ok(length) => length,
            Err(_) if !self.is_current(generation) => return Ok(false),
            Err(e) => return Err(e),
        };
        let requested = match target.into() {
            RowTarget::Index(index) => index,
            RowTarget::Last => i64::try_from(length).unwrap_or(i64::MAX) - 1,
            RowTarget::Deferred(index) => index.await?,
        };
        let Some(index) = clamp_index(requested, length) else {
            return Ok(false);
        };

        let needs_pass = {
            let mut s = self.state.lock();
            if s.generation != generation {
                return Ok(false);
            }
            s.length = length;
            s.active_index = index;
            let rendered = s.rendered;
            let viewport_height = s.viewport_height;
            match rendered {
                Some(range) if range.contains(index) => false,
                Some(range) if index >= range.end => {
                    let bottom = (index + 1) as f64 * row_height;
                    s.scroll_to((bottom - viewport_height).max(0.0));
                    true
                }
                _ => {
                    s.scroll_to(index as f64 * row_height);
                    true
                }
            }
        };
        if needs_pass {
            self.populate().await?;
        }
        self.focus_rendered(index, generation).await
    }

    /// Focus a rendered row, nudging the scroll so it is fully visible
    async fn focus_rendered(&self, index: usize, generation: u64) -> Result<bool> {
        let row_height = self.template.row_height();
        let scrolled = {
            let mut s = self.state.lock();
            if s.generation != generation || !s.rendered.is_some_and(|r| r.contains(index)) {
                return Ok(false);
            }
            s.focus = Focus::Row(index);

            let top = index as f64 * row_height;
            let bottom = top + row_height;
            let scroll_top = if top < s.scroll_top {
                top
            } else if bottom > s.scroll_top + s.viewport_height {
                (bottom - s.viewport_height).max(0.0)
            } else {
                s.scroll_top
            };
            s.scroll_to(scroll_top)
        };
        if scrolled {
            self.populate().await?;
        }
        Ok(self.is_current(generation))
    }

    /// Restore focus to the active row
    ///
    /// Focus moves to the container first; the active row is focused after
    /// yielding once so pending layout settles.
    pub async fn focus(&self) -> Result<bool> {
        let active = {
            let mut s = self.state.lock();
            s.focus = Focus::Container;
            s.active_index
        };
        smol::future::yield_now().await;
        self.focus_row_by_index(active).await
    }

    /// A rendered row was focused directly, e.g. by a click
    pub fn focus_in(&self, index: usize) -> bool {
        let mut s = self.state.lock();
        if !s.rendered.is_some_and(|r| r.contains(index)) {
            return false;
        }
        s.active_index = index;
        s.focus = Focus::Row(index);
        true
    }

    pub fn blur(&self) {
        self.state.lock().focus = Focus::Blurred;
    }

    /// Load the primary icons of rendered rows still showing an alternate
    ///
    /// Returns how many slots were swapped.
    pub async fn load_pending_icons(&self) -> Result<usize> {
        let (loader, pending) = {
            let s = self.state.lock();
            let Some(loader) = s.icon_loader.clone() else {
                return Ok(0);
            };
            let urls = s
                .rows
                .iter()
                .flat_map(|row| row.slots.iter())
                .filter_map(|slot| match &slot.value {
                    SlotValue::Icon(icon) => icon.pending_url(),
                    _ => None,
                });
            let mut pending: Vec<String> = Vec::new();
            for url in urls {
                if !pending.iter().any(|p| p == url) {
                    pending.push(url.to_string());
                }
            }
            (loader, pending)
        };

        for url in pending {
            if self.icons.lock().contains(&url) {
                continue;
            }
            match loader.load(url.clone()).await {
                Ok(icon) => {
                    if let Some(evicted) = self.icons.lock().insert(url, icon) {
                        tracing::trace!(%evicted, "Icon evicted");
                    }
                }
                Err(e) => tracing::debug!(%url, "Icon load failed: {}", e),
            }
        }

        let mut s = self.state.lock();
        let icons = self.icons.lock();
        let mut swapped = 0;
        for row in Arc::make_mut(&mut s.rows).iter_mut() {
            for slot in row.slots.iter_mut() {
                let resolved = match &slot.value {
                    SlotValue::Icon(IconSlot::Pending { primary, .. }) => icons
                        .get(primary)
                        .map(|icon| (primary.clone(), icon.clone())),
                    _ => None,
                };
                if let Some((url, icon)) = resolved {
                    slot.value = SlotValue::Icon(IconSlot::Cached { url, icon });
                    swapped += 1;
                }
            }
        }
        if swapped > 0 {
            s.render_revision += 1;
        }
        Ok(swapped)
    }
}
