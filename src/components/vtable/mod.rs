//! VTable - Virtualized Table
//!
//! Renders arbitrarily long sequences by materializing only the rows that
//! intersect the viewport.
//!
//! ## Layers
//!
//! ```text
//! DataSource (empty / array / generated / remote)
//!       │ length(), item(i)
//!       ▼
//! RenderWindow  ── RowTemplate + FieldTransform ──► RenderedRow
//!       │            IconCache (swap-on-load)
//!       ▼
//! NavigationController (keys, double click, callbacks)
//!       │
//!       ▼
//! VTableView (gpui, feature `gui`)
//! ```

pub mod binding;
pub mod data_source;
pub mod engine;
pub mod icon_cache;
pub mod navigation;
pub mod range;
pub mod remote;
pub mod spacer;
#[cfg(feature = "gui")]
pub mod view;

pub use binding::{
    BindContext, BoundSlot, FieldTransform, FieldValue, IconSlot, Record, RowTemplate,
    SlotBinding, SlotSource, SlotValue, SlotWidth,
};
pub use data_source::{
    ArrayDataSource, DataSource, EmptyDataSource, GeneratedDataSource, SharedDataSource,
};
pub use engine::{Focus, RenderWindow, RenderedRow, RowTarget, WindowSnapshot};
pub use icon_cache::{BackendIconLoader, IconCache, IconLoader, SharedIconCache};
pub use navigation::{KeyCode, KeyInput, KeyOutcome, Modifiers, NavigationController};
pub use range::VisibleRange;
pub use remote::RemoteDataSource;
pub use spacer::{Spacer, SpacerChunk};
#[cfg(feature = "gui")]
pub use view::VTableView;
