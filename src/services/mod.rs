//! Service Layer
//!
//! The service layer provides abstraction over the backing service and
//! bridges its async I/O onto the tokio runtime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 RemoteDataSource / PaneController            │
//! └─────────────────────────────────────────────────────────────┘
//!                            │ list / read / fetch_icon
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │   Backend (trait)  ──►  HttpBackend (reqwest, bearer token)  │
//! │                         runs on the tokio bridge             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod backend;
mod runtime;

pub use backend::*;
pub use runtime::*;

#[cfg(test)]
pub(crate) use backend::fake;
