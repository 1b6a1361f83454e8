//! # folio_core
//!
//! Ordering, filtering and compilation for folders of Markdown notes.
//!
//! A folder's notes are presented as an outline whose order the user
//! controls, independent of how the filesystem lists them. Every note carries
//! a status and free-form fields in its frontmatter, views can be filtered by
//! both, and a folder (optionally with its subfolders) can be compiled into a
//! single document.
//!
//! ## Features
//!
//! - **User ordering**: Per-folder orderings of files and subfolders that
//!   survive renames, moves and deletions
//! - **Filtered views**: Status and name filters over an ordered projection
//! - **Metadata**: Status and property extraction from frontmatter, with
//!   two-phase writes
//! - **Compilation**: Deterministic concatenation of completed notes with
//!   headings that follow the folder hierarchy
//! - **Persistence**: Settings in a JSON file or a SQLite database
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio_core::store::JsonFileStore;
//! use folio_core::vault::LocalVault;
//! use folio_core::view::Filter;
//! use folio_core::workspace::Workspace;
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let vault = LocalVault::open(Path::new("/path/to/notes"))?;
//! let store = JsonFileStore::new("/path/to/notes/.folio.json");
//! let mut workspace = Workspace::open(&vault, &vault, &store).await?;
//!
//! workspace.select_container("Novel").await?;
//! let view = workspace.project(&Filter::status("writing"))?;
//! for entry in &view.items {
//!     println!("{} [{}]", entry.item.basename, entry.record.status);
//! }
//!
//! // Put the third note first.
//! workspace.reorder_item(2, 0).await?;
//!
//! let report = workspace.compile(None).await?;
//! println!("compiled {} notes into {}", report.item_count, report.path);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`order`]**: The two order tables and the sort rule applied everywhere
//! - **[`metadata`]**: Status and property extraction, field writes
//! - **[`reconcile`]**: Rewrites order tables after renames and deletions
//! - **[`view`]**: Ordered, filtered projections and reordering
//! - **[`compile`]**: Folder-to-document compilation
//! - **[`workspace`]**: The service tying the above to persisted settings
//! - **[`host`]**: Traits for the file tree and frontmatter services the
//!   core consumes, with [`vault`] as a directory-backed implementation
//! - **[`settings`]** and **[`store`]**: The persisted record and its stores
//!
//! ## Ordering
//!
//! Wherever siblings are sorted, each takes its position in the recorded
//! order for its folder. Siblings that were never recorded come after all
//! recorded ones, sorted by name. Recorded paths that no longer exist are
//! ignored until reconciliation prunes them.
//!
//! ## Error Handling
//!
//! All operations return [`FolioResult<T>`] wrapping [`FolioError`].
//! [`FolioError::kind`] groups errors into configuration problems, missing
//! targets, empty results and persistence failures. No error leaves the
//! workspace in a half-updated state.

pub mod compile;
pub mod domain;
pub mod error;
pub mod frontmatter;
pub mod host;
pub mod metadata;
pub mod order;
pub mod reconcile;
pub mod settings;
pub mod store;
pub mod tree;
pub mod vault;
pub mod view;
pub mod workspace;

/// Re-exports the most commonly used types for convenience.
pub use error::{ErrorKind, FolioError, FolioResult};
