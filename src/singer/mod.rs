//! Singer protocol surface: catalog discovery, message output and state.

pub mod catalog;
pub mod sink;
pub mod state;
pub mod sync;

pub use catalog::{discover, Catalog, CatalogEntry, MetadataEntry};
pub use sink::{SingerWriter, Sink};
pub use state::{Bookmark, State};
pub use sync::{sync, SyncStats};
