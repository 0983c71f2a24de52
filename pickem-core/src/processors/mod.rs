//! Long-running background processors.
//!
//! - `HeadlineImporter`: refreshes stored headlines from external RSS
//!   feeds, on a steady interval and on demand via `HeadlineRefresh`.

pub mod headline_importer;

pub use headline_importer::{HeadlineImporter, ImportError};
