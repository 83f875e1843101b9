//! Documentation catalog and the content it references.
//!
//! The catalog is supplied as configuration; artifacts live under a
//! content root:
//!
//! ```text
//! <content_root>/
//! ├── README.md
//! ├── skills/
//! │   ├── build.md
//! │   └── deploy.md
//! └── runtime/
//!     └── runtime.md
//! ```

pub mod content;
pub mod registry;

pub use content::{ContentError, ContentSource, FsContentStore, DEFAULT_EXTENSIONS};
pub use registry::{Catalog, CatalogEntry, CatalogError, CatalogParseError, Category};
