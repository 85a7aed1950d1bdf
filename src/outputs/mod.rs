//! Output generation for per-article directories.
//!
//! # Submodules
//!
//! - [`json`]: Materializes an article's output directory and writes the raw
//!   record to `article.json`
//! - [`markdown`]: Renders `article.md` — a frontmatter header plus the body
//!   with media references rewritten to local filenames
//!
//! # Output Structure
//!
//! ```text
//! output_root/
//! └── posts/my-first-post/
//!     ├── article.json   # full original record, pretty-printed
//!     ├── article.md     # only when the record has a body
//!     └── cover.png      # one file per downloaded media asset
//! ```
//!
//! `article.json` and `article.md` are overwritten on every run; media files
//! are only written when absent.

pub mod json;
pub mod markdown;
