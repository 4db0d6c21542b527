//! Docsplice - inject crate metadata into rustdoc pages.
//!
//! Each configured crate page gets, at the top of its documentation block:
//! a metadata list (source link + license), an install command or
//! dependency list, an optional code size section and a "Verified with"
//! section. The crate's own doc headings move one level down below a new
//! "Description" heading.
//!
//! ```ignore
//! let html = std::fs::read_to_string("target/doc/my_crate/index.html")?;
//! if let Some(out) = docsplice::inject_page(&html, &inputs, &Variant::default()) {
//!     std::fs::write("target/doc/my_crate/index.html", out)?;
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dom;
pub mod inject;
pub mod logger;
pub mod manifest;
pub mod toc;
pub mod utils;

pub use inject::{PageInputs, Variant, inject_page};
