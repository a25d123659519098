//! # Addressing
//!
//! Ways of naming a place in a document that survive reloading it.
//!
//! ## Modules
//!
//! - **`path`**: block paths (`/2/1/3`), ordinals of breaking elements.
//!   Orderable in document order.
//! - **`xpath`**: tag-indexed paths (`div[3]/p[5]`), optionally starting
//!   from an `id`. Readable but not orderable.
//! - **`words`**: `(words, chars)` offsets inside a reference element, and
//!   the walker that resolves them back to raw positions.

pub mod path;
pub mod words;
pub mod xpath;

pub use path::{BlockPath, path_from_node, resolve_path};
pub use words::{WordOffset, WordPointWalker, word_offset};
pub use xpath::{XPathExpr, resolve_xpath, xpath_from_node};
