//! # Range Types
//!
//! - **`text`**: [`Position`] and [`TextRange`], raw selection endpoints.
//! - **`word`**: [`WordPoint`] and [`WordRange`], the in-memory canonical form.
//! - **`sequence`**: [`SequencePoint`] and [`SequenceRange`], persisted and
//!   totally ordered.
//! - **`xpath`**: [`XPathPoint`] and [`XPathRange`], persisted, unordered.
//!
//! Conversions all go through [`WordRange`]:
//!
//! ```text
//! TextRange -> WordRange -> SequenceRange | XPathRange
//! SequenceRange | XPathRange -> WordRange -> TextRange
//! ```

pub mod sequence;
pub mod text;
pub mod word;
pub mod xpath;

pub use sequence::{SequencePoint, SequenceRange};
pub use text::{Position, TextRange};
pub use word::{WordPoint, WordRange};
pub use xpath::{XPathPoint, XPathRange};
