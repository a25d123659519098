//! # Block Model
//!
//! Static classification of tag names into display roles, and the content
//! model saying which elements may hold which children.
//!
//! ## Modules
//!
//! - **`classify`**: `display_role` / `is_breaking`. Breaking (block) elements
//!   separate words and are the only elements counted in block paths.
//! - **`content`**: `ContentModel` and `violations` for misnested markup.
//!
//! ## Key Invariants
//!
//! - Lookups are case-insensitive.
//! - Unknown tags are never breaking.
//! - Every persisted sequence address depends on the breaking table, so it is
//!   versioned by [`MODEL_VERSION`] and must not change silently.

pub mod classify;
pub mod content;

pub use classify::{DisplayRole, MODEL_VERSION, display_role, is_breaking};
pub use content::{ContentModel, Violation, violations};
