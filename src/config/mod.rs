//! Configuration parsing.
//!
//! The configuration grammar is nginx-like: `server { ... }` blocks with
//! nested `location <prefix> { ... }` blocks, one `key value...` directive
//! per line, `#` comments. Parsing happens exactly once at startup and is
//! fatal on any error; the resulting tree is immutable afterwards.
//!
//! - **`directive`**: per-directive classification and validation
//! - **`tree`**: comment stripping, block nesting, the server/location tree
//! - **`error`**: the fatal configuration error type

pub mod directive;
pub mod error;
pub mod tree;

pub use directive::{classify, Directive, DirectiveKind};
pub use error::ConfigError;
pub use tree::{build, LocationBlock, ServerBlock};
