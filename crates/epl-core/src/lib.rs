//! # EPL Core
//!
//! Syntax tree and source-location types for the EPL event-processing language.
//!
//! The parser crate produces these types; later phases (semantic analysis, planning)
//! consume them. Nothing here depends on the parser.
//!
//! ## Modules
//!
//! - [`ast`]: statements, clauses, expressions, temporal patterns, row patterns and contexts
//! - [`span`]: byte spans and line/column lookup for diagnostics
//! - [`types`]: declared type names (`int`, `com.acme.Order`, `long[]`)
//! - [`keywords`]: the reserved-word list, used to decide when a name needs backticks
//!
//! Every AST node implements [`std::fmt::Display`], printing EPL text that parses back
//! to the same tree:
//!
//! ```rust
//! use epl_core::{Chain, ExprKind, Span};
//!
//! let expr = ExprKind::Chain(Chain::property("select", Span::dummy()));
//! assert_eq!(expr.to_string(), "`select`");
//! ```

pub mod ast;
mod display;
pub mod keywords;
pub mod span;
pub mod types;

pub use ast::*;
pub use span::{line_col, Span, Spanned};
pub use types::{ArrayDimension, TypeName};
