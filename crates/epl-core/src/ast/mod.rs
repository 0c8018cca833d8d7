//! Abstract syntax tree for EPL statements
//!
//! Every node is immutable after parsing and owned by its parent. Nodes that carry
//! their own span do so either through [`Spanned`](crate::span::Spanned) or a `span` field.

mod clause;
mod context;
mod expr;
mod match_recognize;
mod pattern;
mod statement;

pub use clause::*;
pub use context::*;
pub use expr::*;
pub use match_recognize::*;
pub use pattern::*;
pub use statement::*;
