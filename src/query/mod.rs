//! Query generation protocol.
//!
//! The pieces every dialect builder composes:
//! - [`QueryContext`]: immutable, builder-style bag of caller inputs
//! - [`Query`]: generated SQL text plus its ordered parameter list
//! - [`PredicateAssembler`]: conjunctive filter assembly with mechanically
//!   synchronized placeholder/parameter ordering
//! - [`RowWindow`]: validated pagination rank arithmetic

mod context;
mod predicate;
mod result;
mod window;

pub use context::{NamespaceFilter, QueryContext};
pub use predicate::{
    PlaceholderStyle, PredicateAssembler, escape_like_wildcards, glob_to_like_pattern,
};
pub use result::{Query, SqlParam};
pub use window::RowWindow;
