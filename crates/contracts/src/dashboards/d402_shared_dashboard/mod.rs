//! Public (token-shared) dashboard: domain records and wire types.

pub mod dto;
pub mod formula;
pub mod model;

pub use dto::*;
pub use formula::{FormulaNode, Operator};
pub use model::*;
