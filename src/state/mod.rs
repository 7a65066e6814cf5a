//! Domain state for the annotation app.
//!
//! - `store` - the annotation library and its workbook boundary
//! - `composer` - replace/accumulate composition of the display text
//! - `grid` - button grid projection of the library

mod composer;
mod grid;
mod store;

pub use composer::*;
pub use grid::*;
pub use store::*;
