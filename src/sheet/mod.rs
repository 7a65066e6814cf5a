// Workbook persistence for the annotation library

pub mod xlsx;

use crate::error::StoreResult;
use crate::state::Annotation;
use std::path::Path;

pub use xlsx::XlsxSheet;

/// Header of the column holding annotation names.
pub const NAME_COLUMN: &str = "Name";
/// Header of the column holding annotation text.
pub const TEXT_COLUMN: &str = "Annotation";

/// Reads and writes the two-column annotation table.
///
/// Implementations report a missing header column as
/// [`StoreError::MalformedSource`](crate::error::StoreError::MalformedSource)
/// and return rows in file order; sorting is left to the store.
pub trait SheetCodec {
    fn read(&self, path: &Path) -> StoreResult<Vec<Annotation>>;
    fn write(&self, path: &Path, rows: &[Annotation]) -> StoreResult<()>;
}
