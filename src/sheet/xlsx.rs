// Excel workbook codec
// Reads with calamine, writes with rust_xlsxwriter

use super::{SheetCodec, NAME_COLUMN, TEXT_COLUMN};
use crate::error::{StoreError, StoreResult};
use crate::state::Annotation;
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::error::Error as StdError;
use std::io;
use std::path::Path;

const TEXT_COLUMN_WIDTH: f64 = 60.0;

/// `.xlsx` workbook with a `Name` / `Annotation` header on the first sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxSheet;

impl SheetCodec for XlsxSheet {
    fn read(&self, path: &Path) -> StoreResult<Vec<Annotation>> {
        let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(path, e))?;
        let Some(range) = workbook.worksheet_range_at(0) else {
            return Ok(Vec::new());
        };
        let range = range.map_err(|e| workbook_error(path, e))?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };
        let name_col = column_index(header, NAME_COLUMN).ok_or_else(|| missing_column(path))?;
        let text_col = column_index(header, TEXT_COLUMN).ok_or_else(|| missing_column(path))?;

        Ok(rows
            .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)))
            .map(|row| Annotation::new(cell_text(row, name_col), cell_text(row, text_col)))
            .collect())
    }

    fn write(&self, path: &Path, rows: &[Annotation]) -> StoreResult<()> {
        let err = |e: XlsxError| StoreError::io(path, io::Error::other(e.to_string()));

        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet
            .write_string_with_format(0, 0, NAME_COLUMN, &header)
            .map_err(err)?;
        sheet
            .write_string_with_format(0, 1, TEXT_COLUMN, &header)
            .map_err(err)?;
        sheet.set_column_width(1, TEXT_COLUMN_WIDTH).map_err(err)?;

        for (idx, annotation) in rows.iter().enumerate() {
            let row = u32::try_from(idx + 1).map_err(|_| {
                StoreError::InvalidInput(format!("too many annotations to export ({})", rows.len()))
            })?;
            sheet
                .write_string(row, 0, annotation.name.as_str())
                .map_err(err)?;
            sheet
                .write_string(row, 1, annotation.text.as_str())
                .map_err(err)?;
        }

        workbook.save(path).map_err(err)?;
        Ok(())
    }
}

fn column_index(header: &[Data], title: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| cell.to_string().trim() == title)
}

fn cell_text(row: &[Data], idx: usize) -> String {
    row.get(idx).map(|cell| cell.to_string()).unwrap_or_default()
}

fn missing_column(path: &Path) -> StoreError {
    StoreError::malformed(
        path,
        format!("workbook must have '{NAME_COLUMN}' and '{TEXT_COLUMN}' columns"),
    )
}

fn workbook_error(path: &Path, e: calamine::Error) -> StoreError {
    match e {
        calamine::Error::Io(source) | calamine::Error::Xlsx(calamine::XlsxError::Io(source)) => {
            StoreError::io(path, source)
        }
        // zip archive failures wrap the io error one level deeper
        other => match io_cause(&other) {
            Some(cause) => StoreError::io(path, io::Error::new(cause.kind(), cause.to_string())),
            None => StoreError::malformed(path, other.to_string()),
        },
    }
}

fn io_cause<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a io::Error> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return Some(io_err);
        }
        current = e.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AnnotationStore, ConflictChoice};

    fn write_raw(path: &Path, rows: &[[&str; 2]]) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_write_then_read_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.xlsx");
        let rows = vec![
            Annotation::new("greeting", "Hello,\nthanks for reaching out."),
            Annotation::new("sig", "Regards"),
        ];

        XlsxSheet.write(&path, &rows).unwrap();
        assert_eq!(XlsxSheet.read(&path).unwrap(), rows);
    }

    #[test]
    fn test_read_accepts_swapped_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swapped.xlsx");
        write_raw(&path, &[["Annotation", "Name"], ["body", "key"]]);

        assert_eq!(XlsxSheet.read(&path).unwrap(), vec![Annotation::new("key", "body")]);
    }

    #[test]
    fn test_read_missing_column_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");
        write_raw(&path, &[["Name", "Text"], ["a", "b"]]);

        let err = XlsxSheet.read(&path).unwrap_err();
        assert!(matches!(err, StoreError::MalformedSource { .. }));
        assert!(err.to_string().contains("'Annotation'"));
    }

    #[test]
    fn test_read_in_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("gone.xlsx");

        let err = XlsxSheet.read(&path).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn test_load_unreadable_workbook_is_io_error_and_keeps_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folder.xlsx");
        std::fs::create_dir(&path).unwrap();

        let mut store = AnnotationStore::new();
        store.add("keep", "me").unwrap();
        let err = store.load_from(&XlsxSheet, &path).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got {err:?}");
        assert_eq!(store.list(), vec!["keep"]);
    }

    #[test]
    fn test_read_header_only_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header.xlsx");
        write_raw(&path, &[["Name", "Annotation"]]);

        assert!(XlsxSheet.read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_skips_fully_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaps.xlsx");
        write_raw(
            &path,
            &[["Name", "Annotation"], ["a", "one"], ["", ""], ["b", ""]],
        );

        let rows = XlsxSheet.read(&path).unwrap();
        assert_eq!(rows, vec![Annotation::new("a", "one"), Annotation::new("b", "")]);
    }

    #[test]
    fn test_store_round_trip_through_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.xlsx");

        let mut store = AnnotationStore::new();
        store.add("b", "two").unwrap();
        store.add("a", "one").unwrap();
        let before = store.export_all();

        assert!(store.save_to(&XlsxSheet, &path).unwrap());
        store.clear();
        store.load_from(&XlsxSheet, &path).unwrap();
        assert_eq!(store.export_all(), before);
    }

    #[test]
    fn test_import_workbook_into_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.xlsx");
        write_raw(&path, &[["Name", "Annotation"], ["A", "y"], ["C", "z"]]);

        let mut store = AnnotationStore::new();
        store.add("A", "x").unwrap();
        let rows = XlsxSheet.read(&path).unwrap();
        let report = store.import_from(rows, |_| ConflictChoice::Skip);

        assert_eq!(report.inserted, 1);
        assert_eq!(store.get("A"), Some("x"));
        assert_eq!(store.get("C"), Some("z"));
    }

    #[test]
    fn test_load_malformed_workbook_keeps_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");
        write_raw(&path, &[["Title", "Body"], ["a", "b"]]);

        let mut store = AnnotationStore::new();
        store.add("keep", "me").unwrap();
        assert!(store.load_from(&XlsxSheet, &path).is_err());
        assert_eq!(store.list(), vec!["keep"]);
    }
}
