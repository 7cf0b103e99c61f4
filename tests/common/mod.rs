#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tempfile::{TempDir, tempdir};

/// Small locality dataset shared by the CLI and session tests.
pub const LISTINGS_CSV: &str = "\
Locality,Year,Price (₹),Demand Index
Baner,2020,\"50,00,000\",70
Baner,2021,\"60,00,000\",80
Wakad,2021,\"45,00,000\",65
Aundh,2022,\"₹ 80,00,000\",90
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

/// A cell written into a generated workbook.
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

/// Builds an xlsx file in memory. Each entry is a sheet name and its rows,
/// written from A1. A sheet with no rows is left empty.
pub fn xlsx_bytes(sheets: &[(&str, Vec<Vec<Cell<'_>>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet name");
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let (row, col) = (row_idx as u32, col_idx as u16);
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row, col, *text).expect("write string");
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row, col, *number).expect("write number");
                    }
                    Cell::Blank => {}
                }
            }
        }
    }
    workbook.save_to_buffer().expect("serialize workbook")
}
