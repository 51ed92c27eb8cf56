//! Excelブックからの抽出
//!
//! セル値は calamine、塗りつぶし色は `fills` で読む。

use super::column::resolve_position;
use super::fills::{FillReader, SheetFills};
use super::{ColumnSelector, ExtractOptions, SheetLabels};
use crate::error::{Result, ShelfLayoutError};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;

/// 読み込み済みのExcelブック
pub struct SourceWorkbook {
    workbook: Xlsx<Cursor<Vec<u8>>>,
    fills: FillReader,
}

/// 日付セルの表記
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// セル値 → 文字列（空・エラー値は `None`）
///
/// 整数値の数値セルは `.0` を付けない。真偽値は `True` / `False`、
/// 日付は `YYYY-MM-DD HH:MM:SS`。
pub fn cell_text(value: &Data) -> Option<String> {
    match value {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Bool(true) => Some("True".to_string()),
        Data::Bool(false) => Some("False".to_string()),
        Data::DateTime(dt) if dt.is_datetime() => Some(
            dt.as_datetime()
                .map(|d| d.format(DATETIME_FORMAT).to_string())
                .unwrap_or_else(|| dt.to_string()),
        ),
        Data::DateTimeIso(s) => Some(s.replacen('T', " ", 1)),
        other => Some(other.to_string()),
    }
}

impl SourceWorkbook {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShelfLayoutError::FileNotFound(path.display().to_string()));
        }
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let fills = FillReader::from_bytes(bytes.clone())?;
        let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
        Ok(Self { workbook, fills })
    }

    /// シート名（ブック内の順）
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シート名を解決（省略時は先頭シート）
    pub fn resolve_sheet(&self, sheet: Option<&str>) -> Result<String> {
        let names = self.sheet_names();
        match sheet {
            Some(name) if names.iter().any(|n| n == name) => Ok(name.to_string()),
            Some(name) => Err(ShelfLayoutError::SheetNotFound(name.to_string())),
            None => names
                .into_iter()
                .next()
                .ok_or_else(|| ShelfLayoutError::InputRead("シートがありません".into())),
        }
    }

    fn range(&mut self, sheet: &str) -> Result<Range<Data>> {
        if !self.sheet_names().iter().any(|n| n == sheet) {
            return Err(ShelfLayoutError::SheetNotFound(sheet.to_string()));
        }
        Ok(self.workbook.worksheet_range(sheet)?)
    }

    fn sheet_fills(&mut self, sheet: &str, options: &ExtractOptions) -> Result<SheetFills> {
        if options.resolve_fills {
            self.fills.sheet_fills(sheet)
        } else {
            Ok(SheetFills::default())
        }
    }

    /// シートの全セルを行優先で走査する
    pub fn scan_sheet(&mut self, sheet: &str, options: &ExtractOptions) -> Result<SheetLabels> {
        let range = self.range(sheet)?;
        let fills = self.sheet_fills(sheet, options)?;
        let (row0, col0) = range.start().unwrap_or((0, 0));

        let mut labels = Vec::new();
        for (r, row) in range.rows().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let Some(text) = cell_text(value) else {
                    continue;
                };
                let fill = fills.get(row0 + r as u32, col0 + c as u32, options.theme_fill);
                if let Some(label) = options.accept(&text, fill) {
                    labels.push(label);
                }
            }
        }

        Ok(SheetLabels { name: sheet.to_string(), labels })
    }

    /// 全シートを個別に走査する（ブック内の順）
    pub fn scan_all(&mut self, options: &ExtractOptions) -> Result<Vec<SheetLabels>> {
        self.sheet_names()
            .iter()
            .map(|name| self.scan_sheet(name, options))
            .collect()
    }

    /// シートの1列を抽出する
    pub fn extract_column(
        &mut self,
        sheet: &str,
        selector: &ColumnSelector,
        has_header: bool,
        options: &ExtractOptions,
    ) -> Result<SheetLabels> {
        let range = self.range(sheet)?;
        let fills = self.sheet_fills(sheet, options)?;
        let (row0, col0) = range.start().unwrap_or((0, 0));

        let mut rows = range.rows().enumerate();
        let header: Option<Vec<String>> = if has_header {
            rows.next().map(|(_, row)| {
                row.iter().map(|v| cell_text(v).unwrap_or_default()).collect()
            })
        } else {
            None
        };

        let mut labels = Vec::new();
        if let Some(position) = resolve_position(selector, header.as_deref(), col0)? {
            for (r, row) in rows {
                let Some(text) = row.get(position).and_then(cell_text) else {
                    continue;
                };
                let fill = fills.get(row0 + r as u32, col0 + position as u32, options.theme_fill);
                if let Some(label) = options.accept(&text, fill) {
                    labels.push(label);
                }
            }
        }

        Ok(SheetLabels { name: sheet.to_string(), labels })
    }
}
