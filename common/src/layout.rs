//! 列レイアウト
//!
//! 棚ごとに長さの異なるラベル列を、最長の列に合わせて空セルで埋め、
//! 長方形の表にする。行に横方向の意味はない（同じ行の別列は無関係）。

use crate::classifier::classify;
use crate::types::{Bucket, ExtractedLabel, Rgb};
use serde::Serialize;

/// プレビューの既定行数
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// 色グループモードで塗りつぶしなしの列に付ける名前
pub const NO_FILL_NAME: &str = "No fill";

/// 列のキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// 棚分類モード
    Shelf(Bucket),
    /// 色グループモード（元セルの塗りつぶし色）
    Fill(Option<Rgb>),
}

impl ColumnKey {
    /// 2行目に出す列名
    pub fn name(&self) -> String {
        match self {
            ColumnKey::Shelf(bucket) => bucket.name().to_string(),
            ColumnKey::Fill(Some(rgb)) => rgb.hex(),
            ColumnKey::Fill(None) => NO_FILL_NAME.to_string(),
        }
    }
}

/// 1列分のセル（`None` は埋め草）
#[derive(Debug, Clone)]
pub struct Column {
    pub key: ColumnKey,
    pub cells: Vec<Option<ExtractedLabel>>,
}

impl Column {
    fn new(key: ColumnKey) -> Self {
        Self { key, cells: Vec::new() }
    }

    /// 埋め草を除いたラベル数
    pub fn label_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// 埋め草を除いたラベル（抽出順）
    pub fn labels(&self) -> impl Iterator<Item = &ExtractedLabel> {
        self.cells.iter().flatten()
    }
}

/// 全列が同じ行数を持つ表
#[derive(Debug, Clone)]
pub struct LayoutTable {
    columns: Vec<Column>,
    rows: usize,
}

impl LayoutTable {
    /// 各列を最長列に合わせて埋める
    fn from_columns(mut columns: Vec<Column>) -> Self {
        let rows = columns.iter().map(|c| c.cells.len()).max().unwrap_or(0);
        for column in &mut columns {
            column.cells.resize(rows, None);
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column(&self, key: ColumnKey) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// 指定列のラベル文字列（埋め草除外、抽出順）
    pub fn labels_in(&self, key: ColumnKey) -> Vec<&str> {
        self.column(key)
            .map(|c| c.labels().map(|l| l.label.as_str()).collect())
            .unwrap_or_default()
    }

    /// 全列の合計ラベル数
    pub fn label_count(&self) -> usize {
        self.columns.iter().map(Column::label_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// 先頭 `max_rows` 行のプレビュー
    pub fn preview(&self, max_rows: usize) -> PreviewGrid {
        let headers = self.columns.iter().map(|c| c.key.name()).collect();
        let rows = (0..self.rows.min(max_rows))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| {
                        c.cells[row]
                            .as_ref()
                            .map(|l| l.label.to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        PreviewGrid { headers, rows }
    }
}

/// 呼び出し側に返す表示用グリッド
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// 出力シート1枚分（入力シート名をそのまま使う）
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub name: String,
    pub table: LayoutTable,
}

impl SheetLayout {
    pub fn new(name: impl Into<String>, table: LayoutTable) -> Self {
        Self { name: name.into(), table }
    }
}

/// 分類済みラベルを棚ごとの列に詰める
///
/// 列順は `Bucket::ALL` 固定、列内は入力順を保持する。
pub fn pack<I>(classified: I) -> LayoutTable
where
    I: IntoIterator<Item = (Bucket, ExtractedLabel)>,
{
    let mut columns: Vec<Column> = Bucket::ALL
        .iter()
        .map(|&b| Column::new(ColumnKey::Shelf(b)))
        .collect();

    for (bucket, label) in classified {
        columns[bucket.index()].cells.push(Some(label));
    }

    LayoutTable::from_columns(columns)
}

/// 分類 + 詰め込み
pub fn build_shelf_layout<I>(labels: I) -> LayoutTable
where
    I: IntoIterator<Item = ExtractedLabel>,
{
    pack(labels.into_iter().map(|l| (classify(l.label.as_str()), l)))
}

/// 元セルの塗りつぶし色でグループ化する（色グループモード）
///
/// 列は色の初出順。塗りつぶしなしも1列として扱う。
pub fn pack_by_fill<I>(labels: I) -> LayoutTable
where
    I: IntoIterator<Item = ExtractedLabel>,
{
    let mut columns: Vec<Column> = Vec::new();

    for label in labels {
        let key = ColumnKey::Fill(label.fill);
        match columns.iter_mut().find(|c| c.key == key) {
            Some(column) => column.cells.push(Some(label)),
            None => {
                let mut column = Column::new(key);
                column.cells.push(Some(label));
                columns.push(column);
            }
        }
    }

    LayoutTable::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Label;

    fn labels(texts: &[&str]) -> Vec<ExtractedLabel> {
        texts.iter().filter_map(|t| ExtractedLabel::plain(t)).collect()
    }

    #[test]
    fn test_empty_input_has_zero_rows() {
        let table = build_shelf_layout(Vec::new());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns().len(), 16);
        assert!(table.columns().iter().all(|c| c.cells.is_empty()));
        assert!(table.is_empty());
    }

    #[test]
    fn test_scenario_assignments() {
        let table = build_shelf_layout(labels(&["HAZ-A101A110", "HAZ-A101I123", "X"]));
        assert_eq!(table.labels_in(ColumnKey::Shelf(Bucket::A)), vec!["HAZ-A101A110"]);
        assert_eq!(table.labels_in(ColumnKey::Shelf(Bucket::I)), vec!["HAZ-A101I123"]);
        assert_eq!(table.labels_in(ColumnKey::Shelf(Bucket::Others)), vec!["X"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_columns_equal_length_and_padding() {
        let table = build_shelf_layout(labels(&[
            "HAZ-A101A001",
            "HAZ-A101A002",
            "HAZ-A101A003",
            "HAZ-A101B001",
        ]));

        assert_eq!(table.row_count(), 3);
        for column in table.columns() {
            assert_eq!(column.cells.len(), 3);
        }

        let b = table.column(ColumnKey::Shelf(Bucket::B)).unwrap();
        assert_eq!(b.label_count(), 1);
        assert_eq!(b.cells.iter().filter(|c| c.is_none()).count(), 2);

        let c = table.column(ColumnKey::Shelf(Bucket::C)).unwrap();
        assert_eq!(c.cells.iter().filter(|c| c.is_none()).count(), 3);
    }

    #[test]
    fn test_order_preserved_within_column() {
        let table = build_shelf_layout(labels(&[
            "HAZ-A101A003",
            "HAZ-A101B001",
            "HAZ-A101A001",
            "HAZ-A101A002",
        ]));
        assert_eq!(
            table.labels_in(ColumnKey::Shelf(Bucket::A)),
            vec!["HAZ-A101A003", "HAZ-A101A001", "HAZ-A101A002"]
        );
    }

    #[test]
    fn test_column_order_is_fixed() {
        let table = build_shelf_layout(labels(&["HAZ-A101O001", "X", "HAZ-A101A001"]));
        let names: Vec<String> = table.columns().iter().map(|c| c.key.name()).collect();
        assert_eq!(names.first().map(String::as_str), Some("A"));
        assert_eq!(names.last().map(String::as_str), Some("Others"));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let table = build_shelf_layout(labels(&["HAZ-A101A001", "HAZ-A101A001"]));
        assert_eq!(table.labels_in(ColumnKey::Shelf(Bucket::A)).len(), 2);
        assert_eq!(table.label_count(), 2);
    }

    #[test]
    fn test_fill_travels_with_label() {
        let red = Rgb::new(0xFF0000);
        let table = build_shelf_layout(vec![
            ExtractedLabel::new(Label::new("X").unwrap(), Some(red)),
            ExtractedLabel::new(Label::new("Y").unwrap(), None),
        ]);
        let others = table.column(ColumnKey::Shelf(Bucket::Others)).unwrap();
        let fills: Vec<Option<Rgb>> = others.labels().map(|l| l.fill).collect();
        assert_eq!(fills, vec![Some(red), None]);
    }

    #[test]
    fn test_pack_by_fill_first_seen_order() {
        let red = Rgb::new(0xFF0000);
        let blue = Rgb::new(0x0000FF);
        let table = pack_by_fill(vec![
            ExtractedLabel::new(Label::new("r1").unwrap(), Some(red)),
            ExtractedLabel::new(Label::new("n1").unwrap(), None),
            ExtractedLabel::new(Label::new("b1").unwrap(), Some(blue)),
            ExtractedLabel::new(Label::new("r2").unwrap(), Some(red)),
        ]);

        let names: Vec<String> = table.columns().iter().map(|c| c.key.name()).collect();
        assert_eq!(names, vec!["#FF0000", "No fill", "#0000FF"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.labels_in(ColumnKey::Fill(Some(red))), vec!["r1", "r2"]);
    }

    #[test]
    fn test_preview_truncates_rows() {
        let texts: Vec<String> = (0..30).map(|i| format!("HAZ-A101A{:03}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let table = build_shelf_layout(labels(&refs));

        let preview = table.preview(DEFAULT_PREVIEW_ROWS);
        assert_eq!(preview.headers.len(), 16);
        assert_eq!(preview.rows.len(), 20);
        assert_eq!(preview.rows[0][0], "HAZ-A101A000");
        assert_eq!(preview.rows[0][1], "");
    }
}
