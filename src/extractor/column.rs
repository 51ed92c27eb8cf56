//! 表の1列からの抽出（CSV / Excel）

use super::ExtractOptions;
use crate::error::{Result, ShelfLayoutError};
use shelf_layout_common::ExtractedLabel;
use std::io::Read;

/// 抽出対象の列
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSelector {
    /// 先頭列
    #[default]
    First,
    /// シート上の列番号（0始まり、A列 = 0）
    Position(usize),
    /// 見出し名、または列記号（A, B, ..., AA）
    Name(String),
}

impl std::str::FromStr for ColumnSelector {
    type Err = String;

    /// 数字は1始まりの列番号、それ以外は見出し名／列記号
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("列の指定が空です".into());
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(ColumnSelector::Position(n - 1)),
                _ => Err(format!("列番号は1以上: {}", s)),
            };
        }
        Ok(ColumnSelector::Name(s.to_string()))
    }
}

/// 列記号 → 列番号（0始まり）。A〜XFD の範囲のみ
pub fn column_letter_index(letters: &str) -> Option<u32> {
    if letters.is_empty() || letters.len() > 3 || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let index = letters
        .to_ascii_uppercase()
        .bytes()
        .fold(0u32, |acc, b| acc * 26 + (b - b'A' + 1) as u32);
    (index <= 16_384).then(|| index - 1)
}

/// 表内の列位置を解決する
///
/// `first_col` は表の先頭列のシート上の列番号。列番号・列記号はシート上の位置なので
/// 表内の位置に換算する。表より左を指す場合は `None`（該当データなし）。
pub(crate) fn resolve_position(
    selector: &ColumnSelector,
    header: Option<&[String]>,
    first_col: u32,
) -> Result<Option<usize>> {
    match selector {
        ColumnSelector::First => Ok(Some(0)),
        ColumnSelector::Position(n) => Ok(n.checked_sub(first_col as usize)),
        ColumnSelector::Name(name) => {
            if let Some(pos) = header.and_then(|h| h.iter().position(|v| v.trim() == name)) {
                return Ok(Some(pos));
            }
            match column_letter_index(name) {
                Some(col) => Ok(col.checked_sub(first_col).map(|p| p as usize)),
                None => Err(ShelfLayoutError::InvalidColumn(name.clone())),
            }
        }
    }
}

/// CSVの指定列からラベルを抽出する
pub fn extract_csv_column<R: Read>(
    reader: R,
    selector: &ColumnSelector,
    has_header: bool,
    options: &ExtractOptions,
) -> Result<Vec<ExtractedLabel>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(reader);

    let header: Option<Vec<String>> = if has_header {
        Some(csv_reader.headers()?.iter().map(str::to_string).collect())
    } else {
        None
    };

    let Some(position) = resolve_position(selector, header.as_deref(), 0)? else {
        return Ok(Vec::new());
    };

    let mut labels = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if let Some(label) = record.get(position).and_then(|v| options.accept(v, None)) {
            labels.push(label);
        }
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(labels: &[ExtractedLabel]) -> Vec<&str> {
        labels.iter().map(|l| l.label.as_str()).collect()
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!("1".parse::<ColumnSelector>().unwrap(), ColumnSelector::Position(0));
        assert_eq!("3".parse::<ColumnSelector>().unwrap(), ColumnSelector::Position(2));
        assert_eq!(
            "Label".parse::<ColumnSelector>().unwrap(),
            ColumnSelector::Name("Label".into())
        );
        assert!("0".parse::<ColumnSelector>().is_err());
        assert!(" ".parse::<ColumnSelector>().is_err());
    }

    #[test]
    fn test_column_letter_index() {
        assert_eq!(column_letter_index("A"), Some(0));
        assert_eq!(column_letter_index("b"), Some(1));
        assert_eq!(column_letter_index("Z"), Some(25));
        assert_eq!(column_letter_index("AA"), Some(26));
        assert_eq!(column_letter_index("XFD"), Some(16_383));
        assert_eq!(column_letter_index("XFE"), None);
        assert_eq!(column_letter_index("A1"), None);
    }

    #[test]
    fn test_first_column_with_header() {
        let csv = "Label,Qty\nHAZ-A101A110,1\n,2\n  X  ,3\n";
        let labels =
            extract_csv_column(csv.as_bytes(), &ColumnSelector::First, true, &ExtractOptions::default())
                .unwrap();
        assert_eq!(texts(&labels), vec!["HAZ-A101A110", "X"]);
    }

    #[test]
    fn test_column_by_header_name() {
        let csv = "Qty,Label\n1,HAZ-A101A110\n2,HAZ-A101C001\n";
        let labels = extract_csv_column(
            csv.as_bytes(),
            &ColumnSelector::Name("Label".into()),
            true,
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(texts(&labels), vec!["HAZ-A101A110", "HAZ-A101C001"]);
    }

    #[test]
    fn test_column_by_letter_without_header() {
        let csv = "1,HAZ-A101A110\n2,HAZ-A101C001\n";
        let labels = extract_csv_column(
            csv.as_bytes(),
            &ColumnSelector::Name("B".into()),
            false,
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(texts(&labels), vec!["HAZ-A101A110", "HAZ-A101C001"]);
    }

    #[test]
    fn test_unknown_column_name() {
        let csv = "Qty,Label\n1,X\n";
        let err = extract_csv_column(
            csv.as_bytes(),
            &ColumnSelector::Name("Location Code".into()),
            true,
            &ExtractOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ShelfLayoutError::InvalidColumn(_)));
    }

    #[test]
    fn test_number_and_letter_agree_with_offset_table() {
        // A列が空で表がB列から始まる
        let by_number = resolve_position(&ColumnSelector::Position(1), None, 1).unwrap();
        let by_letter = resolve_position(&ColumnSelector::Name("B".into()), None, 1).unwrap();
        assert_eq!(by_number, Some(0));
        assert_eq!(by_number, by_letter);

        assert_eq!(resolve_position(&ColumnSelector::Position(0), None, 1).unwrap(), None);
        assert_eq!(resolve_position(&ColumnSelector::First, None, 1).unwrap(), Some(0));
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let csv = "a,b\nX\nY,HAZ-A101A110\n";
        let labels = extract_csv_column(
            csv.as_bytes(),
            &ColumnSelector::Position(1),
            true,
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(texts(&labels), vec!["HAZ-A101A110"]);
    }
}
