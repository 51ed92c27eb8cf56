//! プレビュー表示

use shelf_layout_common::PreviewGrid;

/// 空のセル表示
const EMPTY_CELL: &str = "";

/// 等幅の表として整形する（空の列は省略）
pub fn render_table(grid: &PreviewGrid) -> String {
    let used: Vec<usize> = (0..grid.headers.len())
        .filter(|&col| grid.rows.iter().any(|row| row.get(col).is_some_and(|c| !c.is_empty())))
        .collect();

    if used.is_empty() {
        return "(ラベルなし)\n".to_string();
    }

    let widths: Vec<usize> = used
        .iter()
        .map(|&col| {
            grid.rows
                .iter()
                .map(|row| row.get(col).map_or(0, |c| c.chars().count()))
                .chain(std::iter::once(grid.headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rules: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    let mut out = String::new();
    let mut push_line = |cells: Vec<&str>| {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    };

    push_line(used.iter().map(|&col| grid.headers[col].as_str()).collect());
    push_line(rules.iter().map(String::as_str).collect());
    for row in &grid.rows {
        push_line(
            used.iter()
                .map(|&col| row.get(col).map(String::as_str).unwrap_or(EMPTY_CELL))
                .collect(),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_skips_empty_columns() {
        let grid = PreviewGrid {
            headers: vec!["A".into(), "B".into(), "Others".into()],
            rows: vec![
                vec!["HAZ-A101A001".into(), String::new(), "X".into()],
                vec!["HAZ-A101A002".into(), String::new(), String::new()],
            ],
        };
        let table = render_table(&grid);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("A "));
        assert!(lines[0].ends_with("Others"));
        assert!(!lines[0].contains("B"));
        assert!(lines[2].contains("HAZ-A101A001"));
    }

    #[test]
    fn test_render_ragged_rows() {
        let grid = PreviewGrid {
            headers: vec!["A".into(), "B".into()],
            rows: vec![vec!["HAZ-A101A001".into()], vec![String::new(), "HAZ-A101B001".into()]],
        };
        let table = render_table(&grid);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("B"));
        assert!(lines[2].starts_with("HAZ-A101A001"));
        assert!(lines[3].ends_with("HAZ-A101B001"));
    }

    #[test]
    fn test_render_empty_grid() {
        let grid = PreviewGrid { headers: vec!["A".into()], rows: Vec::new() };
        assert_eq!(render_table(&grid), "(ラベルなし)\n");
    }
}
