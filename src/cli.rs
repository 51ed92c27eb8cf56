use clap::{Parser, Subcommand};
use crate::export::Grouping;
use crate::extractor::{ColumnSelector, InputMode};
use shelf_layout_common::ThemeFillPolicy;
use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shelf-layout")]
#[command(about = "倉庫ビンラベルの棚別レイアウトExcel生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ラベルを棚ごとの列に並べたExcelを生成
    Generate {
        /// 入力ファイル（.xlsx / .csv / テキスト、`-` で標準入力）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 入力モード (text/column/sheet/workbook)。省略時は拡張子から判定
        #[arg(short, long)]
        mode: Option<ModeArg>,

        /// 対象シート（column/sheet モード、省略時は先頭シート）
        #[arg(short, long)]
        sheet: Option<String>,

        /// 対象列（1始まりの番号・列記号・見出し名、column モード）
        #[arg(short, long)]
        column: Option<ColumnSelector>,

        /// 先頭行を見出しとして扱わない（column モード）
        #[arg(long)]
        no_header: bool,

        /// 配色（プリセット名またはJSONファイル）
        #[arg(short, long)]
        palette: Option<String>,

        /// この文字列を含むラベルを除外（大文字小文字を区別しない）
        #[arg(long, conflicts_with = "no_exclude")]
        exclude: Option<String>,

        /// 除外しない
        #[arg(long)]
        no_exclude: bool,

        /// テーマ色・インデックス色の扱い (drop/substitute/substitute:#RRGGBB)
        #[arg(long)]
        theme_fill: Option<ThemeFillPolicy>,

        /// 列のまとめ方 (shelf/fill)
        #[arg(short, long, default_value = "shelf")]
        group_by: Grouping,

        /// Others 列に元セルの色を引き継がない
        #[arg(long)]
        no_others_fill: bool,

        /// プレビュー行数
        #[arg(long)]
        preview_rows: Option<usize>,

        /// プレビューをJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// ラベルの棚を表示
    Classify {
        /// ラベル
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// 配色プリセットを表示
    Palettes {
        /// 表示する配色（省略時は全プリセット）
        #[arg(short, long)]
        name: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 既定の配色を設定
        #[arg(long)]
        set_palette: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 入力モード指定
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Text,
    Column,
    Sheet,
    Workbook,
}

impl ModeArg {
    pub fn into_mode(
        self,
        sheet: Option<String>,
        column: Option<ColumnSelector>,
        has_header: bool,
    ) -> InputMode {
        match self {
            ModeArg::Text => InputMode::Text,
            ModeArg::Column => InputMode::Column {
                sheet,
                column: column.unwrap_or_default(),
                has_header,
            },
            ModeArg::Sheet => InputMode::Sheet { sheet },
            ModeArg::Workbook => InputMode::Workbook,
        }
    }
}

impl std::str::FromStr for ModeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "paste" => Ok(ModeArg::Text),
            "column" | "col" => Ok(ModeArg::Column),
            "sheet" => Ok(ModeArg::Sheet),
            "workbook" | "book" | "all" => Ok(ModeArg::Workbook),
            _ => Err(format!("Unknown mode: {}. Use text, column, sheet, or workbook", s)),
        }
    }
}

/// CLI引数から入力モードを決める
///
/// `--mode` 省略時は拡張子から判定し、`--sheet` / `--column` を反映する。
pub fn resolve_mode(
    input: &std::path::Path,
    mode: Option<ModeArg>,
    sheet: Option<String>,
    column: Option<ColumnSelector>,
    no_header: bool,
) -> InputMode {
    let has_header = !no_header;
    if let Some(mode) = mode {
        return mode.into_mode(sheet, column, has_header);
    }

    match InputMode::infer(input) {
        InputMode::Column { .. } => ModeArg::Column.into_mode(sheet, column, has_header),
        InputMode::Workbook if column.is_some() => ModeArg::Column.into_mode(sheet, column, has_header),
        InputMode::Workbook if sheet.is_some() => InputMode::Sheet { sheet },
        other => other,
    }
}

/// 進捗表示
///
/// `--json` のときは標準出力をJSONだけにするため進捗を出さない。
pub struct Progress<W: Write> {
    out: W,
    quiet: bool,
}

impl<W: Write> Progress<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self { out, quiet }
    }

    pub fn line(&mut self, message: impl Display) {
        if !self.quiet {
            let _ = writeln!(self.out, "{}", message);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
