use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfLayoutError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("入力ファイルの読み込みに失敗: {0}")]
    InputRead(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("列の指定が不正: {0}")]
    InvalidColumn(String),

    #[error("ラベルが見つかりません: {0}")]
    NoLabels(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(shelf_layout_common::Error),
}

impl From<shelf_layout_common::Error> for ShelfLayoutError {
    fn from(err: shelf_layout_common::Error) -> Self {
        match err {
            shelf_layout_common::Error::ExcelGeneration(msg) => ShelfLayoutError::ExcelGeneration(msg),
            other => ShelfLayoutError::Common(other),
        }
    }
}

impl From<calamine::XlsxError> for ShelfLayoutError {
    fn from(err: calamine::XlsxError) -> Self {
        ShelfLayoutError::InputRead(err.to_string())
    }
}

impl From<zip::result::ZipError> for ShelfLayoutError {
    fn from(err: zip::result::ZipError) -> Self {
        ShelfLayoutError::InputRead(err.to_string())
    }
}

impl From<quick_xml::Error> for ShelfLayoutError {
    fn from(err: quick_xml::Error) -> Self {
        ShelfLayoutError::InputRead(format!("XML解析エラー: {}", err))
    }
}

impl From<csv::Error> for ShelfLayoutError {
    fn from(err: csv::Error) -> Self {
        ShelfLayoutError::InputRead(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShelfLayoutError>;
