use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("WordPress XMLの解析に失敗: {0}")]
    XmlParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("検証エラー: {} 件", .0.len())]
    Validation(Vec<String>),

    #[error("画像上書きルールが不正: {0}")]
    InvalidOverrides(String),

    #[error("公開済み投稿が見つかりません: {0}")]
    NoPostsFound(String),

    #[error("ユーザーにより中断されました")]
    Aborted,

    #[error(transparent)]
    Common(#[from] blog_migrate_common::Error),
}

pub type Result<T> = std::result::Result<T, MigrateError>;
