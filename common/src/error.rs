//! エラー型定義
//!
//! 共通ライブラリはI/Oを持たないため、JSON変換のみ失敗しうる。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_debug() {
        let json_error = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let debug = format!("{:?}", Error::Json(json_error));
        assert!(debug.contains("Json"));
    }
}
