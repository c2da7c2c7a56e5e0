//! WordPressエクスポート(WXR)読み込みモジュール
//!
//! `channel/item` を `WpItem` に変換する。名前空間はプレフィックス付きの
//! 要素名（`wp:post_type` など）で判定する。

mod parser;

pub use parser::parse_export_str;

use crate::error::{MigrateError, Result};
use blog_migrate_common::WpItem;
use std::path::Path;

/// エクスポートの内訳
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub items: usize,
    pub published_posts: usize,
    pub attachments: usize,
}

impl ExportStats {
    pub fn from_items(items: &[WpItem]) -> Self {
        Self {
            items: items.len(),
            published_posts: items.iter().filter(|i| i.is_published_post()).count(),
            attachments: items.iter().filter(|i| i.is_attachment()).count(),
        }
    }
}

/// エクスポートファイルを読み込む
///
/// ファイルが読めない場合はエラー。XMLが壊れている・channelが無い場合は
/// 警告を出して空の一覧を返す（解決できるものが無いだけで処理は続行）。
pub fn read_export(path: &Path) -> Result<Vec<WpItem>> {
    if !path.exists() {
        return Err(MigrateError::FileNotFound(path.display().to_string()));
    }

    let xml = std::fs::read_to_string(path)?;
    match parse_export_str(&xml) {
        Ok(items) => {
            tracing::debug!(path = %path.display(), items = items.len(), "エクスポートを読み込み");
            Ok(items)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "エクスポートを解析できません。空として扱います");
            Ok(Vec::new())
        }
    }
}
