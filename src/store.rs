//! 投稿JSONの読み書き
//!
//! 未知のフィールドは `BlogPost::extra` に保持され、書き戻しても失われない。

use crate::error::{MigrateError, Result};
use blog_migrate_common::BlogPost;
use std::path::{Path, PathBuf};

/// 投稿一覧を読み込む
pub fn load_posts(path: &Path) -> Result<Vec<BlogPost>> {
    if !path.exists() {
        return Err(MigrateError::FileNotFound(path.display().to_string()));
    }
    let json = std::fs::read_to_string(path)?;
    let posts = BlogPost::list_from_json(&json)?;
    tracing::debug!(path = %path.display(), posts = posts.len(), "投稿を読み込み");
    Ok(posts)
}

/// ファイルが無ければ空の一覧
pub fn load_posts_or_empty(path: &Path) -> Result<Vec<BlogPost>> {
    if path.exists() {
        load_posts(path)
    } else {
        tracing::debug!(path = %path.display(), "投稿ファイルが無いため空として扱います");
        Ok(Vec::new())
    }
}

/// 投稿一覧を書き出す（2スペースインデント、非ASCIIはそのまま）
pub fn save_posts(path: &Path, posts: &[BlogPost]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = BlogPost::list_to_json(posts)?;
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), posts = posts.len(), "投稿を書き出し");
    Ok(())
}

/// `<file>.backup` のパス
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".backup");
    PathBuf::from(name)
}

/// 現在のファイルを `<file>.backup` にコピーする
pub fn backup_posts(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(MigrateError::FileNotFound(path.display().to_string()));
    }
    let backup = backup_path(path);
    std::fs::copy(path, &backup)?;
    Ok(backup)
}
