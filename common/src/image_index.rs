//! ローカル画像インデックス
//!
//! 小文字化したファイル名 → ディスク上のファイル名 の対応表。
//! 走査順（挿入順）を保持し、あいまい一致はこの順で評価する。

use std::collections::HashMap;

/// 対象とする画像拡張子（小文字で比較）
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// ファイル名が対象の画像拡張子を持つか
pub fn is_image_file_name(file_name: &str) -> bool {
    let (_, ext) = split_extension(file_name);
    let ext = ext.trim_start_matches('.').to_lowercase();
    !ext.is_empty() && IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// ファイル名を (語幹, ".拡張子") に分割
///
/// 先頭のドットだけのファイル名（`.jpg` など）は拡張子なしとして扱う。
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(i) if i > 0 && !file_name[..i].chars().all(|c| c == '.') => {
            (&file_name[..i], &file_name[i..])
        }
        _ => (file_name, ""),
    }
}

/// ローカル画像の一覧
#[derive(Debug, Clone, Default)]
pub struct LocalImageIndex {
    /// ディスク上のファイル名（挿入順）
    entries: Vec<String>,
    /// 小文字ファイル名 → entriesの位置
    by_lower: HashMap<String, usize>,
}

impl LocalImageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイル名の列から構築（画像以外は無視）
    pub fn from_file_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::new();
        for name in names {
            index.insert(name);
        }
        index
    }

    /// 画像ファイル名を追加
    ///
    /// 画像拡張子でなければ何もせず `false`。
    /// 小文字化して同じ名前が既にある場合は位置を保ったまま上書きする。
    pub fn insert(&mut self, file_name: impl Into<String>) -> bool {
        let file_name = file_name.into();
        if !is_image_file_name(&file_name) {
            return false;
        }

        let key = file_name.to_lowercase();
        match self.by_lower.get(&key) {
            Some(&pos) => self.entries[pos] = file_name,
            None => {
                self.by_lower.insert(key, self.entries.len());
                self.entries.push(file_name);
            }
        }
        true
    }

    /// 大文字小文字を無視して検索し、ディスク上の表記を返す
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.by_lower
            .get(&file_name.to_lowercase())
            .map(|&pos| self.entries[pos].as_str())
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.get(file_name).is_some()
    }

    /// 挿入順に列挙
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
