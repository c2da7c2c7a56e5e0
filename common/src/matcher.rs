//! WordPressファイル名 → ローカル画像 の照合
//!
//! 優先順位（最初に当たった段で確定、以降は試さない）:
//! 1. 完全一致（大文字小文字無視）
//! 2. サイズ接尾辞 `-<幅>x<高さ>` を除去して完全一致
//! 3. 拡張子を除いた語幹の部分文字列一致（走査順で最初のもの）
//!
//! 3段目はスコアリングしない。共通部分を持つファイルが複数あると誤一致しうるため、
//! 呼び出し側で目視確認用に報告すること。

use crate::image_index::{split_extension, LocalImageIndex};
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;

lazy_static::lazy_static! {
    // 拡張子直前の -300x200 などのサイズ接尾辞
    static ref SIZE_SUFFIX_RE: Regex = Regex::new(r"-\d+x\d+(\.[A-Za-z0-9]+)$").unwrap();
}

/// どの段で一致したか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Exact,
    SizeSuffixStripped,
    Fuzzy,
}

impl MatchTier {
    /// 目視確認が必要な一致か
    pub fn needs_review(&self) -> bool {
        matches!(self, MatchTier::Fuzzy)
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTier::Exact => write!(f, "完全一致"),
            MatchTier::SizeSuffixStripped => write!(f, "サイズ接尾辞除去"),
            MatchTier::Fuzzy => write!(f, "部分一致"),
        }
    }
}

/// 照合結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMatch {
    /// ディスク上のファイル名
    pub file_name: String,
    pub tier: MatchTier,
}

/// サイズ接尾辞を除去（`photo-1024x768.jpg` → `photo.jpg`）
pub fn strip_size_suffix(file_name: &str) -> Cow<'_, str> {
    SIZE_SUFFIX_RE.replace(file_name, "$1")
}

/// WordPress側のファイル名に対応するローカル画像を探す
///
/// 見つからなければ `None`。空文字や架空のパスは返さない。
pub fn find_local_image(wp_file_name: &str, index: &LocalImageIndex) -> Option<LocalMatch> {
    // 空白だけの名前は弾くが、照合には元の名前をそのまま使う
    if wp_file_name.trim().is_empty() {
        return None;
    }

    if let Some(found) = index.get(wp_file_name) {
        return Some(LocalMatch {
            file_name: found.to_string(),
            tier: MatchTier::Exact,
        });
    }

    let stripped = strip_size_suffix(wp_file_name);
    if let Some(found) = index.get(&stripped) {
        return Some(LocalMatch {
            file_name: found.to_string(),
            tier: MatchTier::SizeSuffixStripped,
        });
    }

    let candidate = split_extension(&stripped).0.to_lowercase();

    index
        .iter()
        .find(|local| {
            let local_stem = split_extension(local).0.to_lowercase();
            local_stem.contains(&candidate) || candidate.contains(&local_stem)
        })
        .map(|local| LocalMatch {
            file_name: local.to_string(),
            tier: MatchTier::Fuzzy,
        })
}

/// URLの最後のパス要素をファイル名として取り出す
pub fn file_name_from_url(url: &str) -> &str {
    let without_query = url.split(|c: char| c == '?' || c == '#').next().unwrap_or(url);
    without_query.rsplit('/').next().unwrap_or(without_query)
}

/// ベースディレクトリとファイル名を `/` で連結
pub fn join_image_path(base_dir: &str, file_name: &str) -> String {
    let base = base_dir.trim_end_matches('/');
    if base.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", base, file_name)
    }
}
