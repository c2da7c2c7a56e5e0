//! サムネイル → ローカルパス 解決
//!
//! 投稿スラッグ → サムネイルID → 添付ファイル名 → ローカル画像 の順に辿る。
//! 副作用なし。

use crate::attachment::AttachmentIndex;
use crate::image_index::LocalImageIndex;
use crate::matcher::{find_local_image, join_image_path, LocalMatch, MatchTier};

/// 添付ファイルとローカル照合の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub attachment_id: u64,
    /// WordPress側のファイル名
    pub wp_file_name: String,
    pub wp_url: String,
    /// 照合できたローカル画像
    pub local: Option<LocalMatch>,
}

impl ResolvedImage {
    pub fn tier(&self) -> Option<MatchTier> {
        self.local.as_ref().map(|m| m.tier)
    }
}

/// 解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailResolution {
    /// `_thumbnail_id` が無い
    NotDeclared,
    /// IDはあるが添付ファイルが見つからない（数値でない場合も含む）
    MissingAttachment { attachment_id: String },
    /// 添付ファイルはあるがローカル画像が見つからない
    NoLocalFile(ResolvedImage),
    /// ローカル画像まで解決できた
    Resolved { image: ResolvedImage, path: String },
}

impl ThumbnailResolution {
    /// 解決済みパス
    pub fn path(&self) -> Option<&str> {
        match self {
            ThumbnailResolution::Resolved { path, .. } => Some(path),
            _ => None,
        }
    }

    /// サムネイルが宣言されているか
    pub fn is_declared(&self) -> bool {
        !matches!(self, ThumbnailResolution::NotDeclared)
    }
}

/// 投稿スラッグからサムネイル画像のパスを解決する
///
/// # Arguments
/// * `slug` - 投稿スラッグ
/// * `attachments` - 添付ファイルインデックス
/// * `images` - ローカル画像インデックス
/// * `base_dir` - 解決済みパスの接頭ディレクトリ
pub fn resolve_thumbnail(
    slug: &str,
    attachments: &AttachmentIndex,
    images: &LocalImageIndex,
    base_dir: &str,
) -> ThumbnailResolution {
    let Some(raw_id) = attachments.thumbnail_id(slug) else {
        return ThumbnailResolution::NotDeclared;
    };

    let record = raw_id
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|id| attachments.attachment(id));
    let Some(record) = record else {
        return ThumbnailResolution::MissingAttachment {
            attachment_id: raw_id.to_string(),
        };
    };

    let local = find_local_image(&record.file_name, images);
    let image = ResolvedImage {
        attachment_id: record.id,
        wp_file_name: record.file_name.clone(),
        wp_url: record.url.clone(),
        local,
    };

    let path = image
        .local
        .as_ref()
        .map(|m| join_image_path(base_dir, &m.file_name));
    match path {
        Some(path) => ThumbnailResolution::Resolved { image, path },
        None => ThumbnailResolution::NoLocalFile(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PostMeta, WpItem};

    const BASE: &str = "assets/images/imagenes-blog";

    fn fixture() -> AttachmentIndex {
        let items = vec![
            WpItem {
                post_type: "attachment".into(),
                post_id: "100".into(),
                attachment_url: "https://example.com/wp-content/uploads/2021/05/Photo-300x200.JPG"
                    .into(),
                ..Default::default()
            },
            WpItem {
                post_type: "attachment".into(),
                post_id: "101".into(),
                attachment_url: "https://example.com/wp-content/uploads/lost.png".into(),
                ..Default::default()
            },
            published("with-photo", Some("100")),
            published("with-lost", Some("101")),
            published("with-ghost", Some("999")),
            published("with-garbage", Some("abc")),
            published("no-thumb", None),
        ];
        AttachmentIndex::from_items(&items)
    }

    fn published(slug: &str, thumbnail: Option<&str>) -> WpItem {
        WpItem {
            post_type: "post".into(),
            status: "publish".into(),
            post_name: slug.into(),
            postmeta: thumbnail
                .map(|t| vec![PostMeta::new("_thumbnail_id", t)])
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    fn images() -> LocalImageIndex {
        LocalImageIndex::from_file_names(["photo.jpg", "studio.png"])
    }

    #[test]
    fn test_resolved_path_uses_disk_casing() {
        let res = resolve_thumbnail("with-photo", &fixture(), &images(), BASE);
        assert_eq!(res.path(), Some("assets/images/imagenes-blog/photo.jpg"));
        match res {
            ThumbnailResolution::Resolved { image, .. } => {
                assert_eq!(image.attachment_id, 100);
                assert_eq!(image.wp_file_name, "Photo-300x200.JPG");
                assert_eq!(image.tier(), Some(MatchTier::SizeSuffixStripped));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_not_declared_is_distinct_from_unresolvable() {
        let attachments = fixture();
        let images = images();

        let none = resolve_thumbnail("no-thumb", &attachments, &images, BASE);
        assert_eq!(none, ThumbnailResolution::NotDeclared);
        assert!(!none.is_declared());

        let ghost = resolve_thumbnail("with-ghost", &attachments, &images, BASE);
        assert_eq!(
            ghost,
            ThumbnailResolution::MissingAttachment {
                attachment_id: "999".into()
            }
        );
        assert!(ghost.is_declared());
        assert_eq!(ghost.path(), None);
    }

    #[test]
    fn test_non_numeric_id_is_missing_attachment() {
        let res = resolve_thumbnail("with-garbage", &fixture(), &images(), BASE);
        assert!(matches!(res, ThumbnailResolution::MissingAttachment { .. }));
    }

    #[test]
    fn test_declared_but_no_local_file() {
        let res = resolve_thumbnail("with-lost", &fixture(), &images(), BASE);
        match res {
            ThumbnailResolution::NoLocalFile(image) => {
                assert_eq!(image.wp_file_name, "lost.png");
                assert!(image.local.is_none());
                assert_eq!(image.tier(), None);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_slug_is_not_declared() {
        let res = resolve_thumbnail("missing-slug", &fixture(), &images(), BASE);
        assert_eq!(res, ThumbnailResolution::NotDeclared);
    }

    #[test]
    fn test_empty_indices_resolve_nothing() {
        let res = resolve_thumbnail(
            "with-photo",
            &AttachmentIndex::default(),
            &LocalImageIndex::new(),
            BASE,
        );
        assert_eq!(res, ThumbnailResolution::NotDeclared);
    }
}
