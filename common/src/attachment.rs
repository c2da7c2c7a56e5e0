//! 添付ファイルインデックス
//!
//! エクスポートから2つの読み取り専用マップを作る:
//! - 添付ファイルID → 添付ファイル情報
//! - 投稿スラッグ → サムネイル添付ファイルID（`_thumbnail_id`）

use crate::matcher::file_name_from_url;
use crate::types::{WpItem, THUMBNAIL_META_KEY};
use std::collections::HashMap;

/// メディアライブラリの1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRecord {
    pub id: u64,
    pub url: String,
    /// URL末尾から取り出したファイル名
    pub file_name: String,
    /// 添付ファイル自身の `wp:post_name`
    pub slug: Option<String>,
    /// 親投稿ID（`wp:post_parent`、0は親なし）
    pub parent_id: Option<u64>,
}

impl AttachmentRecord {
    /// エクスポートの `<item>` から作成
    ///
    /// 添付ファイルでない、IDが数値でない、URLが空の場合は `None`。
    pub fn from_item(item: &WpItem) -> Option<Self> {
        if !item.is_attachment() || item.attachment_url.is_empty() {
            return None;
        }
        let id = item.post_id.parse::<u64>().ok()?;
        let parent_id = item.post_parent.parse::<u64>().ok().filter(|&p| p != 0);

        Some(Self {
            id,
            url: item.attachment_url.clone(),
            file_name: file_name_from_url(&item.attachment_url).to_string(),
            slug: Some(item.post_name.clone()).filter(|s| !s.is_empty()),
            parent_id,
        })
    }
}

/// 添付ファイルとサムネイル関連の索引
#[derive(Debug, Clone, Default)]
pub struct AttachmentIndex {
    attachments: HashMap<u64, AttachmentRecord>,
    /// スラッグ → `_thumbnail_id` の生の値
    thumbnails: HashMap<String, String>,
}

impl AttachmentIndex {
    /// エクスポートの全レコードから構築
    pub fn from_items(items: &[WpItem]) -> Self {
        let mut index = Self::default();

        for item in items {
            if let Some(record) = AttachmentRecord::from_item(item) {
                // IDの重複は後勝ち
                index.attachments.insert(record.id, record);
            } else if item.is_published_post() {
                // 最初の _thumbnail_id のみ採用
                let Some(thumbnail_id) = item.meta(THUMBNAIL_META_KEY) else {
                    continue;
                };
                if !item.post_name.is_empty() && !thumbnail_id.is_empty() {
                    index
                        .thumbnails
                        .insert(item.post_name.clone(), thumbnail_id.to_string());
                }
            }
        }

        index
    }

    pub fn attachment(&self, id: u64) -> Option<&AttachmentRecord> {
        self.attachments.get(&id)
    }

    /// 投稿に宣言されたサムネイルIDの生の値
    pub fn thumbnail_id(&self, slug: &str) -> Option<&str> {
        self.thumbnails.get(slug).map(String::as_str)
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    pub fn thumbnail_count(&self) -> usize {
        self.thumbnails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty() && self.thumbnails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostMeta;

    fn attachment(id: &str, url: &str, name: &str) -> WpItem {
        WpItem {
            post_type: "attachment".into(),
            status: "inherit".into(),
            post_id: id.into(),
            attachment_url: url.into(),
            post_name: name.into(),
            ..Default::default()
        }
    }

    fn post(slug: &str, status: &str, meta: &[(&str, &str)]) -> WpItem {
        WpItem {
            post_type: "post".into(),
            status: status.into(),
            post_name: slug.into(),
            postmeta: meta.iter().map(|(k, v)| PostMeta::new(*k, *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_attachment_file_name_from_url() {
        let items = vec![attachment(
            "41",
            "https://example.com/wp-content/uploads/2022/08/neve-1024x768.jpg",
            "neve",
        )];
        let index = AttachmentIndex::from_items(&items);
        let record = index.attachment(41).expect("attachment 41");
        assert_eq!(record.file_name, "neve-1024x768.jpg");
        assert_eq!(record.slug.as_deref(), Some("neve"));
        assert_eq!(record.parent_id, None);
    }

    #[test]
    fn test_attachment_without_id_or_url_is_skipped() {
        let items = vec![
            attachment("", "https://example.com/a.jpg", "a"),
            attachment("7", "", "b"),
            attachment("abc", "https://example.com/c.jpg", "c"),
        ];
        let index = AttachmentIndex::from_items(&items);
        assert_eq!(index.attachment_count(), 0);
    }

    #[test]
    fn test_duplicate_attachment_id_last_wins() {
        let items = vec![
            attachment("5", "https://example.com/first.jpg", ""),
            attachment("5", "https://example.com/second.jpg", ""),
        ];
        let index = AttachmentIndex::from_items(&items);
        assert_eq!(index.attachment(5).unwrap().file_name, "second.jpg");
    }

    #[test]
    fn test_thumbnail_only_for_published_posts() {
        let items = vec![
            post("live", "publish", &[("_thumbnail_id", "10")]),
            post("draft", "draft", &[("_thumbnail_id", "11")]),
        ];
        let index = AttachmentIndex::from_items(&items);
        assert_eq!(index.thumbnail_id("live"), Some("10"));
        assert_eq!(index.thumbnail_id("draft"), None);
        assert_eq!(index.thumbnail_count(), 1);
    }

    #[test]
    fn test_first_thumbnail_key_wins() {
        let items = vec![post(
            "multi",
            "publish",
            &[("_edit_lock", "1"), ("_thumbnail_id", "20"), ("_thumbnail_id", "21")],
        )];
        let index = AttachmentIndex::from_items(&items);
        assert_eq!(index.thumbnail_id("multi"), Some("20"));
    }

    #[test]
    fn test_empty_first_thumbnail_is_not_replaced_by_later_key() {
        let items = vec![post(
            "blank",
            "publish",
            &[("_thumbnail_id", ""), ("_thumbnail_id", "21")],
        )];
        let index = AttachmentIndex::from_items(&items);
        assert_eq!(index.thumbnail_id("blank"), None);
    }

    #[test]
    fn test_post_without_thumbnail_is_absent() {
        let items = vec![post("plain", "publish", &[("_edit_last", "1")])];
        let index = AttachmentIndex::from_items(&items);
        assert_eq!(index.thumbnail_id("plain"), None);
        assert!(index.is_empty());
    }

    #[test]
    fn test_empty_items_give_empty_index() {
        let index = AttachmentIndex::from_items(&[]);
        assert!(index.is_empty());
    }
}
