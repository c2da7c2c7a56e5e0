//! 移行データの型定義
//!
//! CLIとパイプラインで共有される型:
//! - WpItem: WordPressエクスポートの `<item>` 1件（投稿・添付ファイル共通）
//! - BlogPost: 静的ブログJSONの投稿1件

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// サムネイル参照のメタキー
pub const THUMBNAIL_META_KEY: &str = "_thumbnail_id";

/// `<wp:postmeta>` のキー/値ペア
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    pub key: String,
    pub value: String,
}

impl PostMeta {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// WordPressエクスポートの生レコード
///
/// 値はすべてトリム済み。要素が無い場合は空文字。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WpItem {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub post_id: String,
    pub post_date: String,
    pub post_name: String,
    pub post_type: String,
    pub status: String,
    pub post_parent: String,
    pub attachment_url: String,
    pub content: String,
    pub excerpt: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub postmeta: Vec<PostMeta>,
}

impl WpItem {
    pub fn is_attachment(&self) -> bool {
        self.post_type == "attachment"
    }

    /// 公開済みの通常投稿か
    pub fn is_published_post(&self) -> bool {
        self.post_type == "post" && self.status == "publish"
    }

    /// 最初に見つかったメタ値（空値も返す）
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.postmeta
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.value.as_str())
    }

    /// 空でないメタ値のみ
    pub fn meta_non_empty(&self, key: &str) -> Option<&str> {
        self.meta(key).filter(|v| !v.is_empty())
    }
}

/// 静的ブログの投稿
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: String,
    pub publish_date: String,        // YYYY-MM-DD
    pub updated_date: String,        // YYYY-MM-DD
    pub read_time: String,           // "3 min read"
    pub meta_description: String,
    pub meta_keywords: String,
    pub featured: bool,

    /// 既知以外のフィールド（手動投稿の独自項目など）をそのまま保持
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BlogPost {
    /// JSON配列から投稿一覧を読み込み
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        let posts: Vec<Self> = serde_json::from_str(json)?;
        Ok(posts)
    }

    /// 投稿一覧を整形済みJSONに変換（インデント2、非ASCIIはそのまま）
    pub fn list_to_json(posts: &[Self]) -> Result<String> {
        Ok(serde_json::to_string_pretty(posts)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_post_camel_case_keys() {
        let post = BlogPost {
            id: "hello".into(),
            featured_image: "assets/images/blog/placeholder.jpg".into(),
            publish_date: "2024-01-02".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["featuredImage"], "assets/images/blog/placeholder.jpg");
        assert_eq!(json["publishDate"], "2024-01-02");
        assert!(json.get("featured_image").is_none());
    }

    #[test]
    fn test_blog_post_keeps_unknown_fields() {
        let json = r#"[{"id":"a","title":"A","gallery":["x.jpg"],"featured":true}]"#;
        let posts = BlogPost::list_from_json(json).unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].featured);
        assert_eq!(posts[0].extra["gallery"][0], "x.jpg");

        let out = BlogPost::list_to_json(&posts).unwrap();
        assert!(out.contains("\"gallery\""));
    }

    #[test]
    fn test_blog_post_preserves_non_ascii() {
        let posts = vec![BlogPost {
            title: "Música en Galicia – Bublé".into(),
            ..Default::default()
        }];
        let out = BlogPost::list_to_json(&posts).unwrap();
        assert!(out.contains("Música en Galicia – Bublé"));
    }

    #[test]
    fn test_wp_item_first_meta_wins() {
        let item = WpItem {
            postmeta: vec![
                PostMeta::new(THUMBNAIL_META_KEY, "12"),
                PostMeta::new(THUMBNAIL_META_KEY, "99"),
            ],
            ..Default::default()
        };
        assert_eq!(item.meta(THUMBNAIL_META_KEY), Some("12"));
        assert_eq!(item.meta("_missing"), None);
    }

    #[test]
    fn test_wp_item_kind() {
        let post = WpItem {
            post_type: "post".into(),
            status: "publish".into(),
            ..Default::default()
        };
        assert!(post.is_published_post());
        assert!(!post.is_attachment());

        let draft = WpItem {
            post_type: "post".into(),
            status: "draft".into(),
            ..Default::default()
        };
        assert!(!draft.is_published_post());
    }
}
