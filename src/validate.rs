//! 書き出し前の投稿一覧チェック

use blog_migrate_common::BlogPost;
use regex::Regex;
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// 問題の重さ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// 書き出しを止める
    Error,
    /// 表示だけして書き出す
    Warning,
}

/// 検出した問題
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// 一覧内の位置
    pub index: usize,
    pub post_id: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.post_id.is_empty() {
            write!(f, "投稿 {}: {}", self.index, self.message)
        } else {
            write!(f, "投稿 {} ({}): {}", self.index, self.post_id, self.message)
        }
    }
}

fn required_fields(post: &BlogPost) -> [(&'static str, &str); 7] {
    [
        ("id", post.id.as_str()),
        ("slug", post.slug.as_str()),
        ("featuredImage", post.featured_image.as_str()),
        ("category", post.category.as_str()),
        ("author", post.author.as_str()),
        ("publishDate", post.publish_date.as_str()),
        ("readTime", post.read_time.as_str()),
    ]
}

// WordPressではタイトルや本文が空の公開記事もありうる
fn optional_fields(post: &BlogPost) -> [(&'static str, &str); 2] {
    [("title", post.title.as_str()), ("content", post.content.as_str())]
}

/// 問題の一覧を返す
///
/// `Severity::Error` が1件も無ければ書き出してよい。
pub fn validate_posts(posts: &[BlogPost]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, post) in posts.iter().enumerate() {
        let mut issue = |severity: Severity, message: String| {
            issues.push(ValidationIssue {
                index,
                post_id: post.id.clone(),
                message,
                severity,
            })
        };

        for (field, value) in required_fields(post) {
            if value.trim().is_empty() {
                issue(Severity::Error, format!("必須フィールド {} が空です", field));
            }
        }
        for (field, value) in optional_fields(post) {
            if value.trim().is_empty() {
                issue(Severity::Warning, format!("{} が空です", field));
            }
        }

        if !post.id.is_empty() && !seen.insert(post.id.as_str()) {
            issue(Severity::Error, format!("IDが重複しています: {}", post.id));
        }

        if !post.publish_date.is_empty() && !DATE_RE.is_match(&post.publish_date) {
            issue(Severity::Error, format!("日付の形式が不正です: {}", post.publish_date));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(id: &str) -> BlogPost {
        BlogPost {
            id: id.into(),
            title: "Title".into(),
            slug: id.into(),
            content: "<p>x</p>".into(),
            featured_image: "assets/images/blog/placeholder.jpg".into(),
            category: "Blog".into(),
            author: "Carlos Rodgarman".into(),
            publish_date: "2024-01-31".into(),
            read_time: "1 min read".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_posts() {
        assert!(validate_posts(&[valid("a"), valid("b")]).is_empty());
        assert!(validate_posts(&[]).is_empty());
    }

    #[test]
    fn test_duplicate_ids() {
        let issues = validate_posts(&[valid("a"), valid("a")]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].index, 1);
        assert!(issues[0].message.contains("重複"));
    }

    #[test]
    fn test_missing_fields() {
        let mut post = valid("a");
        post.slug = "  ".into();
        post.read_time.clear();
        let issues = validate_posts(&[post]);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(ValidationIssue::is_error));
        assert!(issues[0].to_string().contains("slug"));
        assert!(issues[1].to_string().contains("readTime"));
    }

    #[test]
    fn test_empty_title_and_content_only_warn() {
        let mut post = valid("a");
        post.title.clear();
        post.content = " ".into();
        let issues = validate_posts(&[post]);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        assert_eq!(issues[0].to_string(), "投稿 0 (a): title が空です");
    }

    #[test]
    fn test_date_format() {
        let mut post = valid("a");
        post.publish_date = "2024-01-31 10:00:00".into();
        let issues = validate_posts(&[post]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].to_string(), "投稿 0 (a): 日付の形式が不正です: 2024-01-31 10:00:00");
    }
}
