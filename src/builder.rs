//! WordPress投稿 → ブログ投稿 変換
//!
//! アイキャッチ画像の決定順:
//! 1. `_thumbnail_id` → 添付ファイル → ローカル画像
//! 2. 本文の最初の画像 → ローカル画像
//! 3. プレースホルダ

use crate::config::Config;
use crate::transform::{extract_first_image, normalize_whitespace, strip_tags, ContentTransformer};
use blog_migrate_common::{
    file_name_from_url, find_local_image, join_image_path, resolve_thumbnail, AttachmentIndex,
    BlogPost, LocalImageIndex, MatchTier, ThumbnailResolution, WpItem,
};
use chrono::NaiveDate;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const YOAST_READING_TIME: &str = "_yoast_wpseo_estimated-reading-time-minutes";
const YOAST_METADESC: &str = "_yoast_wpseo_metadesc";
const YOAST_FOCUSKW: &str = "_yoast_wpseo_focuskw";

lazy_static::lazy_static! {
    static ref NON_WORD_RE: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref DASH_SPACE_RE: Regex = Regex::new(r"[-\s]+").unwrap();
}

/// アイキャッチ画像の決定元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeaturedSource {
    /// サムネイルIDから解決
    Thumbnail(MatchTier),
    /// 本文の最初の画像から解決
    ContentImage(MatchTier),
    /// プレースホルダ（サムネイル宣言の有無つき）
    Placeholder { thumbnail_declared: bool },
}

impl FeaturedSource {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, FeaturedSource::Placeholder { .. })
    }

    /// 部分一致で決まった（要確認）
    pub fn needs_review(&self) -> bool {
        match self {
            FeaturedSource::Thumbnail(tier) | FeaturedSource::ContentImage(tier) => {
                tier.needs_review()
            }
            FeaturedSource::Placeholder { .. } => false,
        }
    }
}

/// 変換結果
#[derive(Debug, Clone)]
pub struct BuiltPost {
    pub post: BlogPost,
    pub featured: FeaturedSource,
    /// 本文中でローカルパスに置換した画像URL数
    pub replaced_images: usize,
}

/// ブログ投稿ビルダー
pub struct PostBuilder<'a> {
    config: &'a Config,
    attachments: &'a AttachmentIndex,
    images: &'a LocalImageIndex,
    transformer: ContentTransformer,
    /// 日付が無い・不正な場合の既定値
    today: NaiveDate,
}

impl<'a> PostBuilder<'a> {
    pub fn new(
        config: &'a Config,
        attachments: &'a AttachmentIndex,
        images: &'a LocalImageIndex,
        today: NaiveDate,
    ) -> Self {
        Self {
            config,
            attachments,
            images,
            transformer: ContentTransformer::new(&config.upload_url_prefix),
            today,
        }
    }

    pub fn build(&self, item: &WpItem) -> BuiltPost {
        let post_id = if item.post_name.is_empty() {
            slugify(&item.title)
        } else {
            item.post_name.clone()
        };

        let content = self.transformer.transform(&item.content);
        let (featured_image, featured) = self.resolve_featured_image(&post_id, &content);
        let (content, replaced_images) = self.transformer.replace_upload_urls(
            &content,
            self.images,
            &self.config.image_base_dir,
        );

        let excerpt = generate_excerpt(&item.excerpt, &content);
        let read_time = read_time(item, &content, self.config.words_per_minute);
        let category = item
            .categories
            .first()
            .cloned()
            .unwrap_or_else(|| self.config.default_category.clone());
        let tags = item.tags.clone();
        let publish_date = format_date(&item.post_date, self.today);
        let meta_description = meta_description(item, &excerpt);
        let meta_keywords = meta_keywords(item, &tags);

        let post = BlogPost {
            id: post_id.clone(),
            title: item.title.clone(),
            slug: post_id,
            excerpt,
            content,
            featured_image,
            category,
            tags,
            author: self.config.author.clone(),
            publish_date: publish_date.clone(),
            updated_date: publish_date,
            read_time,
            meta_description,
            meta_keywords,
            featured: false,
            extra: Default::default(),
        };

        BuiltPost {
            post,
            featured,
            replaced_images,
        }
    }

    fn resolve_featured_image(&self, slug: &str, content: &str) -> (String, FeaturedSource) {
        let resolution = resolve_thumbnail(
            slug,
            self.attachments,
            self.images,
            &self.config.image_base_dir,
        );
        if let ThumbnailResolution::Resolved { image, path } = &resolution {
            if let Some(tier) = image.tier() {
                return (path.clone(), FeaturedSource::Thumbnail(tier));
            }
        }
        if resolution.is_declared() {
            tracing::debug!(slug, ?resolution, "サムネイルを解決できず、本文画像を試します");
        }

        if let Some(url) = extract_first_image(content) {
            if let Some(found) = find_local_image(file_name_from_url(url), self.images) {
                let path = join_image_path(&self.config.image_base_dir, &found.file_name);
                return (path, FeaturedSource::ContentImage(found.tier));
            }
        }

        (
            self.config.placeholder_image.clone(),
            FeaturedSource::Placeholder {
                thumbnail_declared: resolution.is_declared(),
            },
        )
    }
}

/// 抜粋: WordPressの抜粋（タグ除去・200文字）または本文先頭150文字
pub fn generate_excerpt(wp_excerpt: &str, content: &str) -> String {
    if !wp_excerpt.is_empty() {
        return truncate_chars(strip_tags(wp_excerpt).trim(), 200).to_string();
    }

    let text = normalize_whitespace(&strip_tags(content));
    let text = text.trim();
    if text.chars().count() > 150 {
        format!("{}...", truncate_chars(text, 150))
    } else {
        text.to_string()
    }
}

/// 読了時間: Yoastの推定値、なければ語数から算出（最低1分）
pub fn read_time(item: &WpItem, content: &str, words_per_minute: u32) -> String {
    if let Some(minutes) = item.meta_non_empty(YOAST_READING_TIME) {
        if minutes.chars().all(|c| c.is_ascii_digit()) {
            return format!("{} min read", minutes);
        }
    }

    let words = strip_tags(content).split_whitespace().count();
    let minutes = (words as f64 / words_per_minute.max(1) as f64).round_ties_even() as u64;
    format!("{} min read", minutes.max(1))
}

/// `2004-02-06 19:54:45` → `2004-02-06`。不正なら `today`
pub fn format_date(wp_date: &str, today: NaiveDate) -> String {
    let date = wp_date
        .split_whitespace()
        .next()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or(today);
    date.format("%Y-%m-%d").to_string()
}

fn meta_description(item: &WpItem, excerpt: &str) -> String {
    match item.meta_non_empty(YOAST_METADESC) {
        Some(desc) => desc.to_string(),
        None => truncate_chars(excerpt, 160).to_string(),
    }
}

fn meta_keywords(item: &WpItem, tags: &[String]) -> String {
    let mut keywords: Vec<&str> = Vec::with_capacity(tags.len() + 1);
    if let Some(focus) = item.meta_non_empty(YOAST_FOCUSKW) {
        keywords.push(focus);
    }
    keywords.extend(tags.iter().map(String::as_str));
    keywords.join(", ")
}

/// URL用スラッグに変換（NFKD分解してASCII以外を落とす）
pub fn slugify(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let lower = ascii.to_lowercase();
    let cleaned = NON_WORD_RE.replace_all(&lower, "");
    let dashed = DASH_SPACE_RE.replace_all(&cleaned, "-");
    dashed.trim_matches('-').to_string()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
