//! 本文HTML変換モジュール
//!
//! Gutenbergブロックの本文を静的ブログ用のHTMLに整える。
//!
//! ## 処理フロー
//! 1. ブロックコメント `<!-- wp:... -->` を除去
//! 2. ギャラリー（`wp-block-gallery`）を div ベースに置換
//! 3. `data-*` 属性と `wp-image-N` クラスを除去
//! 4. 空段落の除去・連続改行の圧縮

use blog_migrate_common::{file_name_from_url, find_local_image, join_image_path, LocalImageIndex};
use regex::{Captures, Regex};

lazy_static::lazy_static! {
    static ref BLOCK_COMMENT_RE: Regex = Regex::new(r"<!--\s*/?wp:[^>]*-->").unwrap();
    static ref GALLERY_OPEN_RE: Regex = Regex::new(r#"<ul\s+class="wp-block-gallery[^"]*"[^>]*>"#).unwrap();
    static ref GALLERY_CLOSE_RE: Regex = Regex::new(r"</ul>(\s*<!-- /wp:gallery -->)?").unwrap();
    static ref GALLERY_ITEM_RE: Regex = Regex::new(r#"<li\s+class="blocks-gallery-item"[^>]*>"#).unwrap();
    static ref LI_CLOSE_RE: Regex = Regex::new(r"</li>").unwrap();
    static ref DATA_ATTR_RE: Regex = Regex::new(r#"\s+data-[a-z-]+="[^"]*""#).unwrap();
    static ref WP_IMAGE_CLASS_RE: Regex = Regex::new(r#"\s+class="wp-image-\d+""#).unwrap();
    static ref EMPTY_P_RE: Regex = Regex::new(r"<p>\s*</p>").unwrap();
    static ref MANY_NEWLINES_RE: Regex = Regex::new(r"\n{3,}").unwrap();
    static ref FIRST_IMG_RE: Regex = Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#).unwrap();
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// 本文変換器
#[derive(Debug, Clone)]
pub struct ContentTransformer {
    /// アップロードURL（設定の接頭辞 + ファイルパス）
    upload_url_re: Regex,
}

impl ContentTransformer {
    /// アップロードURLの接頭辞を指定して作成
    pub fn new(upload_url_prefix: &str) -> Self {
        let pattern = format!(r#"{}[^"'>\s]+"#, regex::escape(upload_url_prefix));
        Self {
            upload_url_re: Regex::new(&pattern).expect("escaped prefix is a valid pattern"),
        }
    }

    /// WordPress本文を静的HTMLに変換
    pub fn transform(&self, content: &str) -> String {
        if content.is_empty() {
            return String::new();
        }

        let content = BLOCK_COMMENT_RE.replace_all(content, "");
        let content = transform_galleries(&content);
        let content = DATA_ATTR_RE.replace_all(&content, "");
        let content = WP_IMAGE_CLASS_RE.replace_all(&content, "");
        let content = EMPTY_P_RE.replace_all(&content, "");
        let content = MANY_NEWLINES_RE.replace_all(&content, "\n\n");

        content.trim().to_string()
    }

    /// 本文中のアップロードURLをローカルパスに置換
    ///
    /// 照合できないURLはそのまま残す。置換件数も返す。
    pub fn replace_upload_urls(
        &self,
        content: &str,
        images: &LocalImageIndex,
        image_base_dir: &str,
    ) -> (String, usize) {
        let mut replaced = 0;
        let out = self.upload_url_re.replace_all(content, |caps: &Captures| {
            let url = &caps[0];
            match find_local_image(file_name_from_url(url), images) {
                Some(found) => {
                    replaced += 1;
                    tracing::debug!(url, local = %found.file_name, tier = %found.tier, "本文画像を置換");
                    join_image_path(image_base_dir, &found.file_name)
                }
                None => url.to_string(),
            }
        });
        (out.into_owned(), replaced)
    }
}

fn transform_galleries(content: &str) -> String {
    let content = GALLERY_OPEN_RE.replace_all(content, r#"<div class="image-gallery">"#);
    let content = GALLERY_CLOSE_RE.replace_all(&content, "</div>");
    let content = GALLERY_ITEM_RE.replace_all(&content, r#"<div class="gallery-item">"#);
    LI_CLOSE_RE.replace_all(&content, "</div>").into_owned()
}

/// 最初の `<img src>` を取り出す
pub fn extract_first_image(content: &str) -> Option<&str> {
    FIRST_IMG_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// タグを除去したテキスト
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// 連続する空白を1つにまとめる
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "https://carlosrodgarman.com/wp-content/uploads/";

    #[test]
    fn test_strip_block_comments_and_empty_paragraphs() {
        let t = ContentTransformer::new(PREFIX);
        let html = "<!-- wp:paragraph -->\n<p>Hello</p>\n<!-- /wp:paragraph -->\n<p> </p>";
        assert_eq!(t.transform(html), "<p>Hello</p>");
    }

    #[test]
    fn test_collapse_newlines() {
        let t = ContentTransformer::new(PREFIX);
        assert_eq!(t.transform("<p>a</p>\n\n\n\n<p>b</p>"), "<p>a</p>\n\n<p>b</p>");
    }

    #[test]
    fn test_gallery_becomes_divs() {
        let t = ContentTransformer::new(PREFIX);
        let html = concat!(
            r#"<ul class="wp-block-gallery columns-2 is-cropped">"#,
            r#"<li class="blocks-gallery-item"><figure><img src="a.jpg" data-id="5" class="wp-image-5"/></figure></li>"#,
            "</ul>"
        );
        assert_eq!(
            t.transform(html),
            r#"<div class="image-gallery"><div class="gallery-item"><figure><img src="a.jpg"/></figure></div></div>"#
        );
    }

    #[test]
    fn test_empty_content() {
        let t = ContentTransformer::new(PREFIX);
        assert_eq!(t.transform(""), "");
    }

    #[test]
    fn test_extract_first_image() {
        let html = r#"<p>x</p><img class="a" src="https://e.com/one.jpg"><img src='two.jpg'>"#;
        assert_eq!(extract_first_image(html), Some("https://e.com/one.jpg"));
        assert_eq!(extract_first_image("<p>no images</p>"), None);
    }

    #[test]
    fn test_replace_upload_urls() {
        let t = ContentTransformer::new(PREFIX);
        let images = LocalImageIndex::from_file_names(["neve.jpg"]);
        let html = concat!(
            r#"<img src="https://carlosrodgarman.com/wp-content/uploads/2022/05/neve-1024x768.jpg">"#,
            r#"<img src="https://carlosrodgarman.com/wp-content/uploads/2022/05/zzz.png">"#,
            r#"<img src="https://other.com/wp-content/uploads/neve.jpg">"#
        );
        let (out, replaced) = t.replace_upload_urls(html, &images, "assets/images/imagenes-blog");
        assert_eq!(replaced, 1);
        assert!(out.contains(r#"<img src="assets/images/imagenes-blog/neve.jpg">"#));
        assert!(out.contains("uploads/2022/05/zzz.png"));
        assert!(out.contains("https://other.com/wp-content/uploads/neve.jpg"));
    }

    #[test]
    fn test_strip_tags_and_whitespace() {
        let text = strip_tags("<p>Hello <b>big</b>\n\n world</p>");
        assert_eq!(normalize_whitespace(&text), "Hello big world");
    }
}
