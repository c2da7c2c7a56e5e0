use super::{PostCorrection, PostField, PostStep, StepOutput, StepReport};
use blog_migrate_common::BlogPost;
use regex::Regex;

lazy_static::lazy_static! {
    static ref UPLOAD_IMG_RE: Regex =
        Regex::new(r#"<img[^>]*src=["']wp-content/uploads/[^"']+["'][^>]*>"#).unwrap();
    static ref UPLOAD_PATH_RE: Regex = Regex::new(r#"wp-content/uploads/[^\s"'<>]+"#).unwrap();
    static ref MULTI_SPACE_RE: Regex = Regex::new(r"\s{2,}").unwrap();
    static ref BLANK_LINES_RE: Regex = Regex::new(r"\n\s*\n\s*\n").unwrap();
}

/// 照合できずに残った `wp-content/uploads/...` を本文から取り除く
///
/// アップロードパスを含まない本文は空白も含めて触らず `None`。
pub fn clean_upload_urls(content: &str) -> Option<String> {
    if !UPLOAD_PATH_RE.is_match(content) {
        return None;
    }

    let cleaned = UPLOAD_IMG_RE.replace_all(content, "");
    let cleaned = UPLOAD_PATH_RE.replace_all(&cleaned, "");
    let cleaned = MULTI_SPACE_RE.replace_all(&cleaned, " ");
    let cleaned = BLANK_LINES_RE.replace_all(&cleaned, "\n\n");
    Some(cleaned.trim().to_string())
}

/// アップロードURL除去ステップ
#[derive(Debug, Clone, Default)]
pub struct CleanUploadUrls;

impl PostStep for CleanUploadUrls {
    fn name(&self) -> &'static str {
        "clean-upload-urls"
    }

    fn apply(&self, posts: Vec<BlogPost>) -> StepOutput {
        let mut report = StepReport::new(self.name());
        let mut posts = posts;

        for post in posts.iter_mut() {
            let Some(cleaned) = clean_upload_urls(&post.content) else {
                continue;
            };
            let removed = UPLOAD_PATH_RE.find_iter(&post.content).count();
            report.corrections.push(PostCorrection::new(
                post,
                PostField::Content,
                &format!("{} 件のアップロードURL", removed),
                "",
                "ローカル画像なし",
            ));
            post.content = cleaned;
        }

        StepOutput { posts, report }
    }
}
