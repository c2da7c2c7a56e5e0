//! アイキャッチ画像の修正
//!
//! 各投稿のスラッグからサムネイルIDを辿り、解決できたローカル画像と
//! 現在の `featuredImage` が違えば置き換える。

use super::{PostCorrection, PostField, PostStep, StepOutput, StepReport};
use blog_migrate_common::{
    resolve_thumbnail, AttachmentIndex, BlogPost, LocalImageIndex, MatchTier, ThumbnailResolution,
};

/// 置き換え候補
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedCorrection {
    /// 投稿一覧での位置（IDが重複していても取り違えない）
    pub index: usize,
    pub post_id: String,
    pub title: String,
    pub current: String,
    pub correct: String,
    pub wp_file_name: String,
    pub tier: MatchTier,
}

/// ローカルに見つからなかった画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingImage {
    /// サムネイルIDに対応する添付ファイルが無い
    Attachment {
        post_id: String,
        attachment_id: String,
    },
    /// 添付ファイルはあるがローカル画像が無い
    LocalFile {
        post_id: String,
        wp_file_name: String,
        wp_url: String,
    },
}

impl std::fmt::Display for MissingImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingImage::Attachment {
                post_id,
                attachment_id,
            } => write!(f, "{}: 添付ファイル {} がありません", post_id, attachment_id),
            MissingImage::LocalFile {
                post_id,
                wp_file_name,
                wp_url,
            } => write!(f, "{}: {} がローカルにありません ({})", post_id, wp_file_name, wp_url),
        }
    }
}

/// 分析結果
#[derive(Debug, Clone, Default)]
pub struct FeaturedAnalysis {
    pub corrections: Vec<FeaturedCorrection>,
    pub missing: Vec<MissingImage>,
    /// 既に正しい投稿数
    pub correct: usize,
    /// サムネイル未設定の投稿数
    pub not_declared: usize,
}

impl FeaturedAnalysis {
    pub fn review_count(&self) -> usize {
        self.corrections.iter().filter(|c| c.tier.needs_review()).count()
    }
}

fn lookup_slug(post: &BlogPost) -> &str {
    if post.slug.is_empty() {
        post.id.as_str()
    } else {
        post.slug.as_str()
    }
}

/// 投稿一覧を変更せずに分析する
pub fn analyze_featured_images(
    posts: &[BlogPost],
    attachments: &AttachmentIndex,
    images: &LocalImageIndex,
    base_dir: &str,
) -> FeaturedAnalysis {
    let mut analysis = FeaturedAnalysis::default();

    for (index, post) in posts.iter().enumerate() {
        match resolve_thumbnail(lookup_slug(post), attachments, images, base_dir) {
            ThumbnailResolution::NotDeclared => analysis.not_declared += 1,
            ThumbnailResolution::MissingAttachment { attachment_id } => {
                analysis.missing.push(MissingImage::Attachment {
                    post_id: post.id.clone(),
                    attachment_id,
                });
            }
            ThumbnailResolution::NoLocalFile(image) => {
                analysis.missing.push(MissingImage::LocalFile {
                    post_id: post.id.clone(),
                    wp_file_name: image.wp_file_name,
                    wp_url: image.wp_url,
                });
            }
            ThumbnailResolution::Resolved { image, path } => {
                if path == post.featured_image {
                    analysis.correct += 1;
                    continue;
                }
                let Some(tier) = image.tier() else {
                    continue;
                };
                analysis.corrections.push(FeaturedCorrection {
                    index,
                    post_id: post.id.clone(),
                    title: post.title.clone(),
                    current: post.featured_image.clone(),
                    correct: path,
                    wp_file_name: image.wp_file_name,
                    tier,
                });
            }
        }
    }

    analysis
}

/// アイキャッチ画像修正ステップ
pub struct FixFeaturedImages<'a> {
    attachments: &'a AttachmentIndex,
    images: &'a LocalImageIndex,
    base_dir: &'a str,
}

impl<'a> FixFeaturedImages<'a> {
    pub fn new(
        attachments: &'a AttachmentIndex,
        images: &'a LocalImageIndex,
        base_dir: &'a str,
    ) -> Self {
        Self {
            attachments,
            images,
            base_dir,
        }
    }
}

impl PostStep for FixFeaturedImages<'_> {
    fn name(&self) -> &'static str {
        "fix-featured-images"
    }

    fn apply(&self, posts: Vec<BlogPost>) -> StepOutput {
        let analysis =
            analyze_featured_images(&posts, self.attachments, self.images, self.base_dir);
        let mut report = StepReport::new(self.name());
        let mut posts = posts;

        for fix in &analysis.corrections {
            let Some(post) = posts.get_mut(fix.index) else {
                continue;
            };
            report.corrections.push(
                PostCorrection::new(
                    post,
                    PostField::FeaturedImage,
                    &fix.current,
                    &fix.correct,
                    format!("サムネイル {} ({})", fix.wp_file_name, fix.tier),
                )
                .flagged(fix.tier.needs_review()),
            );
            post.featured_image = fix.correct.clone();
        }

        report
            .notes
            .extend(analysis.missing.iter().map(|m| m.to_string()));
        if analysis.correct > 0 {
            report.notes.push(format!("既に正しい: {} 件", analysis.correct));
        }

        StepOutput { posts, report }
    }
}
