//! 投稿コレクション変換パイプライン
//!
//! 各ステップはメモリ上の投稿一覧を受け取り、新しい一覧と修正内容を返す。
//! ファイルの読み書きは呼び出し側（load → 変換 → store）。
//!
//! ## 標準の順序
//! 1. MergeImported（移行投稿の取り込み）
//! 2. DeduplicateByTitle（タイトル重複の除去）
//! 3. FixFeaturedImages（サムネイルIDによるアイキャッチ修正）
//! 4. ApplyImageOverrides（手動指定の画像）
//! 5. FixListMarkup（`<li>…</div>` の修正）
//! 6. CleanUploadUrls（残ったアップロードURLの除去）

pub mod merge;
pub mod dedupe;
pub mod featured;
pub mod overrides;
pub mod markup;
pub mod urls;

pub use merge::MergeImported;
pub use dedupe::DeduplicateByTitle;
pub use featured::{analyze_featured_images, FeaturedAnalysis, FixFeaturedImages};
pub use overrides::{ApplyImageOverrides, ImageOverrides};
pub use markup::FixListMarkup;
pub use urls::CleanUploadUrls;

use blog_migrate_common::BlogPost;

/// 修正対象フィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostField {
    FeaturedImage,
    Content,
    /// 投稿の追加
    Added,
    /// 投稿の削除
    Removed,
}

impl std::fmt::Display for PostField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostField::FeaturedImage => write!(f, "featuredImage"),
            PostField::Content => write!(f, "content"),
            PostField::Added => write!(f, "追加"),
            PostField::Removed => write!(f, "削除"),
        }
    }
}

/// 個別の修正内容
#[derive(Debug, Clone)]
pub struct PostCorrection {
    pub post_id: String,
    pub title: String,
    pub field: PostField,
    /// 修正前の値
    pub original: String,
    /// 修正後の値
    pub corrected: String,
    /// 修正理由
    pub reason: String,
    /// 部分一致など、目視確認が必要
    pub needs_review: bool,
}

impl PostCorrection {
    pub fn new(
        post: &BlogPost,
        field: PostField,
        original: &str,
        corrected: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            post_id: post.id.clone(),
            title: post.title.clone(),
            field,
            original: original.to_string(),
            corrected: corrected.to_string(),
            reason: reason.into(),
            needs_review: false,
        }
    }

    pub fn flagged(mut self, needs_review: bool) -> Self {
        self.needs_review = needs_review;
        self
    }
}

/// ステップの実行結果
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub step: &'static str,
    pub corrections: Vec<PostCorrection>,
    /// 補足（未解決画像、残りプレースホルダ数など）
    pub notes: Vec<String>,
}

impl StepReport {
    pub fn new(step: &'static str) -> Self {
        Self {
            step,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    pub fn review_count(&self) -> usize {
        self.corrections.iter().filter(|c| c.needs_review).count()
    }
}

/// ステップの出力
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub posts: Vec<BlogPost>,
    pub report: StepReport,
}

/// 投稿一覧に対する純粋な変換
pub trait PostStep {
    fn name(&self) -> &'static str;

    fn apply(&self, posts: Vec<BlogPost>) -> StepOutput;
}

/// パイプラインの出力
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub posts: Vec<BlogPost>,
    pub reports: Vec<StepReport>,
}

impl PipelineOutput {
    /// 何か変更があったか
    pub fn changed(&self) -> bool {
        self.reports.iter().any(|r| !r.is_empty())
    }
}

/// ステップを順に適用する
#[derive(Default)]
pub struct Pipeline<'a> {
    steps: Vec<Box<dyn PostStep + 'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn with(mut self, step: impl PostStep + 'a) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, posts: Vec<BlogPost>) -> PipelineOutput {
        let mut posts = posts;
        let mut reports = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let output = step.apply(posts);
            tracing::debug!(
                step = step.name(),
                corrections = output.report.corrections.len(),
                posts = output.posts.len(),
                "ステップ完了"
            );
            posts = output.posts;
            reports.push(output.report);
        }

        PipelineOutput { posts, reports }
    }
}

/// 公開日の新しい順に並べる（同日は元の順序を保つ）
pub fn sort_newest_first(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
}
