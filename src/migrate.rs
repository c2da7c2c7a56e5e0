//! 移行の入力準備と投稿生成

use crate::builder::{BuiltPost, PostBuilder};
use crate::config::Config;
use crate::error::{MigrateError, Result};
use crate::scanner::scan_image_dir;
use crate::wordpress::{read_export, ExportStats};
use blog_migrate_common::{AttachmentIndex, LocalImageIndex, WpItem};
use chrono::NaiveDate;
use std::path::Path;

/// エクスポートとローカル画像から作った照合用データ
pub struct ExportSources {
    pub items: Vec<WpItem>,
    pub attachments: AttachmentIndex,
    pub images: LocalImageIndex,
    pub stats: ExportStats,
}

impl ExportSources {
    pub fn load(export: &Path, images_dir: &Path) -> Result<Self> {
        let items = read_export(export)?;
        let stats = ExportStats::from_items(&items);
        let attachments = AttachmentIndex::from_items(&items);
        let images = scan_image_dir(images_dir);
        tracing::info!(
            items = stats.items,
            posts = stats.published_posts,
            attachments = attachments.attachment_count(),
            thumbnails = attachments.thumbnail_count(),
            local_images = images.len(),
            "入力を読み込み"
        );
        Ok(Self {
            items,
            attachments,
            images,
            stats,
        })
    }

    /// 公開済みの通常投稿
    pub fn published(&self) -> impl Iterator<Item = &WpItem> {
        self.items.iter().filter(|i| i.is_published_post())
    }

    /// 公開済み投稿が1件も無ければエラー
    pub fn require_posts(&self, export: &Path) -> Result<()> {
        if self.stats.published_posts == 0 {
            return Err(MigrateError::NoPostsFound(export.display().to_string()));
        }
        Ok(())
    }
}

/// 公開済み投稿をすべてブログ投稿に変換する
///
/// `on_built` は1件ごとに呼ばれる（進捗表示用）。
pub fn build_posts<F>(
    sources: &ExportSources,
    config: &Config,
    today: NaiveDate,
    mut on_built: F,
) -> Vec<BuiltPost>
where
    F: FnMut(&BuiltPost),
{
    let builder = PostBuilder::new(config, &sources.attachments, &sources.images, today);
    sources
        .published()
        .map(|item| {
            let built = builder.build(item);
            on_built(&built);
            built
        })
        .collect()
}
