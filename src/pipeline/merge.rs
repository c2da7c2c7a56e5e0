use super::{sort_newest_first, PostCorrection, PostField, PostStep, StepOutput, StepReport};
use blog_migrate_common::BlogPost;
use std::collections::HashSet;

/// 移行した投稿を既存の一覧に取り込む
///
/// 既存IDと同じ投稿は追加しない。取り込み後は公開日の新しい順。
#[derive(Debug, Clone)]
pub struct MergeImported {
    imported: Vec<BlogPost>,
}

impl MergeImported {
    pub fn new(imported: Vec<BlogPost>) -> Self {
        Self { imported }
    }
}

impl PostStep for MergeImported {
    fn name(&self) -> &'static str {
        "merge-imported"
    }

    fn apply(&self, posts: Vec<BlogPost>) -> StepOutput {
        let mut report = StepReport::new(self.name());
        let mut seen: HashSet<String> = posts.iter().map(|p| p.id.clone()).collect();
        let mut posts = posts;
        let mut skipped = 0;

        for post in &self.imported {
            if !seen.insert(post.id.clone()) {
                skipped += 1;
                continue;
            }
            report.corrections.push(PostCorrection::new(
                post,
                PostField::Added,
                "",
                &post.id,
                "WordPressから移行",
            ));
            posts.push(post.clone());
        }

        if skipped > 0 {
            report.notes.push(format!("既存IDのため {} 件をスキップ", skipped));
        }
        sort_newest_first(&mut posts);
        StepOutput { posts, report }
    }
}
