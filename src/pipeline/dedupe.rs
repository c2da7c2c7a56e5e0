use super::{sort_newest_first, PostCorrection, PostField, PostStep, StepOutput, StepReport};
use blog_migrate_common::BlogPost;
use std::collections::{HashMap, HashSet};

/// タイトルが同じ投稿を1件にまとめる
///
/// 手書きの投稿（`manual_ids`）を優先し、それ以外は先に出たものを残す。
/// 残った投稿は最初に出た位置を引き継ぐ。
#[derive(Debug, Clone, Default)]
pub struct DeduplicateByTitle {
    manual_ids: HashSet<String>,
}

impl DeduplicateByTitle {
    pub fn new<I, S>(manual_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            manual_ids: manual_ids.into_iter().map(Into::into).collect(),
        }
    }

    fn is_manual(&self, post: &BlogPost) -> bool {
        self.manual_ids.contains(&post.id)
    }
}

impl PostStep for DeduplicateByTitle {
    fn name(&self) -> &'static str {
        "deduplicate-by-title"
    }

    fn apply(&self, posts: Vec<BlogPost>) -> StepOutput {
        let mut report = StepReport::new(self.name());
        let mut kept: Vec<BlogPost> = Vec::with_capacity(posts.len());
        let mut position: HashMap<String, usize> = HashMap::new();

        for post in posts {
            let Some(&idx) = position.get(&post.title) else {
                position.insert(post.title.clone(), kept.len());
                kept.push(post);
                continue;
            };

            let winner_is_new = !self.is_manual(&kept[idx]) && self.is_manual(&post);
            let removed = if winner_is_new {
                std::mem::replace(&mut kept[idx], post)
            } else {
                post
            };
            report.corrections.push(PostCorrection::new(
                &removed,
                PostField::Removed,
                &removed.id,
                &kept[idx].id,
                "タイトル重複",
            ));
        }

        sort_newest_first(&mut kept);
        StepOutput { posts: kept, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, title: &str, date: &str) -> BlogPost {
        BlogPost {
            id: id.into(),
            title: title.into(),
            publish_date: date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let posts = vec![
            post("a-1", "Same", "2022-01-01"),
            post("b", "Other", "2021-01-01"),
            post("a-2", "Same", "2023-01-01"),
        ];
        let out = DeduplicateByTitle::default().apply(posts);
        let ids: Vec<&str> = out.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a-1", "b"]);

        let removed = &out.report.corrections[0];
        assert_eq!(removed.field, PostField::Removed);
        assert_eq!(removed.original, "a-2");
        assert_eq!(removed.corrected, "a-1");
    }

    #[test]
    fn test_manual_post_wins_over_imported() {
        let posts = vec![
            post("imported", "Same", "2022-01-01"),
            post("hand-written", "Same", "2020-01-01"),
        ];
        let out = DeduplicateByTitle::new(["hand-written"]).apply(posts);
        assert_eq!(out.posts.len(), 1);
        assert_eq!(out.posts[0].id, "hand-written");
        assert_eq!(out.report.corrections[0].original, "imported");
    }

    #[test]
    fn test_manual_kept_when_it_comes_first() {
        let posts = vec![
            post("hand-written", "Same", "2020-01-01"),
            post("imported", "Same", "2022-01-01"),
        ];
        let out = DeduplicateByTitle::new(["hand-written"]).apply(posts);
        assert_eq!(out.posts[0].id, "hand-written");
    }

    #[test]
    fn test_no_duplicates_no_corrections() {
        let posts = vec![post("a", "A", "2020-01-01"), post("b", "B", "2024-01-01")];
        let out = DeduplicateByTitle::default().apply(posts);
        assert!(out.report.is_empty());
        assert_eq!(out.posts[0].id, "b");
    }
}
