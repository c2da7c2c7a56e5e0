//! 手動指定のアイキャッチ画像
//!
//! ```json
//! {
//!   "byId": { "neve-genesys": "assets/images/imagenes-blog/neve.jpg" },
//!   "byTitle": { "Celebration Night": "assets/images/imagenes-blog/party.jpg" },
//!   "titleKeywords": [
//!     { "keyword": "atmos", "image": "assets/images/imagenes-blog/atmos.jpg" }
//!   ]
//! }
//! ```
//!
//! `byId` → `byTitle` → `titleKeywords` の順。キーワードはプレースホルダの
//! 投稿にだけ適用し、タイトルにそのまま含まれるかで判定する（大文字小文字を区別）。

use super::{PostCorrection, PostField, PostStep, StepOutput, StepReport};
use crate::error::{MigrateError, Result};
use blog_migrate_common::BlogPost;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// タイトルキーワード → 画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub image: String,
}

/// 上書き設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageOverrides {
    pub by_id: BTreeMap<String, String>,
    pub by_title: BTreeMap<String, String>,
    /// 先に書いたものが優先
    pub title_keywords: Vec<KeywordRule>,
}

impl ImageOverrides {
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: Self =
            serde_json::from_str(json).map_err(|e| MigrateError::InvalidOverrides(e.to_string()))?;
        overrides.validate()?;
        Ok(overrides)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MigrateError::FileNotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        let empty_image = self
            .by_id
            .iter()
            .chain(self.by_title.iter())
            .find(|(_, image)| image.trim().is_empty());
        if let Some((key, _)) = empty_image {
            return Err(MigrateError::InvalidOverrides(format!("{} の画像が空です", key)));
        }
        for rule in &self.title_keywords {
            if rule.keyword.trim().is_empty() {
                return Err(MigrateError::InvalidOverrides("空のキーワードがあります".into()));
            }
            if rule.image.trim().is_empty() {
                return Err(MigrateError::InvalidOverrides(format!(
                    "キーワード {} の画像が空です",
                    rule.keyword
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty() && self.by_title.is_empty() && self.title_keywords.is_empty()
    }

    /// 投稿に当てはまる画像と理由
    fn image_for(&self, post: &BlogPost, placeholder: &str) -> Option<(&str, String)> {
        if let Some(image) = self.by_id.get(&post.id) {
            return Some((image.as_str(), "IDで指定".to_string()));
        }
        if let Some(image) = self.by_title.get(&post.title) {
            return Some((image.as_str(), "タイトルで指定".to_string()));
        }
        if post.featured_image != placeholder {
            return None;
        }
        self.title_keywords
            .iter()
            .find(|rule| post.title.contains(rule.keyword.as_str()))
            .map(|rule| (rule.image.as_str(), format!("キーワード「{}」", rule.keyword)))
    }
}

/// 上書き適用ステップ
#[derive(Debug, Clone)]
pub struct ApplyImageOverrides {
    overrides: ImageOverrides,
    placeholder: String,
}

impl ApplyImageOverrides {
    pub fn new(overrides: ImageOverrides, placeholder: impl Into<String>) -> Self {
        Self {
            overrides,
            placeholder: placeholder.into(),
        }
    }
}

impl PostStep for ApplyImageOverrides {
    fn name(&self) -> &'static str {
        "apply-image-overrides"
    }

    fn apply(&self, posts: Vec<BlogPost>) -> StepOutput {
        let mut report = StepReport::new(self.name());
        let mut posts = posts;

        for post in posts.iter_mut() {
            let Some((image, reason)) = self.overrides.image_for(post, &self.placeholder) else {
                continue;
            };
            if post.featured_image == image {
                continue;
            }
            report.corrections.push(PostCorrection::new(
                post,
                PostField::FeaturedImage,
                &post.featured_image,
                image,
                reason,
            ));
            post.featured_image = image.to_string();
        }

        let remaining = posts
            .iter()
            .filter(|p| p.featured_image == self.placeholder)
            .count();
        if remaining > 0 {
            report
                .notes
                .push(format!("プレースホルダのまま: {} 件", remaining));
        }

        StepOutput { posts, report }
    }
}
