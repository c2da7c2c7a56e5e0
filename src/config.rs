use crate::error::{MigrateError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// プレースホルダ画像（解決できなかった投稿に使う番兵パス）
pub const DEFAULT_PLACEHOLDER: &str = "assets/images/blog/placeholder.jpg";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 解決済み画像パスの接頭ディレクトリ
    pub image_base_dir: String,
    pub placeholder_image: String,
    pub author: String,
    /// 本文中で置換対象にするアップロードURLの接頭辞
    pub upload_url_prefix: String,
    pub default_category: String,
    pub words_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MigrateError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("blog-migrate").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            image_base_dir: "assets/images/imagenes-blog".into(),
            placeholder_image: DEFAULT_PLACEHOLDER.into(),
            author: "Carlos Rodgarman".into(),
            upload_url_prefix: "https://carlosrodgarman.com/wp-content/uploads/".into(),
            default_category: "Blog".into(),
            words_per_minute: 200,
        }
    }

    /// プレースホルダは解決済みパスと区別できなければならない
    pub fn validate(&self) -> Result<()> {
        if self.words_per_minute == 0 {
            return Err(MigrateError::Config("words_per_minute は1以上".into()));
        }
        // 空だと本文中のあらゆる語が置換候補になる
        if self.upload_url_prefix.trim().is_empty() {
            return Err(MigrateError::Config("upload_url_prefix が空です".into()));
        }
        if self.placeholder_image.trim().is_empty() {
            return Err(MigrateError::Config("placeholder_image が空です".into()));
        }
        let base = format!("{}/", self.image_base_dir.trim_end_matches('/'));
        if self.placeholder_image.starts_with(&base) {
            return Err(MigrateError::Config(format!(
                "placeholder_image ({}) が image_base_dir ({}) の配下にあります",
                self.placeholder_image, self.image_base_dir
            )));
        }
        Ok(())
    }

    pub fn set_author(&mut self, author: String) -> Result<()> {
        self.author = author;
        self.save()
    }

    pub fn set_upload_url_prefix(&mut self, prefix: String) -> Result<()> {
        self.upload_url_prefix = prefix;
        self.save()
    }
}
