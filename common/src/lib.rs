//! Blog Migrate Common Library
//!
//! WordPress添付ファイルの解決とローカル画像照合のコア。I/Oを持たない。

pub mod types;
pub mod error;
pub mod attachment;
pub mod image_index;
pub mod matcher;
pub mod resolver;

pub use types::{BlogPost, PostMeta, WpItem, THUMBNAIL_META_KEY};
pub use error::{Error, Result};
pub use attachment::{AttachmentIndex, AttachmentRecord};
pub use image_index::{is_image_file_name, LocalImageIndex, IMAGE_EXTENSIONS};
pub use matcher::{file_name_from_url, find_local_image, join_image_path, LocalMatch, MatchTier};
pub use resolver::{resolve_thumbnail, ResolvedImage, ThumbnailResolution};
