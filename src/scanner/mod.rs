use blog_migrate_common::LocalImageIndex;
use std::path::Path;
use walkdir::WalkDir;

/// 画像ディレクトリを走査してローカル画像インデックスを作る
///
/// 直下のファイルのみ（再帰しない）。存在しないディレクトリは空のインデックス。
/// 走査順はファイル名順で、あいまい一致の評価順になる。
pub fn scan_image_dir(dir: &Path) -> LocalImageIndex {
    let mut index = LocalImageIndex::new();

    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "画像ディレクトリが存在しません。空として扱います");
        return index;
    }

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.path().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if !index.insert(file_name.clone()) {
            tracing::debug!(file = %file_name, "画像以外のファイルをスキップ");
        }
    }

    tracing::debug!(dir = %dir.display(), count = index.len(), "ローカル画像を走査");
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let index = scan_image_dir(Path::new("/nonexistent/blog-migrate/images"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_scan_only_image_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.JPG")).unwrap();
        File::create(dir.path().join("a.png")).unwrap();
        File::create(dir.path().join("c.webp")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let index = scan_image_dir(dir.path());
        let names: Vec<&str> = index.iter().collect();
        assert_eq!(names, vec!["a.png", "b.JPG", "c.webp"]);
        assert_eq!(index.get("b.jpg"), Some("b.JPG"));
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested").join("deep.jpg")).unwrap();
        File::create(dir.path().join("top.jpg")).unwrap();

        let index = scan_image_dir(dir.path());
        assert_eq!(index.len(), 1);
        assert!(index.contains("top.jpg"));
        assert!(!index.contains("deep.jpg"));
    }

    #[test]
    fn test_directory_named_like_image_is_ignored() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("folder.jpg")).unwrap();

        let index = scan_image_dir(dir.path());
        assert!(index.is_empty());
    }
}
