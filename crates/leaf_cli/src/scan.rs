//! Expands command-line paths into the list of images to diagnose.

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options controlling how directories are expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// When true, descend into subdirectories.
    pub recursive: bool,
}

/// Files are taken as given; directories contribute their supported images
/// in sorted order.
pub fn collect_images(inputs: &[PathBuf], opts: ScanOptions) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for input in inputs {
        if input.is_dir() {
            images.extend(scan_folder(input, opts)?);
        } else if input.exists() {
            images.push(input.clone());
        } else {
            anyhow::bail!("Path does not exist: {}", input.display());
        }
    }
    Ok(images)
}

/// Scan one folder for `jpg`, `jpeg` and `png` files.
pub fn scan_folder(root: &Path, opts: ScanOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let walker = if opts.recursive {
        WalkDir::new(root)
    } else {
        WalkDir::new(root).max_depth(1)
    };

    let mut found = Vec::new();
    for entry in walker.sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("walkdir error: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_supported_image(path) {
            found.push(path.to_path_buf());
        }
    }
    Ok(found)
}

fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            matches!(ext.as_str(), "jpg" | "jpeg" | "png")
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn names(paths: Vec<PathBuf>) -> Vec<String> {
        paths
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[rstest]
    #[case("leaf.jpg", true)]
    #[case("leaf.JPEG", true)]
    #[case("leaf.Png", true)]
    #[case("leaf.gif", false)]
    #[case("leaf", false)]
    fn recognizes_supported_extensions(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_supported_image(Path::new(name)), expected);
    }

    #[test]
    fn empty_folder_yields_nothing() -> Result<()> {
        let dir = tempdir()?;
        assert!(scan_folder(dir.path(), ScanOptions::default())?.is_empty());
        Ok(())
    }

    #[test]
    fn lists_only_images_non_recursive() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("b.JPG"))?;
        File::create(dir.path().join("a.jpeg"))?;
        File::create(dir.path().join("c.png"))?;
        File::create(dir.path().join("notes.txt"))?;
        let nested = dir.path().join("nested");
        fs::create_dir(&nested)?;
        File::create(nested.join("d.jpg"))?;

        let rows = scan_folder(dir.path(), ScanOptions { recursive: false })?;
        assert_eq!(names(rows), vec!["a.jpeg", "b.JPG", "c.png"]);
        Ok(())
    }

    #[test]
    fn descends_when_recursive() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.jpg"))?;
        let nested = dir.path().join("nested");
        fs::create_dir(&nested)?;
        File::create(nested.join("b.PNG"))?;

        let mut rows = names(scan_folder(dir.path(), ScanOptions { recursive: true })?);
        rows.sort();
        assert_eq!(rows, vec!["a.jpg", "b.PNG"]);
        Ok(())
    }

    #[test]
    fn explicit_files_are_kept_regardless_of_extension() -> Result<()> {
        let dir = tempdir()?;
        let odd = dir.path().join("upload.bin");
        File::create(&odd)?;
        let rows = collect_images(&[odd.clone()], ScanOptions::default())?;
        assert_eq!(rows, vec![odd]);
        Ok(())
    }

    #[test]
    fn missing_path_is_an_error() {
        let err = collect_images(
            &[PathBuf::from("/no/such/leaf.jpg")],
            ScanOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
