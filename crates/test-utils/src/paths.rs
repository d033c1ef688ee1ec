//! Path utilities for locating workspace files and system fonts.
//!
//! Font-dependent tests need a real TrueType file. None is committed to the
//! repository, so tests look for a common system font and skip when none is
//! installed (see [`crate::require_font!`]).

use std::path::PathBuf;

/// Well-known locations of freely available sans-serif fonts.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Returns the workspace root directory.
///
/// This is determined by walking up from the current crate's manifest directory
/// until we find the workspace Cargo.toml.
pub fn workspace_root() -> PathBuf {
    // Start from the test-utils crate manifest dir
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the shipped template configuration.
pub fn shipped_config_path() -> PathBuf {
    workspace_root().join("config").join("templates.yaml")
}

/// Searches for a usable TrueType font.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_FONT` (path to a font file)
/// 2. Environment variable `TEST_FONT_DIR` (first `.ttf` inside it)
/// 3. `testdata/fonts/` at the workspace root
/// 4. Common system font locations
pub fn find_system_font() -> Option<PathBuf> {
    if let Ok(font) = std::env::var("TEST_FONT") {
        let path = PathBuf::from(font);
        if path.is_file() {
            return Some(path);
        }
    }

    let mut dirs = Vec::new();
    if let Ok(dir) = std::env::var("TEST_FONT_DIR") {
        dirs.push(PathBuf::from(dir));
    }
    dirs.push(workspace_root().join("testdata").join("fonts"));

    for dir in dirs {
        if let Some(path) = first_ttf_in(&dir) {
            return Some(path);
        }
    }

    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

fn first_ttf_in(dir: &std::path::Path) -> Option<PathBuf> {
    let mut fonts: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("ttf"))
                .unwrap_or(false)
        })
        .collect();
    fonts.sort();
    fonts.into_iter().next()
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        // Should contain Cargo.toml at workspace level
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_shipped_config_exists() {
        assert!(shipped_config_path().is_file());
    }

    #[test]
    fn test_found_font_is_a_file() {
        if let Some(path) = find_system_font() {
            assert!(path.is_file());
        }
    }

    #[test]
    fn test_first_ttf_ignores_other_files() {
        let dir = temp_test_dir();
        std::fs::write(dir.path().join("readme.txt"), b"x").unwrap();
        assert!(first_ttf_in(dir.path()).is_none());

        std::fs::write(dir.path().join("b.TTF"), b"x").unwrap();
        std::fs::write(dir.path().join("a.ttf"), b"x").unwrap();
        assert_eq!(first_ttf_in(dir.path()).unwrap(), dir.path().join("a.ttf"));
    }
}
