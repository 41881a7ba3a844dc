use std::ffi::OsStr;
use std::path::Path;

pub trait PathExt {
    /// `.md` or `.mdx` topic file.
    fn is_content_file(&self) -> bool;
}

impl PathExt for Path {
    fn is_content_file(&self) -> bool {
        matches!(
            self.extension().and_then(OsStr::to_str),
            Some("md") | Some("mdx")
        )
    }
}

/// Slug derived from a topic file's location: relative path, extension dropped, `/`-separated.
pub fn slug_from_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
