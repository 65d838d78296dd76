use std::path::Path;

use crate::path_to_file_extension_string;

/// Top-level directory names the walker must never descend into,
/// so repeated runs do not re-sort already sorted output.
pub const RESERVED_CATEGORY_DIRS: [&str; 6] = ["archives", "video", "audio", "documents", "images", "others"];

const ARCHIVE_EXTENSIONS: [&str; 8] = ["bz2", "gz", "tar", "tbz2", "tgz", "txz", "xz", "zip"];
const IMAGE_EXTENSIONS: [&str; 10] = ["bmp", "gif", "heic", "ico", "jpeg", "jpg", "png", "svg", "tiff", "webp"];
const AUDIO_EXTENSIONS: [&str; 10] = ["aac", "aif", "aiff", "flac", "m4a", "mp3", "ogg", "opus", "wav", "wma"];
const VIDEO_EXTENSIONS: [&str; 10] = ["avi", "flv", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "webm", "wmv"];
const DOCUMENT_EXTENSIONS: [&str; 9] = ["doc", "docx", "odt", "pdf", "ppt", "pptx", "rtf", "xls", "xlsx"];

/// File category resolved from a file extension.
///
/// Each variant maps to one target directory under the source root.
/// Extensions outside every fixed group get their own directory,
/// named after the lowercase extension itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Archives,
    Images,
    Audio,
    Video,
    Documents,
    Others,
    Extension(String),
}

impl Category {
    /// Resolve the category for a file extension.
    ///
    /// Case-insensitive and total: every extension maps to exactly one
    /// category, and a missing extension maps to `Others`.
    #[must_use]
    pub fn classify(extension: &str) -> Self {
        let extension = extension.to_lowercase();
        if extension.is_empty() {
            Self::Others
        } else if ARCHIVE_EXTENSIONS.contains(&extension.as_str()) {
            Self::Archives
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Self::Images
        } else if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            Self::Audio
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Self::Video
        } else if DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
            Self::Documents
        } else {
            Self::Extension(extension)
        }
    }

    /// Resolve the category for a file path from its extension.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        Self::classify(&path_to_file_extension_string(path))
    }

    /// Name of the directory under the source root that collects this category.
    #[must_use]
    pub fn dir_name(&self) -> &str {
        match self {
            Self::Archives => "archives",
            Self::Images => "images",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Documents => "documents",
            Self::Others => "others",
            Self::Extension(extension) => extension,
        }
    }

    /// Archives are extracted instead of moved.
    #[must_use]
    pub const fn is_archive(&self) -> bool {
        matches!(self, Self::Archives)
    }
}
