//! Value types shared by the journal page flows.

use serde::{Deserialize, Serialize};

/// Placeholder tag rendered when an entry carries no removable tags.
pub const NO_ADDITIONAL_TAGS: &str = "{{ NO_ADDITIONAL_TAGS}}";

/// Tag that marks an entry as highlighted.
pub const HIGHLIGHTED_TAG: &str = "highlighted";

/// Tag that marks an entry as sitting in the inbox.
pub const INBOX_TAG: &str = "inbox";

/// CSS-like class applied to highlighted entries.
pub const HIGHLIGHTED_CLASS: &str = "highlighted";

/// CSS-like class applied to inbox entries.
pub const INBOX_CLASS: &str = "in_inbox";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];

/// How an uploaded file is previewed in the recent-uploads list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewKind {
    Image,
    Document,
}

impl PreviewKind {
    /// Classify a file by the extension of its name (case-insensitive).
    pub fn for_file_name(name: &str) -> Self {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return Self::Document;
        };
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Image
        } else {
            Self::Document
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
        }
    }
}

impl std::fmt::Display for PreviewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file the server reports as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub name: String,
}

impl UploadedFile {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }

    pub fn preview_kind(&self) -> PreviewKind {
        PreviewKind::for_file_name(&self.name)
    }

    pub fn markdown_image(&self) -> String {
        markdown_image(&self.url)
    }
}

/// Markdown image reference for a media URL.
pub fn markdown_image(url: &str) -> String {
    format!("![]({url})")
}

/// Clipboard text for one completed upload batch, in server order.
pub fn batch_clipboard_text(files: &[UploadedFile]) -> String {
    files
        .iter()
        .map(UploadedFile::markdown_image)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown link that points back at a journal entry.
pub fn entry_reference(datestr: &str, location: &str) -> String {
    format!("[journal entry {datestr}]({location})")
}

/// Classes an entry should carry given its whitespace-separated tag list.
pub fn highlight_classes(tags: &str) -> Vec<&'static str> {
    let tags: Vec<&str> = tags.split_whitespace().collect();
    let mut classes = Vec::new();
    if tags.contains(&HIGHLIGHTED_TAG) {
        classes.push(HIGHLIGHTED_CLASS);
    }
    if tags.contains(&INBOX_TAG) {
        classes.push(INBOX_CLASS);
    }
    classes
}
