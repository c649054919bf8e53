//! Multimodal content items and generated media references.

use serde::{Deserialize, Serialize};

fn default_role() -> String {
    "user".to_string()
}

/// One piece of multimodal input.
///
/// Without a MIME type the content is sent as text. With a MIME type the
/// content is a storage URI whose bytes are sent inline.
///
/// # Examples
///
/// ```
/// use gemini_tasks_core::ContentItem;
///
/// let text = ContentItem::text("Can you describe this image?");
/// assert!(!text.is_media());
/// assert_eq!(text.role(), "user");
///
/// let image = ContentItem::media("memory://inputs/kitten.jpg", "image/jpeg");
/// assert!(image.is_media());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct ContentItem {
    /// Text, or a storage URI when `mime_type` is set
    content: String,
    /// MIME type of non-text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    mime_type: Option<String>,
    /// Content role, `user` unless set
    #[serde(default = "default_role")]
    #[builder(default = "default_role()")]
    role: String,
}

impl ContentItem {
    /// Creates a text item.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mime_type: None,
            role: default_role(),
        }
    }

    /// Creates a media item pointing at a storage URI.
    pub fn media(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            content: uri.into(),
            mime_type: Some(mime_type.into()),
            role: default_role(),
        }
    }

    /// Returns a builder for constructing a ContentItem.
    pub fn builder() -> ContentItemBuilder {
        ContentItemBuilder::default()
    }

    /// True when the content must be fetched from storage.
    pub fn is_media(&self) -> bool {
        self.mime_type.is_some()
    }
}

/// Reference to an image the model generated and the task stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    /// Storage URI of the image
    uri: String,
    /// MIME type of the image
    mime_type: String,
}

impl GeneratedImage {
    /// Creates a generated image reference.
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }
}
