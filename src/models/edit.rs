use serde::{Deserialize, Serialize};
use std::fmt;

/// Style presets offered by the style picker. The display name is
/// interpolated verbatim into the instruction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoStyle {
    Realistic,
    Cinematic,
    Vintage,
    Watercolor,
    Anime,
    Cyberpunk,
}

impl PhotoStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoStyle::Realistic => "Realistic",
            PhotoStyle::Cinematic => "Cinematic",
            PhotoStyle::Vintage => "Vintage",
            PhotoStyle::Watercolor => "Watercolor",
            PhotoStyle::Anime => "Anime",
            PhotoStyle::Cyberpunk => "Cyberpunk",
        }
    }

    pub fn all() -> &'static [PhotoStyle] {
        &[
            PhotoStyle::Realistic,
            PhotoStyle::Cinematic,
            PhotoStyle::Vintage,
            PhotoStyle::Watercolor,
            PhotoStyle::Anime,
            PhotoStyle::Cyberpunk,
        ]
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|style| style.as_str().eq_ignore_ascii_case(name))
    }
}

impl Default for PhotoStyle {
    fn default() -> Self {
        PhotoStyle::Realistic
    }
}

impl fmt::Display for PhotoStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One edit request, built fresh per generate action. Image fields hold
/// data URIs produced at upload time.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub background_image: String,
    pub item_image: Option<String>,
    pub item_description: Option<String>,
    pub style: PhotoStyle,
}

impl EditRequest {
    pub fn new(background_image: impl Into<String>, style: PhotoStyle) -> Self {
        Self {
            background_image: background_image.into(),
            item_image: None,
            item_description: None,
            style,
        }
    }

    pub fn with_item_image(mut self, item_image: impl Into<String>) -> Self {
        self.item_image = Some(item_image.into());
        self
    }

    pub fn with_item_description(mut self, description: impl Into<String>) -> Self {
        self.item_description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_realistic() {
        assert_eq!(PhotoStyle::default(), PhotoStyle::Realistic);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(PhotoStyle::parse("cyberpunk"), Some(PhotoStyle::Cyberpunk));
        assert_eq!(PhotoStyle::parse("Realistic"), Some(PhotoStyle::Realistic));
        assert_eq!(PhotoStyle::parse("sketch"), None);
    }

    #[test]
    fn test_request_builder_methods() {
        let request = EditRequest::new("data:image/png;base64,AA==", PhotoStyle::Vintage)
            .with_item_image("data:image/jpeg;base64,AA==")
            .with_item_description("the bouquet of roses");

        assert_eq!(request.style, PhotoStyle::Vintage);
        assert!(request.item_image.is_some());
        assert_eq!(
            request.item_description.as_deref(),
            Some("the bouquet of roses")
        );
    }
}
