// File: src/model.rs
use serde::{Deserialize, Serialize};

/// One answer from the duck API. Only `url` is required; the API also sends a
/// short attribution `message` which we keep when present.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DuckRecord {
    pub url: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl DuckRecord {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn kind(&self) -> ImageKind {
        ImageKind::of(&self.url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Multi-frame image, played through an animation decoder.
    Animated,
    Static,
}

impl ImageKind {
    pub fn of(url: &str) -> Self {
        const GIF: &[u8] = b".gif";
        let bytes = url.as_bytes();
        if bytes.len() >= GIF.len() && bytes[bytes.len() - GIF.len()..].eq_ignore_ascii_case(GIF) {
            ImageKind::Animated
        } else {
            ImageKind::Static
        }
    }

    pub fn is_animated(self) -> bool {
        self == ImageKind::Animated
    }
}

/// `None` means there is nothing to render yet.
pub fn classify(url: Option<&str>) -> Option<ImageKind> {
    url.map(ImageKind::of)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_url_verbatim() {
        let body = br#"{"message":"Powered by random-d.uk","url":"https://random-d.uk/api/42.jpg"}"#;
        let duck = DuckRecord::from_json(body).unwrap();
        assert_eq!(duck.url, "https://random-d.uk/api/42.jpg");
        assert_eq!(duck.message.as_deref(), Some("Powered by random-d.uk"));
    }

    #[test]
    fn test_parse_url_only_and_unknown_fields() {
        let duck = DuckRecord::from_json(br#"{"url":" x.png ","extra":1}"#).unwrap();
        assert_eq!(duck.url, " x.png ");
        assert_eq!(duck.message, None);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(DuckRecord::from_json(br#"{"link":"a.png"}"#).is_err());
        assert!(DuckRecord::from_json(br#"{"url":42}"#).is_err());
        assert!(DuckRecord::from_json(br#"["a.png"]"#).is_err());
        assert!(DuckRecord::from_json(b"not json").is_err());
    }

    #[test]
    fn test_gif_suffix_any_case_is_animated() {
        for url in [
            "https://example.com/duck.gif",
            "https://example.com/duck.GIF",
            "https://example.com/duck.Gif",
            ".gif",
        ] {
            assert_eq!(ImageKind::of(url), ImageKind::Animated, "{url}");
        }
    }

    #[test]
    fn test_other_urls_are_static() {
        for url in [
            "https://example.com/duck.png",
            "https://example.com/duck.jpg",
            "https://example.com/duck",
            "https://example.com/duck.gif?size=2",
            "https://example.com/gif",
            "",
        ] {
            assert_eq!(ImageKind::of(url), ImageKind::Static, "{url}");
        }
    }

    #[test]
    fn test_classify_absent_and_idempotent() {
        assert_eq!(classify(None), None);
        let url = Some("https://example.com/duck2.gif");
        assert_eq!(classify(url), classify(url));
        assert_eq!(classify(url), Some(ImageKind::Animated));
    }

    #[test]
    fn test_non_ascii_tail_does_not_panic() {
        assert_eq!(ImageKind::of("é"), ImageKind::Static);
        assert_eq!(ImageKind::of("canard.gïf"), ImageKind::Static);
    }
}
