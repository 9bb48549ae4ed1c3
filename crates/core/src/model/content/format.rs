use serde::{Deserialize, Serialize};
use std::fmt;

/// Media kind of a question prompt or an answer's reveal content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    Image,
    Audio,
    Video,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Text, Format::Image, Format::Audio, Format::Video];

    /// Maps a server format tag onto a format.
    ///
    /// Matching ignores case and surrounding whitespace. Any tag that is not
    /// text, audio or video resolves to `Image`, including empty and unknown tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("text") {
            Format::Text
        } else if tag.eq_ignore_ascii_case("video") {
            Format::Video
        } else if tag.eq_ignore_ascii_case("audio") {
            Format::Audio
        } else {
            Format::Image
        }
    }

    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Image => "image",
            Format::Audio => "audio",
            Format::Video => "video",
        }
    }

    /// Audio and video play through the media surface; text and image do not.
    #[must_use]
    pub fn is_playable(self) -> bool {
        matches!(self, Format::Audio | Format::Video)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve_case_insensitively() {
        assert_eq!(Format::from_tag("TEXT"), Format::Text);
        assert_eq!(Format::from_tag(" audio "), Format::Audio);
        assert_eq!(Format::from_tag("Video"), Format::Video);
        assert_eq!(Format::from_tag("image"), Format::Image);
    }

    #[test]
    fn unknown_tags_fall_back_to_image() {
        assert_eq!(Format::from_tag("UNKNOWN_FORMAT"), Format::Image);
        assert_eq!(Format::from_tag(""), Format::Image);
        assert_eq!(Format::from_tag("pdf"), Format::Image);
    }

    #[test]
    fn only_audio_and_video_are_playable() {
        let playable: Vec<_> = Format::ALL.into_iter().filter(|f| f.is_playable()).collect();
        assert_eq!(playable, vec![Format::Audio, Format::Video]);
    }
}
