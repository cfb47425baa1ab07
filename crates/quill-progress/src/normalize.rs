// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical keys for video URLs.

use once_cell::sync::Lazy;
use regex::Regex;

static YOUTUBE_ID: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r#"(?:youtu\.be/|youtube\.com(?:/embed/|/v/|/watch\?v=|/watch\?.+&v=))([^"&?/\s]{11})"#,
    )
    .ok()
});

/// Eleven-character YouTube video id embedded in `url`, if any.
pub fn youtube_id(url: &str) -> Option<&str> {
    YOUTUBE_ID
        .as_ref()?
        .captures(url)?
        .get(1)
        .map(|m| m.as_str())
}

/// Maps every YouTube URL form to `https://youtube.com/watch?v=<id>`; other URLs pass through.
pub fn normalize_url(url: &str) -> String {
    youtube_id(url).map_or_else(
        || url.to_owned(),
        |id| format!("https://youtube.com/watch?v={id}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANON: &str = "https://youtube.com/watch?v=dQw4w9WgXcQ";

    #[test]
    fn youtube_forms_collapse_to_one_key() {
        for url in [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ?start=10",
            "https://youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
        ] {
            assert_eq!(normalize_url(url), CANON, "{url}");
        }
    }

    #[test]
    fn other_urls_pass_through() {
        let cdn = "https://cdn.example.com/a.mp4";
        assert_eq!(normalize_url(cdn), cdn);
        assert_eq!(normalize_url("https://youtu.be/short"), "https://youtu.be/short");
    }

    #[test]
    fn normalization_is_idempotent() {
        assert_eq!(normalize_url(CANON), CANON);
    }
}
