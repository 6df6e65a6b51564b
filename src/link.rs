use std::sync::LazyLock;

use regex::Regex;

const EMBED_BASE: &str = "https://www.youtube.com/embed";
const THUMBNAIL_BASE: &str = "https://i.ytimg.com/vi";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Empty,
    YoutubeWatch,
    YoutubeShort,
    YoutubeEmbed,
    DirectMedia,
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLink {
    pub playable_url: String,
    pub thumbnail_url: String,
}

/// YouTube patterns, tried in order. The first capture group is the video id.
static YOUTUBE_PATTERNS: LazyLock<Vec<(LinkKind, Regex)>> = LazyLock::new(|| {
    [
        (LinkKind::YoutubeWatch, r"[?&]v=([^&]+)"),
        (LinkKind::YoutubeShort, r"youtu\.be/([^?&/]+)"),
        (LinkKind::YoutubeEmbed, r"youtube\.com/embed/([^?&/]+)"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("invalid link pattern")))
    .collect()
});

static DIRECT_MEDIA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(mp4|webm|ogg|mov|mkv)$").expect("invalid media pattern")
});

/// Classifies a trimmed link, returning the YouTube video id when one was found.
pub fn classify(trimmed: &str) -> (LinkKind, Option<&str>) {
    if trimmed.is_empty() {
        return (LinkKind::Empty, None);
    }

    for (kind, pattern) in YOUTUBE_PATTERNS.iter() {
        if let Some(id) = pattern.captures(trimmed).and_then(|c| c.get(1)) {
            return (*kind, Some(id.as_str()));
        }
    }

    if DIRECT_MEDIA.is_match(trimmed) {
        (LinkKind::DirectMedia, None)
    } else {
        (LinkKind::Opaque, None)
    }
}

pub fn youtube_thumbnail_url(id: &str) -> String {
    format!("{THUMBNAIL_BASE}/{id}/maxresdefault.jpg")
}

/// Derives the playable URL and thumbnail for a user-supplied video link.
///
/// Never fails: links that match no known pattern pass through unchanged
/// with an empty thumbnail.
pub fn normalize(raw_url: &str) -> NormalizedLink {
    let trimmed = raw_url.trim();

    match classify(trimmed) {
        (LinkKind::YoutubeWatch | LinkKind::YoutubeShort, Some(id)) => NormalizedLink {
            playable_url: format!("{EMBED_BASE}/{id}"),
            thumbnail_url: youtube_thumbnail_url(id),
        },
        (LinkKind::YoutubeEmbed, Some(id)) => NormalizedLink {
            playable_url: trimmed.to_string(),
            thumbnail_url: youtube_thumbnail_url(id),
        },
        _ => NormalizedLink {
            playable_url: trimmed.to_string(),
            thumbnail_url: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_url_becomes_embed_with_thumbnail() {
        let link = normalize("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(link.playable_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
        assert_eq!(
            link.thumbnail_url,
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[test]
    fn watch_id_stops_at_next_query_parameter() {
        let link = normalize("https://www.youtube.com/watch?list=PL1&v=abc123&t=42s");
        assert!(link.playable_url.ends_with("/embed/abc123"));
        assert!(link.thumbnail_url.contains("/vi/abc123/"));
    }

    #[test]
    fn first_v_parameter_wins() {
        let link = normalize("https://youtube.com/watch?v=first&v=second");
        assert!(link.playable_url.ends_with("/embed/first"));
    }

    #[test]
    fn short_link_matches_watch_form() {
        let short = normalize("https://youtu.be/XyZ_09?si=tracking");
        let watch = normalize("https://www.youtube.com/watch?v=XyZ_09");
        assert_eq!(short, watch);
    }

    #[test]
    fn embed_link_is_kept_and_gets_thumbnail() {
        let raw = "https://www.youtube.com/embed/abc123?autoplay=1";
        let link = normalize(raw);
        assert_eq!(link.playable_url, raw);
        assert_eq!(
            link.thumbnail_url,
            "https://i.ytimg.com/vi/abc123/maxresdefault.jpg"
        );
    }

    #[test]
    fn direct_media_passes_through() {
        for raw in [
            "https://cdn.example.com/clip.mp4",
            "https://cdn.example.com/clip.WEBM",
            "http://host/a/b/movie.mkv",
        ] {
            let link = normalize(raw);
            assert_eq!(link.playable_url, raw);
            assert!(link.thumbnail_url.is_empty());
        }
        assert_eq!(
            classify("https://cdn.example.com/clip.Mov"),
            (LinkKind::DirectMedia, None)
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let link = normalize("  https://cdn.example.com/clip.mp4 \n");
        assert_eq!(link.playable_url, "https://cdn.example.com/clip.mp4");
    }

    #[test]
    fn empty_and_blank_input_yield_empty_link() {
        for raw in ["", "   ", "\t\n"] {
            let link = normalize(raw);
            assert_eq!(link.playable_url, "");
            assert_eq!(link.thumbnail_url, "");
        }
    }

    #[test]
    fn malformed_youtube_links_are_opaque() {
        for raw in [
            "https://www.youtube.com/watch",
            "https://youtu.be/",
            "https://www.youtube.com/embed/",
            "not a url at all",
        ] {
            let link = normalize(raw);
            assert_eq!(link.playable_url, raw);
            assert!(link.thumbnail_url.is_empty(), "{raw}");
            assert_eq!(classify(raw).0, LinkKind::Opaque);
        }
    }
}
