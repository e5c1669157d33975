//! YouTube link extraction from product descriptions.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Candidate YouTube references. The video ID is validated separately.
static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?[^\s"'<>]+|embed/[A-Za-z0-9_-]+|shorts/[A-Za-z0-9_-]+)|youtu\.be/[A-Za-z0-9_-]+)"#,
    )
    .expect("Invalid regex")
});

const VIDEO_ID_LEN: usize = 11;

/// Find the first YouTube video referenced in `text`.
///
/// Returns the canonical `https://www.youtube.com/watch?v=<id>` form.
#[must_use]
pub fn extract_youtube_link(text: &str) -> Option<String> {
    YOUTUBE_RE
        .find_iter(text)
        .find_map(|m| video_id(m.as_str()))
        .map(|id| format!("https://www.youtube.com/watch?v={id}"))
}

fn video_id(candidate: &str) -> Option<String> {
    // Descriptions are HTML, so query separators may be escaped
    let candidate = candidate.replace("&amp;", "&");
    let with_scheme = if candidate.contains("://") {
        candidate
    } else {
        format!("https://{candidate}")
    };
    let url = Url::parse(&with_scheme).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();

    let id = if host.ends_with("youtu.be") {
        url.path_segments()?.next()?.to_string()
    } else {
        let mut segments = url.path_segments()?;
        match segments.next()? {
            // Plain-text links often end a sentence: `...watch?v=<id>.`
            "watch" => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .and_then(|(_, value)| leading_id(&value).map(str::to_string))?,
            "embed" | "shorts" => segments.next()?.to_string(),
            _ => return None,
        }
    };

    is_video_id(&id).then_some(id)
}

/// The run of ID characters at the start of `value`.
fn leading_id(value: &str) -> Option<&str> {
    let end = value.find(|c: char| !is_id_char(c)).unwrap_or(value.len());
    value.get(..end)
}

const fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_video_id(id: &str) -> bool {
    id.len() == VIDEO_ID_LEN && id.chars().all(is_id_char)
}
