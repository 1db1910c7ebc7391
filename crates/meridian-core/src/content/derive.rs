//! Slug, excerpt and read-time derivation.
//!
//! Everything here is pure: the same input always yields the same output,
//! so re-saving an unchanged post derives identical values.

use std::sync::LazyLock;

use regex::Regex;

/// Target excerpt length in characters, before the ellipsis.
pub const DEFAULT_EXCERPT_LENGTH: usize = 160;

/// Reading speed used for read-time estimates.
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

const ELLIPSIS: &str = "...";

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s_-]").expect("valid slug charset regex"));

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid separator regex"));

static HTML_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Valid slug pattern: lowercase letters, numbers, and single hyphens.
static SLUG_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

/// Turn a title into a URL slug.
///
/// Returns an empty string when the title has no usable characters; callers
/// decide what to do with that.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept = NON_SLUG_CHARS.replace_all(lowered.trim(), "");
    let hyphenated = SEPARATOR_RUNS.replace_all(&kept, "-");
    hyphenated.trim_matches('-').to_string()
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_FORMAT.is_match(slug)
}

/// Reduce HTML to plain text.
///
/// Each tag becomes a space rather than vanishing, so block boundaries like
/// `<p>a</p><p>b</p>` still separate words. Inline markup splits too:
/// `Q<sup>3</sup>` reads as "Q 3" and counts as two words.
pub fn strip_html(html: &str) -> String {
    let text = HTML_TAGS.replace_all(html, " ");
    // &amp; goes last so "&amp;lt;" decodes to "&lt;", not "<".
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&");
    WHITESPACE_RUNS.replace_all(&text, " ").trim().to_string()
}

/// Plain-text excerpt of at most `max_length` characters plus an ellipsis.
pub fn generate_excerpt(content: &str, max_length: usize) -> String {
    let text = strip_html(content);
    if text.chars().count() <= max_length {
        return text;
    }

    // One extra char so a space sitting right at the cutoff counts as a boundary.
    let window: String = text.chars().take(max_length + 1).collect();
    match window.rfind(' ') {
        Some(idx) if idx > 0 => format!("{}{ELLIPSIS}", window[..idx].trim_end()),
        _ => {
            let hard: String = text.chars().take(max_length).collect();
            format!("{hard}{ELLIPSIS}")
        }
    }
}

/// Estimated reading time in whole minutes, never below 1.
pub fn calculate_read_time(content: &str, words_per_minute: usize) -> u32 {
    let words = strip_html(content).split_whitespace().count();
    let minutes = words.div_ceil(words_per_minute.max(1)).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}
