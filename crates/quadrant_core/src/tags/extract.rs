//! Hashtag marker scanning.
//!
//! # Responsibility
//! - Canonicalize sloppy marker spellings in free text in one pass.
//! - Return the ordered, case-insensitively unique markers of a text blob.
//!
//! # Invariants
//! - Pure and infallible; every input yields a defined output.
//! - Quadrant markers are never returned by `extract_markers`.
//! - First-seen spelling and order win on case-insensitive duplicates.
//! - Protocol markers (quadrants, time periods, `#challenge`) are always
//!   rewritten to their canonical spelling.

use crate::model::quadrant::{Quadrant, TimePeriod, CHALLENGE_MARKER};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

// `##tag`, `# #tag`, `#\t#tag` on a single line, starting at line start or
// after blanks so `C# #tag` keeps its `C#`.
static HASH_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|[ \t])#(?:[ \t]*#)+").expect("valid hash run regex"));
static PROTOCOL_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(^|[^\w#])#[ \t]*(do[ \t]?now|delegate|schedule|bin|challenge|today|this[ \t]?week|this[ \t]?month|this[ \t]?quarter)\b",
    )
    .expect("valid protocol marker regex")
});
static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("valid marker regex"));
static FULL_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\w+$").expect("valid full marker regex"));

/// Rewrites hash runs and permissive protocol spellings to canonical markers.
///
/// `"##DoNow"`, `"# #donow"`, `"# Do Now"` all become `"#DoNow"`;
/// `"#this week"` becomes `"#thisweek"`. Other text is left untouched.
pub fn canonicalize_markers(text: &str) -> String {
    let collapsed = HASH_RUN_RE.replace_all(text, "${1}#");
    PROTOCOL_MARKER_RE
        .replace_all(&collapsed, |caps: &Captures<'_>| {
            let word: String = caps[2]
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase();
            match canonical_protocol_marker(&word) {
                Some(marker) => format!("{}{marker}", &caps[1]),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Scans `text` for markers, excluding the four quadrant markers.
pub fn extract_markers(text: &str) -> Vec<String> {
    let canonical = canonicalize_markers(text);
    let found = MARKER_RE
        .find_iter(&canonical)
        .map(|m| m.as_str())
        .filter(|marker| !Quadrant::is_quadrant_marker(marker));
    dedup_markers(found)
}

/// All marker tokens in `text` after canonicalization, quadrants included.
pub fn scan_all_markers(text: &str) -> Vec<String> {
    let canonical = canonicalize_markers(text);
    MARKER_RE
        .find_iter(&canonical)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Case-insensitive, order-preserving dedup; first spelling wins.
pub fn dedup_markers<I, S>(markers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for marker in markers {
        let marker = marker.as_ref();
        if seen.insert(marker.to_lowercase()) {
            unique.push(marker.to_string());
        }
    }
    unique
}

/// Coerces a caller-supplied tag into marker form.
///
/// Adds a missing `#`, collapses hash runs and canonicalizes protocol
/// spellings. Returns `None` when the result is not a single `#word` token.
pub fn sanitize_marker(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return None;
    }
    let candidate = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };
    let canonical = canonicalize_markers(&candidate);
    if FULL_MARKER_RE.is_match(&canonical) {
        Some(canonical)
    } else {
        None
    }
}

/// Whether `token` is exactly one marker.
pub fn is_marker(token: &str) -> bool {
    FULL_MARKER_RE.is_match(token)
}

/// Removes every marker token from already canonicalized text.
pub(crate) fn remove_markers(canonical: &str) -> String {
    MARKER_RE.replace_all(canonical, "").into_owned()
}

fn canonical_protocol_marker(word: &str) -> Option<&'static str> {
    let marker = format!("#{word}");
    if let Some(quadrant) = Quadrant::ALL
        .into_iter()
        .find(|quadrant| quadrant.marker().eq_ignore_ascii_case(&marker))
    {
        return Some(quadrant.marker());
    }
    if marker == CHALLENGE_MARKER {
        return Some(CHALLENGE_MARKER);
    }
    TimePeriod::from_marker(&marker).map(TimePeriod::marker)
}

#[cfg(test)]
mod tests {
    use super::{canonicalize_markers, dedup_markers, extract_markers, sanitize_marker};

    #[test]
    fn canonicalize_collapses_hash_runs_and_spaced_variants() {
        assert_eq!(canonicalize_markers("##DoNow"), "#DoNow");
        assert_eq!(canonicalize_markers("# #donow"), "#DoNow");
        assert_eq!(canonicalize_markers("# Do Now"), "#DoNow");
        assert_eq!(canonicalize_markers("#This Week"), "#thisweek");
        assert_eq!(canonicalize_markers("###work"), "#work");
    }

    #[test]
    fn canonicalize_does_not_join_across_lines() {
        assert_eq!(canonicalize_markers("see #\n#work"), "see #\n#work");
    }

    #[test]
    fn canonicalize_leaves_hashes_glued_to_words() {
        assert_eq!(canonicalize_markers("learn C# #DoNow"), "learn C# #DoNow");
        assert_eq!(canonicalize_markers("learn C# do now"), "learn C# do now");
        assert_eq!(canonicalize_markers("F##"), "F##");
        assert_eq!(canonicalize_markers("a ## #work"), "a #work");
    }

    #[test]
    fn canonicalize_respects_word_boundaries() {
        assert_eq!(canonicalize_markers("#Binder"), "#Binder");
        assert_eq!(canonicalize_markers("#this weekend"), "#this weekend");
    }

    #[test]
    fn extract_excludes_quadrants_and_dedups_case_insensitively() {
        let tags = extract_markers("Plan #Work #DoNow ##work # #home #Bin");
        assert_eq!(tags, vec!["#Work", "#home"]);
    }

    #[test]
    fn extract_finds_markers_mid_word_and_keeps_challenge() {
        let tags = extract_markers("issue#42 #challenge");
        assert_eq!(tags, vec!["#42", "#challenge"]);
    }

    #[test]
    fn extract_on_plain_text_is_empty() {
        assert!(extract_markers("").is_empty());
        assert!(extract_markers("Just a note # with a hash").is_empty());
    }

    #[test]
    fn dedup_keeps_first_spelling() {
        assert_eq!(dedup_markers(["#A", "#b", "#a"]), vec!["#A", "#b"]);
    }

    #[test]
    fn sanitize_marker_adds_prefix_and_rejects_phrases() {
        assert_eq!(sanitize_marker("JohnD").as_deref(), Some("#JohnD"));
        assert_eq!(sanitize_marker(" ##Today ").as_deref(), Some("#today"));
        assert_eq!(sanitize_marker("two words"), None);
        assert_eq!(sanitize_marker("   "), None);
        assert_eq!(sanitize_marker("#"), None);
    }
}
