use crate::domain::Metadata;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const METADATA_MARKER: &str = "@@";

/// Parses `@@Key=Value` lines into a mapping.
///
/// The marker is optional so the same parser handles site default files. Lines
/// without `=` (or with an empty key) are skipped, never reported.
pub fn parse_metadata<'a, I>(lines: I) -> Metadata
where
    I: IntoIterator<Item = &'a str>,
{
    let mut metadata = Metadata::new();

    for line in lines {
        let line = line.replacen(METADATA_MARKER, "", 1);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        metadata.insert(key.to_string(), value.trim().to_string());
    }

    metadata
}

/// Merges `overrides` onto `base`; on conflicting keys the override wins.
pub fn merge_metadata(base: &Metadata, overrides: Metadata) -> Metadata {
    let mut merged = base.clone();
    merged.extend(overrides);
    merged
}

/// Splits a post's text into its metadata lines and the Markdown body.
pub fn split_post_lines(content: &str) -> (Vec<&str>, String) {
    let (metadata, body): (Vec<&str>, Vec<&str>) = content
        .lines()
        .partition(|line| line.starts_with(METADATA_MARKER));

    (metadata, body.join("\n"))
}

/// Replaces every `@@Key@@` placeholder in `haystack` with its metadata value.
pub fn replace_metadata(metadata: &Metadata, haystack: &str) -> String {
    let mut replaced = haystack.to_string();
    for (key, value) in metadata {
        let placeholder = format!("{METADATA_MARKER}{key}{METADATA_MARKER}");
        if replaced.contains(&placeholder) {
            replaced = replaced.replace(&placeholder, value);
        }
    }
    replaced
}

/// Reads a publish timestamp out of a `Date` metadata value.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    // tier 1: a full timestamp with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    // tier 2: local timestamps
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    // tier 3: bare date at midnight
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
