use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

pub const POSTS_ROOT: &str = "posts";
pub const MARKDOWN_EXTENSION: &str = ".md";
pub const REDIRECT_EXTENSION: &str = ".redirect";

static POST_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\./)?posts/\d{4}/\d{1,2}/\d{1,2}/[A-Za-z0-9_+\-]+(\.redirect|\.md)?$")
        .expect("post path pattern is valid")
});

/// True when `path` has the shape `posts/YYYY/M/D/slug[.md|.redirect]`.
pub fn is_post_path(path: &str) -> bool {
    POST_PATH.is_match(&path.replace('\\', "/"))
}

/// The calendar day encoded in a post path. Only meaningful once [`is_post_path`]
/// holds; `None` when the segments don't form a real date (e.g. month 13).
pub fn day_from_path(path: &str) -> Option<NaiveDate> {
    let path = path.replace('\\', "/");
    let trimmed = path.trim_start_matches("./");
    let mut parts = trimmed.split('/').skip(1);

    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn is_redirect_path(path: &str) -> bool {
    path.ends_with(REDIRECT_EXTENSION)
}

/// Canonical cache key for a content file: forward slashes, a `./` prefix for
/// anything under the posts root, and no Markdown extension. So `posts/a` and
/// `./posts/a.md` share a key.
pub fn normalized_key(path: &str) -> String {
    let path = path.replace('\\', "/");
    let path = path.strip_suffix(MARKDOWN_EXTENSION).unwrap_or(&path);

    if path.starts_with(POSTS_ROOT) {
        format!("./{}", path)
    } else {
        path.to_string()
    }
}

/// The content-relative path without `./` or extension, e.g. `posts/2014/3/17/birthday`.
pub fn content_stem(path: &str) -> String {
    let key = normalized_key(path);
    let key = key.strip_suffix(REDIRECT_EXTENSION).unwrap_or(&key);
    key.trim_start_matches("./").to_string()
}

/// The site-relative link for a content file: `posts/2014/3/17/birthday.md` -> `/2014/3/17/birthday`.
pub fn external_link(path: &str) -> String {
    let stem = content_stem(path);
    let without_root = stem
        .strip_prefix(POSTS_ROOT)
        .map(|rest| rest.trim_start_matches('/'))
        .unwrap_or(&stem);
    format!("/{}", without_root)
}

/// A route slug is safe to join onto the posts root when it only uses the
/// characters a post name may contain.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '_'))
}
