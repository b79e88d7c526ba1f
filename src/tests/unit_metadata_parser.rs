use crate::domain::Metadata;
use crate::parser::metadata::{
    merge_metadata, parse_metadata, parse_publish_date, replace_metadata, split_post_lines,
};
use chrono::NaiveDate;

#[test]
fn test_parse_metadata_splits_on_first_equals() {
    let metadata = parse_metadata([
        "@@Title=Birthday",
        "@@Link = https://example.com/?a=b ",
        "@@  Date=2014-03-17 10:00",
    ]);

    assert_eq!(metadata.get("Title").unwrap(), "Birthday");
    // everything after the first '=' belongs to the value
    assert_eq!(metadata.get("Link").unwrap(), "https://example.com/?a=b");
    assert_eq!(metadata.get("Date").unwrap(), "2014-03-17 10:00");
}

// malformed lines are dropped without complaint
#[test]
fn test_parse_metadata_skips_malformed_lines() {
    let metadata = parse_metadata(["@@NoEqualsHere", "@@=orphan value", "@@Kept=yes"]);

    assert_eq!(metadata.len(), 1);
    assert_eq!(metadata.get("Kept").unwrap(), "yes");
}

#[test]
fn test_merge_metadata_file_values_win() {
    let mut defaults = Metadata::new();
    defaults.insert("Author".into(), "Site Author".into());
    defaults.insert("SiteTitle".into(), "Test Blog".into());

    let from_file = parse_metadata(["@@Author=Guest Writer", "@@Title=Hello"]);
    let merged = merge_metadata(&defaults, from_file);

    assert_eq!(merged.get("Author").unwrap(), "Guest Writer");
    assert_eq!(merged.get("SiteTitle").unwrap(), "Test Blog");
    assert_eq!(merged.get("Title").unwrap(), "Hello");
}

#[test]
fn test_split_post_lines_separates_body() {
    let (metadata, body) = split_post_lines("@@Title=Hi\n@@Date=2014-03-17\n# Heading\nText");

    assert_eq!(metadata, vec!["@@Title=Hi", "@@Date=2014-03-17"]);
    assert_eq!(body, "# Heading\nText");
}

#[test]
fn test_replace_metadata_replaces_every_occurrence() {
    let metadata = parse_metadata(["@@Title=Hello"]);
    let replaced = replace_metadata(&metadata, "@@Title@@ and again @@Title@@, but not @@Other@@");

    assert_eq!(replaced, "Hello and again Hello, but not @@Other@@");
}

#[test]
fn test_parse_publish_date_formats() {
    let day = NaiveDate::from_ymd_opt(2014, 3, 17).unwrap();

    assert_eq!(
        parse_publish_date("2014-03-17 10:30"),
        day.and_hms_opt(10, 30, 0)
    );
    assert_eq!(
        parse_publish_date("2014-03-17 10:30:15"),
        day.and_hms_opt(10, 30, 15)
    );
    assert_eq!(
        parse_publish_date("2014-03-17T10:30:15-05:00"),
        day.and_hms_opt(10, 30, 15)
    );
    assert_eq!(parse_publish_date("2014-03-17"), day.and_hms_opt(0, 0, 0));
    assert_eq!(parse_publish_date("last tuesday"), None);
}
