use crate::parser::markdown::{compile_markdown_to_html, offset_footnotes};

#[test]
fn test_compile_markdown_basic() {
    let result = compile_markdown_to_html("# Title\nThis is a [link](/about)");

    assert!(result.contains("<h1>Title</h1>"));
    assert!(result.contains(r#"<a href="/about">link</a>"#));
}

// footnotes come out with fnN / fnrefN anchors in order of first reference
#[test]
fn test_footnotes_use_numbered_anchors() {
    let result = compile_markdown_to_html(
        "First[^note] and second[^other].\n\n[^note]: The note.\n\n[^other]: The other.\n",
    );

    assert!(result.contains(r##"href="#fn1""##));
    assert!(result.contains(r#"id="fnref1""#));
    assert!(result.contains(r##"href="#fn2""##));
    assert!(result.contains(r#"id="fn1""#));
    assert!(result.contains(r#"id="fn2""#));
    assert!(result.contains(r##"href="#fnref2""##));
}

#[test]
fn test_offset_footnotes_suffixes_anchors_and_ids() {
    let html = r##"<a href="#fn1" id="fnref1">[1]</a><div id="fn1"><a href="#fnref1">1.</a></div>"##;

    let offset = offset_footnotes(html, 3);

    assert_eq!(
        offset,
        r##"<a href="#fn13" id="fnref13">[1]</a><div id="fn13"><a href="#fnref13">1.</a></div>"##
    );
}

// two days that both use fn1 end up with distinct anchors on one page
#[test]
fn test_offset_footnotes_disambiguates_days() {
    let day = compile_markdown_to_html("Claim[^a].\n\n[^a]: Source.\n");

    let first = offset_footnotes(&day, 0);
    let second = offset_footnotes(&day, 1);

    assert!(first.contains(r#"id="fn10""#));
    assert!(first.contains(r#"id="fnref10""#));
    assert!(second.contains(r#"id="fn11""#));
    assert!(second.contains(r#"id="fnref11""#));
    assert!(!first.contains(r#"id="fn11""#));
    assert!(!second.contains(r#"id="fn10""#));
}

#[test]
fn test_offset_footnotes_leaves_plain_html_alone() {
    let html = "<p>No notes, just a function fn and a class=\"footnote\".</p>";
    assert_eq!(offset_footnotes(html, 7), html);
}
