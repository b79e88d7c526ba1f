use once_cell::sync::Lazy;
use pulldown_cmark::{html, CowStr, Event, Options as CmarkOptions, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use std::collections::HashMap;

static FOOTNOTE_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[#"]fn\d+"#).expect("footnote anchor pattern is valid"));
static FOOTNOTE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"fnref\d+").expect("footnote id pattern is valid"));

// compiles a post body into HTML. footnotes are emitted with `fnN` / `fnrefN`
// anchors, numbered in order of first appearance, so listings can offset them later
pub fn compile_markdown_to_html(markdown_content: &str) -> String {
    let mut options = CmarkOptions::empty();
    options.insert(CmarkOptions::ENABLE_STRIKETHROUGH);
    options.insert(CmarkOptions::ENABLE_TABLES);
    options.insert(CmarkOptions::ENABLE_FOOTNOTES);
    options.insert(CmarkOptions::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(markdown_content, options);

    let mut numbers: HashMap<String, usize> = HashMap::new();
    let mut number_for = |label: &str| -> usize {
        let next = numbers.len() + 1;
        *numbers.entry(label.to_string()).or_insert(next)
    };

    let event_iterator = parser.map(|event| match event {
        Event::FootnoteReference(label) => {
            let n = number_for(&*label);
            Event::InlineHtml(CowStr::from(format!(
                r##"<sup class="footnote-ref"><a href="#fn{n}" id="fnref{n}">[{n}]</a></sup>"##
            )))
        }
        Event::Start(Tag::FootnoteDefinition(label)) => {
            let n = number_for(&*label);
            Event::Html(CowStr::from(format!(
                r##"<div class="footnote-item" id="fn{n}"><a class="footnote-backref" href="#fnref{n}">{n}.</a>"##
            )))
        }
        Event::End(TagEnd::FootnoteDefinition) => Event::Html(CowStr::from("</div>\n")),
        other => other,
    });

    let mut html_content = String::new();
    html::push_html(&mut html_content, event_iterator);
    html_content
}

/// Suffixes every footnote anchor and id in `html` with `index`, so several
/// days' bodies can share one page without `fn1` colliding with `fn1`.
pub fn offset_footnotes(html: &str, index: usize) -> String {
    let anchored = FOOTNOTE_ANCHOR.replace_all(html, |caps: &Captures| {
        format!("{}{}", &caps[0], index)
    });
    FOOTNOTE_ID
        .replace_all(&anchored, |caps: &Captures| format!("{}{}", &caps[0], index))
        .into_owned()
}
