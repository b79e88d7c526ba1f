use chrono::NaiveDateTime;
use derive_more::derive::Display;
use serde::Serialize;
use std::collections::BTreeMap;

/// String-keyed metadata pulled from `@@Key=Value` lines, merged over site defaults.
pub type Metadata = BTreeMap<String, String>;

/// A rendered post or static page. Built once per cache lifetime and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[display("{}", file)]
pub struct Article {
    /// Normalized cache key, e.g. `./posts/2014/3/17/birthday`.
    pub file: String,
    pub metadata: Metadata,
    /// Publish timestamp from the `Date` metadata; orders articles within a day.
    pub date: Option<NaiveDateTime>,
    pub rendered_header: String,
    pub rendered_post_header: String,
    pub rendered_body: String,
    pub rendered_footer_fragment: String,
}

impl Article {
    pub fn relative_link(&self) -> Option<&str> {
        self.metadata.get("relativeLink").map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("Title").map(String::as_str)
    }

    // the full standalone page for this article
    pub fn html(&self, site_footer: &str) -> String {
        let mut html = String::with_capacity(
            self.rendered_header.len()
                + self.rendered_post_header.len()
                + self.rendered_body.len()
                + site_footer.len(),
        );
        html.push_str(&self.rendered_header);
        html.push_str(&self.rendered_post_header);
        html.push_str(&self.rendered_body);
        html.push_str(site_footer);
        html
    }
}
