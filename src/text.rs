//! Publication titles from the pipeline sometimes carry their link inline
//! (`"Deep Sensing: https://arxiv.org/abs/1234"`). Split the two apart.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("static pattern"));

static TRAILING_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*$").expect("static pattern"));

/// A title with its embedded link pulled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleLink {
    /// First link found, if any.
    pub link: Option<String>,
    /// Title with every link removed and a dangling `:` trimmed.
    pub clean_title: String,
}

pub fn extract_link(title: &str) -> TitleLink {
    let link = URL_PATTERN.find(title).map(|m| m.as_str().to_owned());
    let without_links = URL_PATTERN.replace_all(title, "");
    let clean_title = TRAILING_COLON.replace(&without_links, "").trim().to_owned();
    TitleLink { link, clean_title }
}
