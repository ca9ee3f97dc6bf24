//! Search-term highlighting for result snippets.
//!
//! Terms only match whole words. A word ends at whitespace, at either end of
//! the text, or at one of [`LIMITERS`], so `ley` matches in `ley,` and `(ley)`
//! but not in `leyes`. Output is HTML: the text is escaped and every match is
//! wrapped in the configured tag.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Punctuation treated as a word boundary rather than part of a term.
pub const LIMITERS: &[char] = &[
    '¡', '!', '@', '#', '&', '*', '(', ')', '-', '–', '—', '+', '=', '[', ']', '{', '}', '|',
    ':', ';', '\'', '"', '‘', '’', '“', '”', ',', '.', '<', '>', '/', '¿', '?',
];

/// Configuration for highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// HTML tag wrapping each match.
    pub tag: String,
    /// CSS class added to the tag.
    pub css_class: Option<String>,
    pub case_sensitive: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            tag: "mark".to_string(),
            css_class: None,
            case_sensitive: false,
        }
    }
}

impl HighlightConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = Some(css_class.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn opening_tag(&self) -> String {
        match self.css_class {
            Some(ref class) => format!("<{} class=\"{}\">", self.tag, html_escape(class)),
            None => format!("<{}>", self.tag),
        }
    }

    pub fn closing_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}

/// Text regions of a rendered result that get highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Body,
    Context,
    Answer,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Body, Region::Context, Region::Answer];

    /// CSS class of the paragraph holding this region.
    pub fn css_class(self) -> &'static str {
        match self {
            Region::Body => "question-body",
            Region::Context => "question-context",
            Region::Answer => "question-answer",
        }
    }
}

/// A result as rendered on the page: an id plus three plain-text regions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBlock {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub answer: String,
}

impl ResultBlock {
    pub fn region(&self, region: Region) -> &str {
        match region {
            Region::Body => &self.body,
            Region::Context => &self.context,
            Region::Answer => &self.answer,
        }
    }
}

/// Highlighted HTML for each region of one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightedResult {
    pub id: String,
    pub body: String,
    pub context: String,
    pub answer: String,
}

impl HighlightedResult {
    pub fn region(&self, region: Region) -> &str {
        match region {
            Region::Body => &self.body,
            Region::Context => &self.context,
            Region::Answer => &self.answer,
        }
    }
}

/// Whole-word highlighter.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    config: HighlightConfig,
}

impl Highlighter {
    pub fn new(config: HighlightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Highlight the three regions of the result with id `result_id`.
    ///
    /// Returns `None` when no result carries that id.
    pub fn highlight_result<S: AsRef<str>>(
        &self,
        results: &[ResultBlock],
        result_id: &str,
        terms: &[S],
    ) -> Option<HighlightedResult> {
        let Some(result) = results.iter().find(|r| r.id == result_id) else {
            debug!("No result with id {:?} to highlight", result_id);
            return None;
        };

        let words = prepare_terms(terms);
        let patterns = self.compile(&words);

        Some(HighlightedResult {
            id: result.id.clone(),
            body: self.render(&result.body, &patterns),
            context: self.render(&result.context, &patterns),
            answer: self.render(&result.answer, &patterns),
        })
    }

    /// Highlight `terms` in `text`, returning escaped HTML.
    pub fn highlight<S: AsRef<str>>(&self, text: &str, terms: &[S]) -> String {
        let words = prepare_terms(terms);
        let patterns = self.compile(&words);
        self.render(text, &patterns)
    }

    /// Byte ranges of the matches of `terms` in `text`, sorted and disjoint.
    pub fn find_spans<S: AsRef<str>>(&self, text: &str, terms: &[S]) -> Vec<Range<usize>> {
        let words = prepare_terms(terms);
        let patterns = self.compile(&words);
        find_highlight_spans(text, &patterns)
    }

    fn compile(&self, words: &[String]) -> Vec<Regex> {
        words
            .iter()
            .filter_map(|word| {
                match RegexBuilder::new(&regex::escape(word))
                    .case_insensitive(!self.config.case_sensitive)
                    .build()
                {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        warn!("Skipping highlight term {:?}: {}", word, e);
                        None
                    }
                }
            })
            .collect()
    }

    fn render(&self, text: &str, patterns: &[Regex]) -> String {
        let spans = find_highlight_spans(text, patterns);
        if spans.is_empty() {
            return html_escape(text);
        }

        let opening = self.config.opening_tag();
        let closing = self.config.closing_tag();
        let mut out =
            String::with_capacity(text.len() + spans.len() * (opening.len() + closing.len()));
        let mut last = 0;
        for span in spans {
            out.push_str(&html_escape(&text[last..span.start]));
            out.push_str(&opening);
            out.push_str(&html_escape(&text[span.clone()]));
            out.push_str(&closing);
            last = span.end;
        }
        out.push_str(&html_escape(&text[last..]));
        out
    }
}

/// Split terms into words, strip boundary punctuation and order longest first
/// so longer words win over their prefixes.
fn prepare_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    let mut words: Vec<String> = terms
        .iter()
        .flat_map(|term| term.as_ref().split_whitespace())
        .map(|word| word.trim_matches(is_limiter).to_string())
        .filter(|word| !word.is_empty())
        .collect();
    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
    words.dedup();
    words
}

fn is_limiter(c: char) -> bool {
    LIMITERS.contains(&c)
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || is_limiter(c)
}

fn find_highlight_spans(text: &str, patterns: &[Regex]) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();

    for pattern in patterns {
        let mut pos = 0;
        while pos <= text.len() {
            let Some(m) = pattern.find_at(text, pos) else {
                break;
            };
            let range = m.range();
            if range.is_empty() {
                break;
            }

            let starts_word = text[..range.start]
                .chars()
                .next_back()
                .map_or(true, is_boundary);
            let ends_word = text[range.end..].chars().next().map_or(true, is_boundary);
            let overlaps = spans
                .iter()
                .any(|s| s.start < range.end && range.start < s.end);

            if starts_word && ends_word && !overlaps {
                pos = range.end;
                spans.push(range);
            } else {
                // Retry one character further; a rejected match may hide a
                // valid one that starts inside it.
                pos = range.start
                    + text[range.start..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
            }
        }
    }

    spans.sort_by_key(|s| s.start);
    spans
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
