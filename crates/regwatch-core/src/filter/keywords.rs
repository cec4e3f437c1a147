use regex::{Regex, RegexBuilder};

use crate::feed::FeedRecord;
use crate::{Error, Result};

/// Case-insensitive whole-word / whole-phrase matcher over a keyword list
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Option<Regex>,
}

impl KeywordMatcher {
    /// Build a matcher. Blank keywords are ignored; an empty list matches nothing.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| keyword_pattern(k.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { regex: None });
        }

        let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Config(format!("Invalid keyword pattern: {}", e)))?;

        Ok(Self { regex: Some(regex) })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(text))
    }

    /// A record matches when its title or its description does
    pub fn matches_record(&self, record: &FeedRecord) -> bool {
        self.matches(&record.title) || self.matches(&record.description)
    }
}

/// Escape each word; any whitespace run may separate the words of a phrase
fn keyword_pattern(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}
