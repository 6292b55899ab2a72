//! Deterministic text normalization.
//!
//! Pipeline, in order: lowercase, strip URLs, strip HTML-like tags, keep only
//! `a-z` and whitespace, tokenize, drop stop words, lemmatize, join with
//! single spaces. If tokenization or lemmatization fails the text as it stood
//! after the character filter is returned instead, and a warning is logged.

use crate::cache::{CacheStats, NormalizeCache};
use crate::error::NormalizeError;
use crate::lemma::{LemmaDictionary, Lemmatizer};
use crate::stopwords::StopWords;
use regex::Regex;
use std::sync::Arc;
use tracing::warn;

/// Longest token accepted by the tokenizer, in bytes.
pub const MAX_TOKEN_LEN: usize = 256;

const LOG_SNIPPET: usize = 80;

pub struct Normalizer {
    stop_words: Arc<StopWords>,
    lemmatizer: Arc<dyn Lemmatizer>,
    url_pattern: Regex,
    tag_pattern: Regex,
    cache: NormalizeCache,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("stop_words", &self.stop_words.len())
            .field("lemmatizer", &self.lemmatizer.version())
            .field("cache", &self.cache.stats())
            .finish()
    }
}

impl Normalizer {
    pub fn new(
        stop_words: Arc<StopWords>,
        lemmatizer: Arc<dyn Lemmatizer>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            stop_words,
            lemmatizer,
            url_pattern: Regex::new(r"(?:https?://|www\.)\S*").expect("static url pattern"),
            tag_pattern: Regex::new(r"<[^>]*>").expect("static tag pattern"),
            cache: NormalizeCache::new(cache_capacity),
        }
    }

    /// NLTK English stop words and the built-in lemma dictionary.
    pub fn with_defaults(cache_capacity: usize) -> Self {
        Self::new(
            Arc::new(StopWords::nltk_english()),
            Arc::new(LemmaDictionary::builtin()),
            cache_capacity,
        )
    }

    /// Normalize optional text; absent input yields an empty string.
    pub fn normalize(&self, text: Option<&str>) -> String {
        match text {
            Some(text) => self.normalize_str(text),
            None => String::new(),
        }
    }

    pub fn normalize_str(&self, text: &str) -> String {
        if let Some(hit) = self.cache.get(text) {
            return hit;
        }
        let normalized = self.run(text);
        self.cache.insert(text, &normalized);
        normalized
    }

    pub fn lemmatizer_version(&self) -> &str {
        self.lemmatizer.version()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn run(&self, text: &str) -> String {
        let filtered = self.clean(text);
        match self.tokens(&filtered) {
            Ok(tokens) => tokens.join(" "),
            Err(e) => {
                warn!(
                    error = %e,
                    text = %snippet(&filtered),
                    "Degraded normalization, keeping partially processed text"
                );
                filtered
            }
        }
    }

    /// Lowercase, strip URLs and tags, keep only `a-z` and whitespace.
    fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let without_urls = self.url_pattern.replace_all(&lowered, "");
        let without_tags = self.tag_pattern.replace_all(&without_urls, "");
        without_tags
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
            .collect()
    }

    fn tokens(&self, filtered: &str) -> Result<Vec<String>, NormalizeError> {
        let mut lemmas = Vec::new();
        for token in tokenize(filtered)? {
            if self.stop_words.contains(token) {
                continue;
            }
            let lemma = self.lemmatizer.lemmatize(token)?;
            // a lemma can itself be a stop word ("cans" -> "can")
            if self.stop_words.contains(&lemma) {
                continue;
            }
            lemmas.push(lemma);
        }
        Ok(lemmas)
    }
}

fn tokenize(text: &str) -> Result<Vec<&str>, NormalizeError> {
    text.split_whitespace()
        .map(|token| {
            if token.len() > MAX_TOKEN_LEN {
                Err(NormalizeError::Tokenize(format!(
                    "token of {} bytes exceeds the {} byte limit",
                    token.len(),
                    MAX_TOKEN_LEN
                )))
            } else {
                Ok(token)
            }
        })
        .collect()
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(LOG_SNIPPET) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
