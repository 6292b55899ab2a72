//! TF-IDF vocabulary and weighting.
//!
//! The analyzer lowercases, extracts tokens of two or more word characters,
//! drops the model's stop words and emits n-grams over what remains. `fit`
//! keeps the `max_features` most frequent terms across the corpus and
//! computes smoothed IDF: `ln((1 + N) / (1 + df)) + 1`. Document vectors are
//! raw term counts times IDF, L2-normalized.

use crate::stopwords::StopWords;
use crate::vector::SparseVector;
use crate::{Error, Result};
use ahash::AHashMap;
use rayon::prelude::*;
use regex::Regex;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TfidfConfig {
    pub max_features: usize,
    /// Inclusive `(min_n, max_n)`
    pub ngram_range: (usize, usize),
    pub stop_words: Arc<StopWords>,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_range: (1, 2),
            stop_words: Arc::new(StopWords::sklearn_english()),
        }
    }
}

impl TfidfConfig {
    fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if self.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be positive".to_string()));
        }
        if min_n == 0 || min_n > max_n {
            return Err(Error::InvalidConfig(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }
        Ok(())
    }
}

/// Splits text into the n-gram terms used as vocabulary entries.
#[derive(Debug, Clone)]
struct Analyzer {
    token_pattern: Regex,
    stop_words: Arc<StopWords>,
    ngram_range: (usize, usize),
}

impl Analyzer {
    fn new(config: &TfidfConfig) -> Self {
        Self {
            token_pattern: Regex::new(r"\b\w\w+\b").expect("static token pattern"),
            stop_words: config.stop_words.clone(),
            ngram_range: config.ngram_range,
        }
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    fn counts(&self, text: &str) -> AHashMap<String, u32> {
        let mut counts = AHashMap::new();
        for term in self.terms(text) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }
}

/// A fitted vocabulary with its IDF table
#[derive(Debug, Clone)]
pub struct TfidfModel {
    analyzer: Analyzer,
    vocabulary: AHashMap<String, u32>,
    terms: Vec<String>,
    idf: Vec<f32>,
    n_docs: usize,
}

impl TfidfModel {
    /// Learn vocabulary and IDF weights from the corpus.
    pub fn fit<S: AsRef<str> + Sync>(corpus: &[S], config: &TfidfConfig) -> Result<Self> {
        config.validate()?;
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let analyzer = Analyzer::new(config);
        let per_doc: Vec<AHashMap<String, u32>> = corpus
            .par_iter()
            .map(|doc| analyzer.counts(doc.as_ref()))
            .collect();

        // term -> (total occurrences, document frequency)
        let mut stats: AHashMap<String, (u64, u32)> = AHashMap::new();
        for counts in per_doc {
            for (term, count) in counts {
                let entry = stats.entry(term).or_insert((0, 0));
                entry.0 += u64::from(count);
                entry.1 += 1;
            }
        }
        if stats.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        let observed = stats.len();
        let mut ranked: Vec<(String, (u64, u32))> = stats.into_iter().collect();
        ranked.sort_unstable_by(|a, b| {
            Reverse(a.1 .0)
                .cmp(&Reverse(b.1 .0))
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(config.max_features);
        ranked.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let n = corpus.len() as f32;
        let mut vocabulary = AHashMap::with_capacity(ranked.len());
        let mut terms = Vec::with_capacity(ranked.len());
        let mut idf = Vec::with_capacity(ranked.len());
        for (column, (term, (_, df))) in ranked.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
            vocabulary.insert(term.clone(), column as u32);
            terms.push(term);
        }

        debug!(
            documents = corpus.len(),
            observed_terms = observed,
            vocabulary = terms.len(),
            "Fitted TF-IDF vocabulary"
        );

        Ok(Self {
            analyzer,
            vocabulary,
            terms,
            idf,
            n_docs: corpus.len(),
        })
    }

    /// Project text onto the fitted vocabulary. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let pairs: Vec<(u32, f32)> = self
            .analyzer
            .counts(text)
            .into_iter()
            .filter_map(|(term, count)| {
                let column = *self.vocabulary.get(&term)?;
                Some((column, count as f32 * self.idf[column as usize]))
            })
            .collect();

        let mut v = SparseVector::from_pairs(pairs);
        v.normalize();
        v
    }

    /// Transform every document, preserving input order.
    pub fn transform_batch<S: AsRef<str> + Sync>(&self, corpus: &[S]) -> Vec<SparseVector> {
        corpus
            .par_iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }

    pub fn column_of(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    pub fn term(&self, column: u32) -> Option<&str> {
        self.terms.get(column as usize).map(String::as_str)
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.column_of(term).map(|c| self.idf[c as usize])
    }

    /// Number of documents the model was fitted on
    #[inline]
    pub fn n_docs(&self) -> usize {
        self.n_docs
    }
}
