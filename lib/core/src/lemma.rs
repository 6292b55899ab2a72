//! Noun lemmatization.
//!
//! [`LemmaDictionary`] follows WordNet's `morphy` for nouns: irregular forms
//! come from an exception table, regular plurals are detached by suffix
//! rules. With a base-form list loaded, a rule result is only accepted when it
//! is a known lemma. Without one the rules apply directly, guarded against the
//! common false positives.

use crate::error::NormalizeError;
use crate::{Error, Result};
use ahash::{AHashMap, AHashSet};
use std::io::{BufRead, BufReader, Read};

/// Reduces a lowercase token to its dictionary base form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str) -> std::result::Result<String, NormalizeError>;

    /// Label identifying the dictionary contents.
    fn version(&self) -> &str;
}

/// Noun detachment rules, tried in order.
const NOUN_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("men", "man"),
    ("s", ""),
];

/// Rules that only fire when a base-form list can confirm the result.
const CONFIRMED_ONLY: &[&str] = &["zes", "men"];

/// Suffixes whose `e` belongs to the plural; never retried as a bare `s`.
const SIBILANT: &[&str] = &["sses", "ches", "shes", "xes"];

const MIN_STEM: usize = 3;

const BUILTIN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("dice", "die"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("shelves", "shelf"),
    ("halves", "half"),
    ("wolves", "wolf"),
    ("loaves", "loaf"),
    ("thieves", "thief"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("appendices", "appendix"),
    ("analyses", "analysis"),
    ("axes", "axis"),
    ("crises", "crisis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("data", "data"),
    ("media", "medium"),
    ("buses", "bus"),
    ("gases", "gas"),
    ("lenses", "lens"),
    ("goes", "go"),
    ("heroes", "hero"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("echoes", "echo"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("ties", "tie"),
    ("pies", "pie"),
    ("lies", "lie"),
    ("calories", "calorie"),
    ("smoothies", "smoothie"),
    ("selfies", "selfie"),
    ("hoodies", "hoodie"),
    ("zombies", "zombie"),
    ("headaches", "headache"),
    ("aches", "ache"),
    ("caches", "cache"),
    ("niches", "niche"),
    ("avalanches", "avalanche"),
    ("moustaches", "moustache"),
    ("quizzes", "quiz"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("lens", "lens"),
    ("yes", "yes"),
    ("gps", "gps"),
    ("ios", "ios"),
    ("os", "os"),
];

/// Exception table plus optional base-form list
#[derive(Debug, Clone)]
pub struct LemmaDictionary {
    exceptions: AHashMap<String, String>,
    base_forms: AHashSet<String>,
    version: String,
}

impl LemmaDictionary {
    pub fn new(
        exceptions: AHashMap<String, String>,
        base_forms: AHashSet<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            exceptions,
            base_forms,
            version: version.into(),
        }
    }

    /// Built-in English exceptions, heuristic rule mode.
    pub fn builtin() -> Self {
        let exceptions = BUILTIN_EXCEPTIONS
            .iter()
            .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
            .collect();
        Self::new(exceptions, AHashSet::new(), "builtin-1")
    }

    /// Parse a dictionary file.
    ///
    /// Each non-comment line is either `form lemma` (an exception) or a single
    /// word (a known base form). Fields may be separated by tabs or spaces.
    pub fn from_reader<R: Read>(reader: R, version: impl Into<String>) -> Result<Self> {
        let mut exceptions = AHashMap::new();
        let mut base_forms = AHashSet::new();

        for (lineno, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [base] => {
                    base_forms.insert(base.to_lowercase());
                }
                [form, lemma] => {
                    let lemma = lemma.to_lowercase();
                    base_forms.insert(lemma.clone());
                    exceptions.insert(form.to_lowercase(), lemma);
                }
                _ => {
                    return Err(Error::Resource(format!(
                        "lemma dictionary line {}: expected `form lemma` or `lemma`, got {:?}",
                        lineno + 1,
                        line
                    )))
                }
            }
        }

        Ok(Self::new(exceptions, base_forms, version))
    }

    /// Whether rule results are checked against a base-form list.
    #[inline]
    pub fn is_confirming(&self) -> bool {
        !self.base_forms.is_empty()
    }

    pub fn lookup(&self, word: &str) -> String {
        if let Some(lemma) = self.exceptions.get(word) {
            return lemma.clone();
        }
        if self.base_forms.contains(word) {
            return word.to_string();
        }

        for (suffix, replacement) in NOUN_RULES {
            let Some(stem) = word.strip_suffix(suffix) else {
                continue;
            };
            let candidate = format!("{}{}", stem, replacement);

            if self.is_confirming() {
                if self.base_forms.contains(&candidate) {
                    return candidate;
                }
                continue;
            }

            if CONFIRMED_ONLY.contains(suffix) {
                continue;
            }
            if candidate.len() < MIN_STEM {
                if SIBILANT.contains(suffix) {
                    return word.to_string();
                }
                continue;
            }
            // "glass", "bus", "analysis" are not plurals
            if *suffix == "s" && stem.ends_with(['s', 'u', 'i']) {
                continue;
            }
            return candidate;
        }

        word.to_string()
    }
}

impl Default for LemmaDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lemmatizer for LemmaDictionary {
    fn lemmatize(&self, word: &str) -> std::result::Result<String, NormalizeError> {
        Ok(self.lookup(word))
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        let dict = LemmaDictionary::builtin();
        assert_eq!(dict.lookup("cables"), "cable");
        assert_eq!(dict.lookup("batteries"), "battery");
        assert_eq!(dict.lookup("watches"), "watch");
        assert_eq!(dict.lookup("brushes"), "brush");
        assert_eq!(dict.lookup("boxes"), "box");
        assert_eq!(dict.lookup("glasses"), "glass");
        assert_eq!(dict.lookup("sizes"), "size");
        assert_eq!(dict.lookup("inches"), "inch");
        assert_eq!(dict.lookup("dishes"), "dish");
        assert_eq!(dict.lookup("taxes"), "tax");
        assert_eq!(dict.lookup("fixes"), "fix");
    }

    #[test]
    fn test_guards_and_exceptions() {
        let dict = LemmaDictionary::builtin();
        assert_eq!(dict.lookup("glass"), "glass");
        assert_eq!(dict.lookup("bonus"), "bonus");
        assert_eq!(dict.lookup("analysis"), "analysis");
        assert_eq!(dict.lookup("pcs"), "pcs");
        assert_eq!(dict.lookup("children"), "child");
        assert_eq!(dict.lookup("movies"), "movie");
        assert_eq!(dict.lookup("series"), "series");
        assert_eq!(dict.lookup("running"), "running");
    }

    #[test]
    fn test_idempotent() {
        let dict = LemmaDictionary::builtin();
        for word in [
            "cables", "batteries", "glasses", "women", "headphones", "chargers", "mice", "inches",
            "boxes",
        ] {
            let once = dict.lookup(word);
            assert_eq!(dict.lookup(&once), once, "{word}");
        }
    }

    #[test]
    fn test_confirming_dictionary() {
        let source = "# wordnet subset\ncable\nsize\nwoman\nmice mouse\n";
        let dict = LemmaDictionary::from_reader(source.as_bytes(), "test-1").unwrap();
        assert!(dict.is_confirming());
        assert_eq!(dict.version(), "test-1");
        assert_eq!(dict.lookup("cables"), "cable");
        assert_eq!(dict.lookup("sizes"), "size");
        assert_eq!(dict.lookup("women"), "woman");
        assert_eq!(dict.lookup("mice"), "mouse");
        // unknown stems are left alone
        assert_eq!(dict.lookup("widgets"), "widgets");
    }

    #[test]
    fn test_malformed_dictionary() {
        let result = LemmaDictionary::from_reader("a b c\n".as_bytes(), "bad");
        assert!(matches!(result, Err(Error::Resource(_))));
    }
}
