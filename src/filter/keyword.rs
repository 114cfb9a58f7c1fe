//! Keyword matching against job descriptions
//!
//! A [`KeywordSet`] is an ordered list of case-insensitive terms. The only
//! question it answers is whether a text contains any of them; how the
//! terms are combined into a matcher stays private to this module.

use arrow::array::{BooleanArray, StringArray};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::core::BatchFilter;
use crate::utils::arrow::{downcast_array, get_column};

/// How keyword terms are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Terms are regular-expression fragments
    #[default]
    Pattern,
    /// Terms are plain text
    Literal,
}

/// What an empty keyword set selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyKeywordPolicy {
    /// No row matches
    #[default]
    MatchNone,
    /// Every row matches
    MatchAll,
}

/// Ordered set of case-insensitive match terms
#[derive(Debug, Clone)]
pub struct KeywordSet {
    terms: Vec<String>,
    mode: MatchMode,
    matcher: Option<Regex>,
}

impl KeywordSet {
    /// Parse a comma-separated keyword list
    ///
    /// Terms are trimmed and blank terms are dropped. A term repeated
    /// byte for byte is kept once, at its first position; terms differing
    /// only in case are distinct (`\s` and `\S` are different patterns).
    ///
    /// # Errors
    /// Returns [`Error::InvalidKeyword`] if a term is not a valid pattern.
    pub fn parse(raw: &str, mode: MatchMode) -> Result<Self> {
        Self::from_terms(raw.split(','), mode)
    }

    /// Build a keyword set from individual terms
    ///
    /// # Errors
    /// Returns [`Error::InvalidKeyword`] if a term is not a valid pattern.
    pub fn from_terms<I, S>(terms: I, mode: MatchMode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = FxHashSet::default();
        let terms: Vec<String> = terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_string())
            .filter(|term| !term.is_empty())
            .filter(|term| seen.insert(term.clone()))
            .collect();

        let fragments = terms
            .iter()
            .map(|term| match mode {
                MatchMode::Literal => Ok(regex::escape(term)),
                MatchMode::Pattern => {
                    Regex::new(term).map_err(|e| Error::InvalidKeyword {
                        keyword: term.clone(),
                        reason: e.to_string(),
                    })?;
                    Ok(term.clone())
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let matcher = if fragments.is_empty() {
            None
        } else {
            let pattern = fragments.iter().map(|f| format!("(?:{f})")).join("|");
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::InvalidKeyword {
                    keyword: terms.join(", "),
                    reason: e.to_string(),
                })?;
            Some(regex)
        };

        Ok(Self {
            terms,
            mode,
            matcher,
        })
    }

    /// Does the text contain any term of this set?
    ///
    /// Always `false` for an empty set.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|matcher| matcher.is_match(text))
    }

    /// The terms, in first-seen order
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// How the terms are interpreted
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The terms joined with `", "`, as used for row tagging
    #[must_use]
    pub fn label(&self) -> String {
        self.terms.join(", ")
    }
}

impl PartialEq for KeywordSet {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms && self.mode == other.mode
    }
}

/// A filter keeping rows whose text column contains any keyword
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    column: String,
    keywords: KeywordSet,
    empty_policy: EmptyKeywordPolicy,
}

impl KeywordFilter {
    /// Create a new keyword filter over `column`
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        keywords: KeywordSet,
        empty_policy: EmptyKeywordPolicy,
    ) -> Self {
        Self {
            column: column.into(),
            keywords,
            empty_policy,
        }
    }
}

impl BatchFilter for KeywordFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let column = get_column(batch, &self.column)?;
        let text = downcast_array::<StringArray>(&column, &self.column, "String")?;

        if self.keywords.is_empty() {
            let keep = self.empty_policy == EmptyKeywordPolicy::MatchAll;
            return Ok(BooleanArray::from(vec![keep; batch.num_rows()]));
        }

        Ok(text
            .iter()
            .map(|value| Some(value.is_some_and(|v| self.keywords.matches(v))))
            .collect())
    }

    fn required_columns(&self) -> FxHashSet<String> {
        FxHashSet::from_iter([self.column.clone()])
    }
}
