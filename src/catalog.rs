//! Role catalog: default keywords and descriptions per job role
//!
//! The catalog seeds a [`RoleQuery`](crate::models::RoleQuery); callers are
//! free to override the keywords it suggests.

use std::path::Path;

use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::{KeywordSet, MatchMode};
use crate::loader::load_table;
use crate::utils::arrow::{ArrowSchema, column_as_text, rows_to_batch};
use crate::utils::io::write_csv;

/// Catalog column holding the role name
pub const ROLE_COLUMN: &str = "Job Role";
/// Catalog column holding the comma-separated default keywords
pub const KEYWORDS_COLUMN: &str = "Relevant Keywords";
/// Catalog column holding the role description
pub const DESCRIPTION_COLUMN: &str = "Job Description";

/// One job role with its default filter seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    #[serde(rename = "Job Role")]
    pub role: String,
    #[serde(rename = "Relevant Keywords")]
    pub keywords: String,
    #[serde(rename = "Job Description")]
    pub description: String,
}

impl RoleProfile {
    /// The default keywords as a keyword set
    pub fn keyword_set(&self, mode: MatchMode) -> Result<KeywordSet> {
        KeywordSet::parse(&self.keywords, mode)
    }
}

impl ArrowSchema for RoleProfile {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new(ROLE_COLUMN, DataType::Utf8, false),
            Field::new(KEYWORDS_COLUMN, DataType::Utf8, false),
            Field::new(DESCRIPTION_COLUMN, DataType::Utf8, false),
        ])
    }
}

/// Lookup table of job roles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleCatalog {
    profiles: Vec<RoleProfile>,
}

impl RoleCatalog {
    /// Build a catalog from profiles, keeping the first profile per role name
    #[must_use]
    pub fn new(profiles: impl IntoIterator<Item = RoleProfile>) -> Self {
        let mut seen = FxHashSet::default();
        let profiles = profiles
            .into_iter()
            .filter(|profile| !profile.role.trim().is_empty())
            .filter(|profile| seen.insert(normalize_role(&profile.role)))
            .collect();
        Self { profiles }
    }

    /// Read a catalog from record batches with the three catalog columns
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let mut profiles = Vec::new();
        for batch in batches {
            let roles = column_as_text(batch, ROLE_COLUMN)?;
            let keywords = column_as_text(batch, KEYWORDS_COLUMN)?;
            let descriptions = column_as_text(batch, DESCRIPTION_COLUMN)?;

            profiles.extend(roles.into_iter().zip(keywords).zip(descriptions).map(
                |((role, keywords), description)| RoleProfile {
                    role: role.trim().to_string(),
                    keywords,
                    description,
                },
            ));
        }
        Ok(Self::new(profiles))
    }

    /// Load a catalog file (CSV or Parquet)
    pub fn load(path: &Path, batch_size: usize) -> Result<Self> {
        Self::from_batches(&load_table(path, batch_size)?)
    }

    #[must_use]
    pub fn profiles(&self) -> &[RoleProfile] {
        &self.profiles
    }

    /// Role names in catalog order
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|profile| profile.role.as_str())
    }

    /// Find a role, ignoring case and surrounding whitespace
    #[must_use]
    pub fn lookup(&self, role: &str) -> Option<&RoleProfile> {
        let wanted = normalize_role(role);
        self.profiles
            .iter()
            .find(|profile| normalize_role(&profile.role) == wanted)
    }

    /// Find a role or fail with [`Error::RoleNotFound`]
    pub fn require(&self, role: &str) -> Result<&RoleProfile> {
        self.lookup(role)
            .ok_or_else(|| Error::RoleNotFound(role.to_string()))
    }

    /// The catalog as a table, for export
    pub fn to_batch(&self) -> Result<RecordBatch> {
        rows_to_batch(&self.profiles)
    }

    /// Write the catalog as CSV with the catalog column headers
    ///
    /// The written file loads back through [`RoleCatalog::load`].
    pub fn export(&self, path: &Path) -> Result<()> {
        write_csv(path, &[self.to_batch()?])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase()
}
