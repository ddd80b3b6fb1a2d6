//! The catalog: validated appends and cached reads over a [`Repository`].
//!
//! Callers go through [`Catalog`] rather than the repository directly. It
//! runs the schema upgrade before the first read, memoizes full loads, and
//! drops the memoized load after every successful append.
//!
//! `load` and `append` never fail outward: failures are logged and turned
//! into an empty result or `false`. The `try_*` and `submit` forms return the
//! error for callers that want to show it.

use crate::core::cache::{CacheStats, ReadCache};
use crate::core::config::CatalogConfig;
use crate::core::error::CatalogError;
use crate::core::migration::UpgradeOutcome;
use crate::core::record::{ToolDraft, ToolRecord};
use crate::core::repository::{CsvRepository, Repository};
use crate::core::schemas::Schema;
use crate::core::serial;
use crate::core::validate::{self, ValidationRules};
use std::sync::Arc;
use tracing::{error, warn};

pub struct Catalog<R: Repository = CsvRepository> {
    repo: R,
    cache: ReadCache<Vec<ToolRecord>>,
    rules: ValidationRules,
    init_outcome: Option<UpgradeOutcome>,
}

impl Catalog<CsvRepository> {
    pub fn from_config(config: &CatalogConfig) -> Self {
        let repo = CsvRepository::new(config.data_path(), config.schema());
        Self::open(repo, config.validation_rules())
    }
}

impl<R: Repository> Catalog<R> {
    /// Wrap `repo`, running its schema upgrade first. An upgrade failure is
    /// logged; later loads retry the in-memory upgrade.
    pub fn open(repo: R, rules: ValidationRules) -> Self {
        let init_outcome = match repo.initialize() {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "catalog initialization failed");
                None
            }
        };
        Self {
            repo,
            cache: ReadCache::new(),
            rules,
            init_outcome,
        }
    }

    /// Result of the upgrade pass run by [`Catalog::open`], `None` if it
    /// failed.
    pub fn init_outcome(&self) -> Option<&UpgradeOutcome> {
        self.init_outcome.as_ref()
    }

    pub fn schema(&self) -> &Schema {
        self.repo.schema()
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn try_load(&self) -> Result<Arc<Vec<ToolRecord>>, CatalogError> {
        self.cache.get_or_populate(|| self.repo.load())
    }

    /// All records, newest first. Empty when the store cannot be read.
    pub fn load(&self) -> Arc<Vec<ToolRecord>> {
        self.try_load().unwrap_or_else(|e| {
            error!(error = %e, "failed to load catalog");
            Arc::new(Vec::new())
        })
    }

    pub fn validate(&self, draft: &ToolDraft) -> Vec<String> {
        validate::validate(draft, &self.rules)
    }

    /// Serial the next append would receive, computed from the cached load.
    pub fn next_serial(&self) -> Result<u64, CatalogError> {
        serial::next_serial(&self.try_load()?)
    }

    pub fn try_append(&self, draft: &ToolDraft) -> Result<ToolRecord, CatalogError> {
        let stored = self.repo.append(draft)?;
        self.cache.invalidate();
        Ok(stored)
    }

    /// Append without validating. Returns `false` (and logs) on failure, in
    /// which case the file is unchanged.
    pub fn append(&self, draft: &ToolDraft) -> bool {
        match self.try_append(draft) {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "failed to append catalog record");
                false
            }
        }
    }

    /// Validate, then append. Validation failures leave the store untouched.
    pub fn submit(&self, draft: &ToolDraft) -> Result<ToolRecord, CatalogError> {
        let errors = self.validate(draft);
        if !errors.is_empty() {
            return Err(CatalogError::ValidationError(errors));
        }
        self.try_append(draft)
    }
}
