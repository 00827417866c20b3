use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ClientConfig, validate_prefix_len};
use crate::digest::{PREFIX_LEN, PasswordDigest, PrefixKey, compute_digest};
use crate::error::{Error, Result};
use crate::range::SuffixRecord;
use crate::source::{HttpRangeSource, RangeSource};

/// Outcome of checking one password.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub breached: bool,
    /// Times the password was seen in breaches; 0 when not breached.
    pub frequency: u64,
    pub sha1_hash: PasswordDigest,
}

impl LookupResult {
    pub fn breached(sha1_hash: PasswordDigest, frequency: u64) -> Self {
        Self { breached: true, frequency, sha1_hash }
    }

    pub fn not_breached(sha1_hash: PasswordDigest) -> Self {
        Self { breached: false, frequency: 0, sha1_hash }
    }
}

/// Checks passwords against a breach corpus using k-anonymity range queries.
///
/// Only the first `prefix_len` characters of the SHA1 digest leave the process.
/// The checker holds no per-call state and can be shared between tasks.
#[derive(Clone, Debug)]
pub struct BreachChecker<S = HttpRangeSource> {
    source: S,
    prefix_len: usize,
}

impl BreachChecker<HttpRangeSource> {
    /// Creates a checker talking to the HTTP range API described by `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let prefix_len = config.prefix_len;
        let source = HttpRangeSource::new(config)?;
        Ok(Self { source, prefix_len })
    }
}

impl<S: RangeSource> BreachChecker<S> {
    /// Creates a checker over any range source, using the default prefix length.
    pub fn with_source(source: S) -> Self {
        Self { source, prefix_len: PREFIX_LEN }
    }

    /// Overrides the prefix length, applying the same bounds as
    /// [`ClientConfig::validate`].
    pub fn with_prefix_len(mut self, prefix_len: usize) -> Result<Self> {
        validate_prefix_len(prefix_len)?;
        self.prefix_len = prefix_len;
        Ok(self)
    }

    /// Returns every record the service holds for `prefix`, in received order.
    ///
    /// Fails as a whole on a transport error or on the first malformed line.
    pub async fn search_prefix(&self, prefix: &PrefixKey) -> Result<Vec<SuffixRecord>> {
        self.source.fetch_range(prefix).await.into_result()
    }

    /// Checks if the given password has been found in a data breach.
    ///
    /// A matching record is conclusive: it is returned even when the range fetch
    /// failed after delivering it. Without a match, a fetch error means breach
    /// status is unknown and the error is returned.
    pub async fn is_breached(&self, password: &str) -> Result<LookupResult> {
        if password.is_empty() {
            return Err(Error::InvalidInput("empty password"));
        }

        let digest = compute_digest(password)?;
        let prefix = digest.prefix(self.prefix_len)?;

        let response = self.source.fetch_range(&prefix).await;

        if let Some(record) =
            response.records.iter().find(|record| digest.matches(&prefix, &record.suffix))
        {
            if let Some(e) = &response.error {
                warn!(%prefix, error = %e, "match found before range stream failed");
            }
            return Ok(LookupResult::breached(digest, record.frequency));
        }

        if let Some(e) = response.error {
            return Err(e);
        }

        debug!(%prefix, candidates = response.records.len(), "no matching suffix");
        Ok(LookupResult::not_breached(digest))
    }
}
