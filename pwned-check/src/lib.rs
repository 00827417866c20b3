//! Breached password checker using the Pwned Passwords k-anonymity range API.
//!
//! The password is hashed locally with SHA1. Only the first five characters of
//! the uppercase hex digest are sent to the service, which answers with every
//! known suffix sharing that prefix and how often each was seen. The full digest
//! is then matched locally, so neither the password nor its digest ever leaves
//! the process.
//!
//! ```no_run
//! use pwned_check::{BreachChecker, ClientConfig};
//!
//! # async fn run() -> pwned_check::Result<()> {
//! let checker = BreachChecker::new(ClientConfig::default())?;
//! let result = checker.is_breached("password").await?;
//! if result.breached {
//!     println!("seen {} times", result.frequency);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Partial responses
//!
//! A range response can fail after some records were already read, either at
//! the transport level or on a malformed line. [`BreachChecker::search_prefix`]
//! reports that as an error. [`BreachChecker::is_breached`] first looks for a
//! match among the records that did arrive: a match proves the breach, so it is
//! returned and the error is dropped. Only when nothing matched is the error
//! returned, since the status is then unknown.

pub mod checker;
pub mod config;
pub mod digest;
pub mod error;
pub mod range;
pub mod source;

pub use checker::{BreachChecker, LookupResult};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use digest::{
    DIGEST_HEX_LEN, MAX_PREFIX_LEN, PREFIX_LEN, PasswordDigest, PrefixKey, compute_digest,
};
pub use error::{Error, Result};
pub use range::{RangeParser, SuffixRecord, parse_range_body};
pub use source::{HttpRangeSource, RangeResponse, RangeSource};
