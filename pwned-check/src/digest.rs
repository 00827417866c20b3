use std::fmt;
use std::io::Write;

use compact_str::CompactString;
use serde::{Serialize, Serializer};
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};

/// The length of a rendered SHA1 digest (160 bits as hex characters).
pub const DIGEST_HEX_LEN: usize = 40;

/// The default length of the prefix sent to the range service (5 hex characters).
pub const PREFIX_LEN: usize = 5;

/// Longest prefix that still keeps part of the digest local.
pub const MAX_PREFIX_LEN: usize = DIGEST_HEX_LEN - 1;

/// Hex lookup table for digest rendering.
pub const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Uppercase hex SHA1 digest of a password.
///
/// Stored inline as ASCII. The `Debug` output only shows the default prefix so a
/// stray `{:?}` cannot leak the full digest into logs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PasswordDigest([u8; DIGEST_HEX_LEN]);

/// Computes the uppercase hex SHA1 digest of `password`.
///
/// An empty password is rejected before any hashing takes place.
pub fn compute_digest(password: &str) -> Result<PasswordDigest> {
    if password.is_empty() {
        return Err(Error::InvalidInput("empty password"));
    }

    let mut hasher = Sha1::new();
    hasher.write_all(password.as_bytes()).map_err(Error::Hashing)?;
    let hash: [u8; 20] = hasher.finalize().into();

    Ok(PasswordDigest::from_bytes(&hash))
}

impl PasswordDigest {
    fn from_bytes(hash: &[u8; 20]) -> Self {
        let mut hex = [0u8; DIGEST_HEX_LEN];
        for (i, byte) in hash.iter().enumerate() {
            hex[i * 2] = HEX_CHARS[(byte >> 4) as usize];
            hex[i * 2 + 1] = HEX_CHARS[(byte & 0x0f) as usize];
        }
        Self(hex)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: every byte was taken from HEX_CHARS, which is ASCII.
        unsafe { std::str::from_utf8_unchecked(&self.0) }
    }

    /// Returns the first `len` characters as the public lookup key.
    ///
    /// The split must leave a non-empty suffix, otherwise the whole digest would
    /// be sent to the service.
    pub fn prefix(&self, len: usize) -> Result<PrefixKey> {
        if len == 0 {
            return Err(Error::InvalidInput("prefix length must be at least 1"));
        }
        if len > MAX_PREFIX_LEN {
            return Err(Error::InsufficientDigestLength { len: DIGEST_HEX_LEN, required: len + 1 });
        }
        Ok(PrefixKey(CompactString::from(&self.as_str()[..len])))
    }

    /// Returns true if `prefix ++ suffix` is this digest, ignoring ASCII case.
    ///
    /// Compares in place without building the candidate string.
    pub fn matches(&self, prefix: &PrefixKey, suffix: &str) -> bool {
        if prefix.len() + suffix.len() != DIGEST_HEX_LEN {
            return false;
        }

        self.0
            .iter()
            .zip(prefix.as_str().bytes().chain(suffix.bytes()))
            .all(|(ours, theirs)| ours.eq_ignore_ascii_case(&theirs))
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordDigest({}…)", &self.as_str()[..PREFIX_LEN])
    }
}

impl Serialize for PasswordDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The leading characters of a digest. This is the only password-derived value
/// that is ever sent to the range service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrefixKey(CompactString);

impl PrefixKey {
    /// Validates a caller-supplied prefix and normalizes it to uppercase.
    pub fn parse(prefix: &str) -> Result<Self> {
        if prefix.is_empty() || prefix.len() > MAX_PREFIX_LEN {
            return Err(Error::InvalidInput("prefix must be 1 to 39 hex characters"));
        }
        if !prefix.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidInput("prefix must be hexadecimal"));
        }
        Ok(Self(CompactString::from(prefix.to_ascii_uppercase())))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PrefixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // password -> SHA1: 5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8
    const PASSWORD_SHA1: &str = "5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8";

    #[test]
    fn test_known_digest() {
        let digest = compute_digest("password").unwrap();
        assert_eq!(digest.as_str(), PASSWORD_SHA1);

        // password123 -> SHA1: CBFDAC6008F9CAB4083784CBD1874F76618D2A97
        let digest = compute_digest("password123").unwrap();
        assert_eq!(digest.as_str(), "CBFDAC6008F9CAB4083784CBD1874F76618D2A97");
    }

    #[test]
    fn test_digest_is_deterministic_uppercase_hex() {
        for password in ["a", "password", "correct horse battery staple", "pässwörd"] {
            let first = compute_digest(password).unwrap();
            let second = compute_digest(password).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.as_str().len(), DIGEST_HEX_LEN);
            assert!(
                first.as_str().bytes().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
                "digest should be uppercase hex"
            );
        }
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(compute_digest(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_prefix_split() {
        let digest = compute_digest("password").unwrap();
        assert_eq!(digest.prefix(PREFIX_LEN).unwrap().as_str(), "5BAA6");
        assert_eq!(
            digest.prefix(MAX_PREFIX_LEN).unwrap().as_str(),
            &PASSWORD_SHA1[..MAX_PREFIX_LEN]
        );
    }

    #[test]
    fn test_prefix_never_covers_whole_digest() {
        let digest = compute_digest("password").unwrap();
        for len in [DIGEST_HEX_LEN, DIGEST_HEX_LEN + 1] {
            match digest.prefix(len) {
                Err(Error::InsufficientDigestLength { len: have, required }) => {
                    assert_eq!(have, 40);
                    assert_eq!(required, len + 1);
                }
                other => panic!("expected InsufficientDigestLength for {len}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let digest = compute_digest("password").unwrap();
        assert!(matches!(digest.prefix(0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_matches_ignores_case() {
        let digest = compute_digest("password").unwrap();
        let prefix = digest.prefix(PREFIX_LEN).unwrap();

        assert!(digest.matches(&prefix, "1E4C9B93F3F0682250B6CF8331B7EE68FD8"));
        assert!(digest.matches(&prefix, "1e4c9b93f3f0682250b6cf8331b7ee68fd8"));
        assert!(!digest.matches(&prefix, "1E4C9B93F3F0682250B6CF8331B7EE68FD9"));
        // Truncated and overlong suffixes never match.
        assert!(!digest.matches(&prefix, "1E4C9B93F3F0682250B6CF8331B7EE68FD"));
        assert!(!digest.matches(&prefix, "1E4C9B93F3F0682250B6CF8331B7EE68FD80"));
    }

    #[test]
    fn test_debug_redacts_digest() {
        let digest = compute_digest("password").unwrap();
        let rendered = format!("{digest:?}");
        assert_eq!(rendered, "PasswordDigest(5BAA6…)");
        assert!(!rendered.contains(PASSWORD_SHA1));
    }

    #[test]
    fn test_prefix_parse() {
        assert_eq!(PrefixKey::parse("5baa6").unwrap().as_str(), "5BAA6");
        assert_eq!(PrefixKey::parse("CBFDA").unwrap().to_string(), "CBFDA");
        assert!(matches!(PrefixKey::parse(""), Err(Error::InvalidInput(_))));
        assert!(matches!(PrefixKey::parse("5BAG6"), Err(Error::InvalidInput(_))));
        assert!(matches!(
            PrefixKey::parse(&"A".repeat(DIGEST_HEX_LEN)),
            Err(Error::InvalidInput(_))
        ));
        assert!(PrefixKey::parse(&"A".repeat(MAX_PREFIX_LEN)).is_ok());
    }
}
