//! Version identifiers and their ordering
//!
//! A [`Version`] is a strict `major.minor.patch` triple. Anything else is
//! rejected with [`NasError::UnparseableVersion`] instead of being coerced,
//! so callers can skip values they cannot use.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{NasError, Result, update};

/// Version of the running binary
pub const CURRENT: &str = env!("CARGO_PKG_VERSION");

/// An ordered `(major, minor, patch)` triple
///
/// Field order matters: the derived `Ord` compares lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Version of the running binary
    pub fn current() -> Result<Self> {
        parse(CURRENT)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = NasError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parse a strict dotted numeric triple
pub fn parse(text: &str) -> Result<Version> {
    let mut parts = text.split('.');
    let (Some(major), Some(minor), Some(patch), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(update::unparseable(text));
    };

    Ok(Version::new(
        component(major, text)?,
        component(minor, text)?,
        component(patch, text)?,
    ))
}

// `u64::from_str` accepts a leading '+', so digits are checked first.
fn component(part: &str, whole: &str) -> Result<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(update::unparseable(whole));
    }
    part.parse().map_err(|_| update::unparseable(whole))
}

pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}

/// Whether `remote` is strictly newer than `local`
pub fn is_newer(remote: &Version, local: &Version) -> bool {
    compare(remote, local) == Ordering::Greater
}
