//! Short-lived account credentials

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random alphanumeric characters in a password
const PASSWORD_BODY_LEN: usize = 10;

/// Username and password of a temporary account
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Mints credentials from a process-local random source.
///
/// Names are not checked against existing accounts; a collision surfaces as
/// an account creation failure.
pub struct CredentialMinter {
    prefix: String,
    rng: StdRng,
}

impl CredentialMinter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic minter
    #[cfg(test)]
    pub fn seeded(prefix: impl Into<String>, seed: u64) -> Self {
        Self {
            prefix: prefix.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn mint(&mut self) -> Credential {
        let number: u32 = self.rng.gen_range(1000..10000);
        let body: String = (0..PASSWORD_BODY_LEN)
            .map(|_| char::from(self.rng.sample(Alphanumeric)))
            .collect();
        let digits: u32 = self.rng.gen_range(10..100);

        // Upper, lower, symbol and digit keep the default password policy happy
        Credential {
            username: format!("{}{number}", self.prefix),
            password: format!("Smb{body}!{digits}"),
        }
    }
}
