//! Share sessions
//!
//! A session pairs a temporary account with a network share. The two are
//! created and destroyed as a unit:
//!
//! ```text
//! Idle -> Provisioning -> Active -> TearingDown -> Closed
//!              |                                     ^
//!              +------------- (failure) -------------+
//! ```
//!
//! - account creation fails: straight to `Closed`, no share attempted
//! - share creation fails: the account is removed, then `Closed`
//! - teardown removes the share, then the account regardless of the share
//!   outcome
//!
//! Dropping a manager with an active session tears it down, like an
//! uncommitted transaction rolling back.

pub mod account;
pub mod credential;
pub mod share;

pub use account::{AccountProvisioner, NetUserAccounts};
pub use credential::{Credential, CredentialMinter};
pub use share::{ShareProvisioner, SmbShares};

use crate::config::ShareConfig;
use crate::error::{NasError, Result};
use crate::system::Volume;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Provisioning,
    Active,
    TearingDown,
    Closed,
}

impl SessionState {
    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::{Active, Closed, Idle, Provisioning, TearingDown};
        matches!(
            (self, next),
            (Idle | Closed, Provisioning)
                | (Provisioning, Active | Closed)
                | (Active, TearingDown)
                | (TearingDown, Closed)
        )
    }
}

/// One live share and the temporary account that guards it
#[derive(Debug, Clone)]
pub struct Session {
    /// Drive identifier, e.g. `E:`
    pub drive_letter: String,
    pub share_name: String,
    /// Shared filesystem root, e.g. `E:\`
    pub drive_path: String,
    pub credential: Credential,
    /// Address shown to the operator for remote access
    pub ip: String,
}

/// Outcome of a teardown; each half is attempted independently
#[derive(Debug)]
pub struct TeardownReport {
    pub share_name: String,
    pub username: String,
    pub share_error: Option<NasError>,
    pub account_error: Option<NasError>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.share_error.is_none() && self.account_error.is_none()
    }
}

/// Owns the single live session and drives its state machine
pub struct SessionManager<A: AccountProvisioner, S: ShareProvisioner> {
    accounts: A,
    shares: S,
    minter: CredentialMinter,
    access: ShareConfig,
    state: SessionState,
    session: Option<Session>,
}

impl<A: AccountProvisioner, S: ShareProvisioner> SessionManager<A, S> {
    pub fn new(accounts: A, shares: S, minter: CredentialMinter, access: ShareConfig) -> Self {
        Self {
            accounts,
            shares,
            minter,
            access,
            state: SessionState::Idle,
            session: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Provision an account and a share for `volume`.
    ///
    /// On error the manager is `Closed` and nothing it created is left on
    /// the host.
    pub fn provision(&mut self, volume: &Volume, ip: impl Into<String>) -> Result<&Session> {
        if matches!(
            self.state,
            SessionState::Active | SessionState::TearingDown | SessionState::Provisioning
        ) {
            return Err(NasError::SessionActive);
        }

        self.transition(SessionState::Provisioning);
        let session = Session {
            drive_letter: volume.identifier.to_uppercase(),
            share_name: volume.share_name(),
            drive_path: volume.root_path(),
            credential: self.minter.mint(),
            ip: ip.into(),
        };
        let username = session.credential.username.clone();
        log::info!(
            "[Session] Provisioning share {} for {} as {username}",
            session.share_name,
            session.drive_path
        );

        if let Err(e) = self
            .accounts
            .create(&username, &session.credential.password)
        {
            log::error!("[Session] Account creation failed, no share attempted: {e}");
            self.transition(SessionState::Closed);
            return Err(e);
        }

        let grantees = self.access.grantees(&username);
        if let Err(e) = self
            .shares
            .create(&session.share_name, &session.drive_path, &grantees)
        {
            log::error!("[Session] Share creation failed, removing {username}: {e}");
            if let Err(cleanup) = self.accounts.remove(&username) {
                log::error!("[Session] Compensating removal of {username} failed: {cleanup}");
            }
            self.transition(SessionState::Closed);
            return Err(e);
        }

        self.transition(SessionState::Active);
        Ok(self.session.insert(session))
    }

    /// Remove the share, then the account, and close the session.
    ///
    /// The account is removed even when share removal fails; failures are
    /// collected in the report rather than returned.
    pub fn teardown(&mut self) -> Result<TeardownReport> {
        if self.state != SessionState::Active {
            return Err(NasError::NoActiveSession);
        }
        let Some(session) = self.session.take() else {
            return Err(NasError::NoActiveSession);
        };

        self.transition(SessionState::TearingDown);
        let username = session.credential.username;

        let share_error = self.shares.remove(&session.share_name).err();
        if let Some(ref e) = share_error {
            log::error!("[Session] Error removing SMB share {}: {e}", session.share_name);
        }

        let account_error = self.accounts.remove(&username).err();
        if let Some(ref e) = account_error {
            log::error!("[Session] Error deleting temp user {username}: {e}");
        }

        self.transition(SessionState::Closed);
        Ok(TeardownReport {
            share_name: session.share_name,
            username,
            share_error,
            account_error,
        })
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid session transition {:?} -> {next:?}",
            self.state
        );
        log::info!("[Session] {:?} -> {next:?}", self.state);
        self.state = next;
    }
}

impl<A: AccountProvisioner, S: ShareProvisioner> Drop for SessionManager<A, S> {
    fn drop(&mut self) {
        if self.state == SessionState::Active {
            log::warn!("[Session] Manager dropped with an active share, tearing down");
            match self.teardown() {
                Ok(report) if !report.is_clean() => {
                    eprintln!("Warning: share cleanup was incomplete, see the log for details");
                }
                Ok(_) => {}
                Err(e) => log::error!("[Session] Teardown on drop failed: {e}"),
            }
        }
    }
}
