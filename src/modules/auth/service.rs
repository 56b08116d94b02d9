use super::password::validate_password;
use super::store::{StoreError, UserStore};
use super::username::validate_username;

/// Result of a registration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Success,
    InvalidUsername,
    InvalidPassword,
    DuplicateUsername,
}

/// Result of a login attempt. Unknown users and wrong passwords both map to
/// `Denied` so callers cannot tell which factor failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Granted,
    Denied,
}

/// Result of the view-password recovery flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverOutcome {
    NotFound,
    Found(String),
}

/// Result of a password reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    NotFound,
    InvalidPassword,
    Success,
}

/// Whether a username can be registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameStatus {
    Available,
    Invalid,
    Taken,
}

/// Registration, login and password recovery on top of a `UserStore`.
///
/// Each call reloads the store, so the service holds no cached state and
/// always sees what is on disk.
#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    store: &'a UserStore,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a UserStore) -> Self {
        Self { store }
    }

    /// True when a record exists for exactly this username
    pub fn is_registered(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.store.load()?.contains_key(username))
    }

    /// Function to check whether a username is well-formed and still free
    pub fn check_username(&self, username: &str) -> Result<UsernameStatus, StoreError> {
        if !validate_username(username) {
            return Ok(UsernameStatus::Invalid);
        }
        if self.is_registered(username)? {
            return Ok(UsernameStatus::Taken);
        }
        Ok(UsernameStatus::Available)
    }

    /// Function to register a new user.
    ///
    /// Checks run in order: username format, username collision, password
    /// format. The record is appended only when all of them pass.
    pub fn register(&self, username: &str, password: &str) -> Result<RegisterOutcome, StoreError> {
        match self.check_username(username)? {
            UsernameStatus::Invalid => return Ok(RegisterOutcome::InvalidUsername),
            UsernameStatus::Taken => return Ok(RegisterOutcome::DuplicateUsername),
            UsernameStatus::Available => {}
        }
        if !validate_password(password) {
            return Ok(RegisterOutcome::InvalidPassword);
        }

        self.store.append(username, password)?;
        Ok(RegisterOutcome::Success)
    }

    /// Function to verify a username/password pair (exact, case-sensitive match)
    pub fn authenticate(&self, username: &str, password: &str) -> Result<LoginOutcome, StoreError> {
        let users = self.store.load()?;
        match users.get(username) {
            Some(stored) if stored == password => Ok(LoginOutcome::Granted),
            _ => Ok(LoginOutcome::Denied),
        }
    }

    /// Function to look up a user's stored password in cleartext
    pub fn recover(&self, username: &str) -> Result<RecoverOutcome, StoreError> {
        let mut users = self.store.load()?;
        match users.remove(username) {
            Some(password) => Ok(RecoverOutcome::Found(password)),
            None => Ok(RecoverOutcome::NotFound),
        }
    }

    /// Function to replace a user's password, rewriting the whole store
    pub fn reset_password(
        &self,
        username: &str,
        new_password: &str,
    ) -> Result<ResetOutcome, StoreError> {
        let mut users = self.store.load()?;
        let Some(password) = users.get_mut(username) else {
            return Ok(ResetOutcome::NotFound);
        };
        if !validate_password(new_password) {
            return Ok(ResetOutcome::InvalidPassword);
        }

        *password = new_password.to_string();
        self.store.rewrite_all(&users)?;
        Ok(ResetOutcome::Success)
    }
}
