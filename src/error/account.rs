//! Temporary account errors

use super::NasError;

pub fn exists(name: impl Into<String>) -> NasError {
    NasError::AccountExists { name: name.into() }
}

pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> NasError {
    NasError::AccountFailed {
        name: name.into(),
        reason: reason.into(),
    }
}
