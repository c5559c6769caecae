//! Network share errors

use super::NasError;

pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> NasError {
    NasError::ShareFailed {
        name: name.into(),
        reason: reason.into(),
    }
}
