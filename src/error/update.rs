//! Version check, download and replace errors

use super::NasError;

pub fn unparseable(input: impl Into<String>) -> NasError {
    NasError::UnparseableVersion {
        input: input.into(),
    }
}

pub fn network(message: impl Into<String>) -> NasError {
    NasError::Network {
        message: message.into(),
    }
}

/// Creates an error for a failed download or swap
pub fn failed(message: impl Into<String>) -> NasError {
    NasError::Update {
        message: message.into(),
    }
}
