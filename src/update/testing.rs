//! In-memory update transport for tests

use std::cell::Cell;
use std::io::Write;

use super::transport::UpdateTransport;
use crate::error::{Result, update};
use crate::version::Version;

pub struct StaticTransport {
    tag: Option<String>,
    payload: Vec<u8>,
    fail_download: bool,
    downloads: Cell<usize>,
}

impl StaticTransport {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            payload: b"MZ new binary".to_vec(),
            fail_download: false,
            downloads: Cell::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            tag: None,
            ..Self::new("")
        }
    }

    pub fn with_payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    pub fn failing_download(mut self) -> Self {
        self.fail_download = true;
        self
    }

    pub fn downloads(&self) -> usize {
        self.downloads.get()
    }
}

impl UpdateTransport for StaticTransport {
    fn fetch_latest_version_tag(&self) -> Result<String> {
        self.tag
            .as_deref()
            .map(|t| t.trim().to_string())
            .ok_or_else(|| update::network("connection refused"))
    }

    fn fetch_binary(&self, _version: &Version, sink: &mut dyn Write) -> Result<u64> {
        self.downloads.set(self.downloads.get() + 1);
        // Partial write before failing, like a dropped connection
        sink.write_all(&self.payload[..self.payload.len() / 2])?;
        if self.fail_download {
            return Err(update::network("connection reset"));
        }
        sink.write_all(&self.payload[self.payload.len() / 2..])?;
        Ok(self.payload.len() as u64)
    }
}
