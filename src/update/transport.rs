//! Update transport
//!
//! Two fetches: the latest version token and the binary for a version.
//! Binaries live at `<base_url>/<prefix>-v<version>.<ext>`.

use std::io::{Read, Write};
use std::time::Duration;

use reqwest::blocking::{Client, Response};

use super::naming::BinaryNaming;
use crate::config::UpdateConfig;
use crate::error::{Result, update};
use crate::ui::DownloadProgress;
use crate::version::Version;

/// Upper bound on the version token read from the server
const VERSION_TAG_LIMIT: u64 = 64;

pub trait UpdateTransport {
    /// Fetch the raw latest version token, trimmed of whitespace
    fn fetch_latest_version_tag(&self) -> Result<String>;

    /// Stream the binary for `version` into `sink`, returning bytes written
    fn fetch_binary(&self, version: &Version, sink: &mut dyn Write) -> Result<u64>;
}

/// Address of the binary for `version` under `base_url`
pub fn binary_url(base_url: &str, naming: &BinaryNaming, version: &Version) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        naming.file_name(version)
    )
}

pub struct HttpTransport {
    client: Client,
    version_url: String,
    base_url: String,
    naming: BinaryNaming,
    show_progress: bool,
}

impl HttpTransport {
    pub fn new(config: &UpdateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("usb-nas-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            version_url: config.version_url.clone(),
            base_url: config.base_url.clone(),
            naming: BinaryNaming::from_config(config),
            show_progress: false,
        })
    }

    /// Draw a progress bar while downloading binaries
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn get(&self, url: &str) -> Result<Response> {
        log::debug!("[Update] GET {url}");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(update::network(format!("{url} returned HTTP {status}")));
        }
        Ok(response)
    }
}

impl UpdateTransport for HttpTransport {
    fn fetch_latest_version_tag(&self) -> Result<String> {
        let response = self.get(&self.version_url)?;
        let mut tag = String::new();
        response
            .take(VERSION_TAG_LIMIT)
            .read_to_string(&mut tag)
            .map_err(|e| update::network(format!("reading version: {e}")))?;
        Ok(tag.trim().to_string())
    }

    fn fetch_binary(&self, version: &Version, sink: &mut dyn Write) -> Result<u64> {
        let url = binary_url(&self.base_url, &self.naming, version);
        let response = self.get(&url)?;
        let total = response.content_length();

        let copied = if self.show_progress {
            let progress = DownloadProgress::new(total);
            let result = std::io::copy(&mut progress.wrap(response), sink);
            if result.is_ok() {
                progress.finish();
            } else {
                progress.abandon();
            }
            result
        } else {
            let mut response = response;
            std::io::copy(&mut response, sink)
        };
        let written =
            copied.map_err(|e| update::network(format!("downloading {url}: {e}")))?;

        if let Some(expected) = total {
            if written != expected {
                return Err(update::network(format!(
                    "downloaded {written} of {expected} bytes from {url}"
                )));
            }
        }
        log::info!("[Update] Downloaded {written} bytes from {url}");
        Ok(written)
    }
}
