//! Download remote artifacts (container images, weights archives)

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid download url {url}: {source}")]
    InvalidUrl { url: String, source: url::ParseError },
    #[error("download url {0} has no file name")]
    MissingFileName(String),
    #[error("request for {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },
    #[error("can't write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Fetch a remote file into a local directory.
///
/// The local file is named after the last segment of the url path; the
/// returned path points at the written file.
pub trait Downloader {
    fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, DownloadError>;
}

/// Plain blocking HTTP download
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Downloader for HttpDownloader {
    fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, DownloadError> {
        let parsed = Url::parse(url).map_err(|source| DownloadError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let file_name =
            file_name(&parsed).ok_or_else(|| DownloadError::MissingFileName(url.to_string()))?;
        let out_path = dest_dir.join(file_name);

        info!("Downloading {} to {}", url, out_path.display());
        let mut response = self
            .client
            .get(parsed)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;

        let mut file = File::create(&out_path).map_err(|source| DownloadError::Write {
            path: out_path.clone(),
            source,
        })?;
        response
            .copy_to(&mut file)
            .map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;

        Ok(out_path)
    }
}

/// Last non-empty segment of the url path
fn file_name(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}
