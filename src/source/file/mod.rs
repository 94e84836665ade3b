//! `file` scheme: labeled documents on the local filesystem
//!
//! `file:///etc/app/config.yml` is an absolute path. `file://config.yml` is not
//! standard, but is accepted as a path relative to the working directory.

use crate::data::Data;
use crate::error::BoxError;
use crate::source::Source;
use std::fs;
use std::path::PathBuf;
use url::Url;

pub mod document;

pub use document::{Document, DocumentError, Format, DEFAULT_LABEL, INHERIT_KEY};

#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl FileSource {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse the document a `file` URL points to. `raw` is the URL
    /// as written, see [`path_from_url`].
    pub fn open(url: &Url, raw: &str) -> Result<Document, DocumentError> {
        let path = path_from_url(url, raw)?;
        tracing::debug!("Reading {}", path.display());

        let body = fs::read_to_string(&path)
            .map_err(|source| DocumentError::Io { path: path.clone(), source })?;
        Document::parse(&body, Format::from_path(&path))
    }
}

impl Source for FileSource {
    fn scheme(&self) -> &str {
        "file"
    }

    fn example_url(&self) -> &str {
        "file://config.yml"
    }

    fn load(&self, label: &str, url: &Url, raw: &str) -> Result<Data, BoxError> {
        let document = Self::open(url, raw)?;
        Ok(document.data_for(label)?)
    }
}

/// Map a `file` URL to a filesystem path.
///
/// Without a host the URL path is used as is. With a host, `host/path` is
/// resolved against the current working directory. The parsed URL has its
/// host lowercased, so the host is taken from `raw` when the two agree.
pub fn path_from_url(url: &Url, raw: &str) -> Result<PathBuf, DocumentError> {
    let host = url.host_str().unwrap_or("");
    if host.is_empty() {
        if url.path().is_empty() || url.path() == "/" {
            return Err(DocumentError::NoPath);
        }
        return url.to_file_path().map_err(|()| DocumentError::NoPath);
    }
    let host = raw_host(raw).filter(|written| written.eq_ignore_ascii_case(host)).unwrap_or(host);

    let mut relative = PathBuf::from(host);
    let rest = url.path().trim_start_matches('/');
    if !rest.is_empty() {
        relative.push(rest);
    }

    let cwd = std::env::current_dir()
        .map_err(|source| DocumentError::Io { path: relative.clone(), source })?;
    Ok(cwd.join(relative))
}

/// Authority of `raw` as written, between `://` and the path.
fn raw_host(raw: &str) -> Option<&str> {
    let (_, rest) = raw.split_once("://")?;
    let end = rest.find(|c: char| matches!(c, '/' | '?' | '#')).unwrap_or(rest.len());
    Some(&rest[..end])
}
