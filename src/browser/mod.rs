mod render;
mod websvn;

use crate::domain::{ChangePath, LogEntry, ValidationError};
use thiserror::Error;
use url::Url;

pub use render::{RenderedEntry, RenderedPath, render_change_log};
pub use websvn::{FORM_FIELD_PREFIX, WebSvnBrowser};

/// Represents errors that can occur while configuring a browser or building its links.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Invalid repository browser configuration: {0}")]
    InvalidConfiguration(#[from] ValidationError),
    #[error("Malformed repository browser link: {0}")]
    MalformedUrl(#[from] url::ParseError),
}

/// Produces links into a web-based repository viewer for the entries of a change log.
pub trait RepositoryBrowser {
    /// Link to the diff of `path` as changed in `entry`.
    fn diff_link(&self, path: &ChangePath, entry: &LogEntry) -> Result<Url, BrowserError>;

    /// Link to `path` as it was at the revision of `entry`.
    fn file_link(&self, path: &ChangePath, entry: &LogEntry) -> Result<Url, BrowserError>;

    /// Link to the whole change-set of `entry`.
    fn change_set_link(&self, entry: &LogEntry) -> Result<Url, BrowserError>;
}
