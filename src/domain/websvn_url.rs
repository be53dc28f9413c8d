use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

const WEBSVN_URL_FORMAT: &str = "http://server/optional-path/wsvn/repo-name";

/// Group 1 is everything up to and including `/wsvn`, group 2 the `/repo-name` segment.
static WEBSVN_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*/wsvn)(/[^/]*)?/?$").expect("WebSVN url pattern is valid"));

/// Why a candidate WebSVN url was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please set a WebSVN2 url in the form {WEBSVN_URL_FORMAT}")]
    Empty,
    #[error("The entered url is not accepted: {0}")]
    NotAccepted(String),
    #[error("Please set a WebSVN2 url containing SVN repository in the form {WEBSVN_URL_FORMAT}")]
    MissingRepository,
    #[error(
        "Please set a WebSVN2 url containing wsvn path as well as SVN repository in the form {WEBSVN_URL_FORMAT}"
    )]
    MissingWsvnPath,
    #[error("Form field `{0}` is missing")]
    MissingField(String),
}

/// Represents a WebSVN repository URL.
///
/// The url must follow the format `http://server/optional-path/wsvn/repo-name`.
/// It is split once into the base url (ending in `/wsvn/`) and the name of the
/// Subversion repository; both parts are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct WebSvnUrl {
    /// The url exactly as the operator entered it.
    url: String,
    base_url: Url,
    repname: String,
}

impl WebSvnUrl {
    /// Creates a new `WebSvnUrl` instance.
    ///
    /// # Arguments
    ///
    /// * `url` - The WebSVN url to validate and decompose.
    ///
    /// # Returns
    ///
    /// Returns `Ok(WebSvnUrl)` if the url is valid, or the reason it was rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use wsvn::domain::WebSvnUrl;
    ///
    /// let url = WebSvnUrl::new("http://example.org/svn/wsvn/myrepo").unwrap();
    /// assert_eq!(url.base_url().as_str(), "http://example.org/svn/wsvn/");
    /// assert_eq!(url.repname(), "myrepo");
    /// ```
    pub fn new(url: impl Into<String>) -> Result<Self, ValidationError> {
        let url = url.into();
        let (base_url, repname) = decompose(&url)?;
        debug!("Parsed WebSVN url {url} into base {base_url} and repository {repname}");
        Ok(Self {
            url,
            base_url,
            repname,
        })
    }

    /// Returns the url as it was entered.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the base url, always ending in `/wsvn/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the name of the Subversion repository.
    pub fn repname(&self) -> &str {
        &self.repname
    }
}

/// Checks a candidate WebSVN url the way a settings form would before accepting it.
///
/// Unlike [`WebSvnUrl::new`] this never builds anything; it only reports the
/// first rule the candidate breaks.
///
/// # Examples
///
/// ```
/// use wsvn::domain::{ValidationError, check_repos_url};
///
/// assert!(check_repos_url("http://example.org/wsvn/myrepo").is_ok());
/// assert_eq!(
///     check_repos_url("http://example.org/wsvn/"),
///     Err(ValidationError::MissingRepository)
/// );
/// ```
pub fn check_repos_url(candidate: &str) -> Result<(), ValidationError> {
    decompose(candidate).map(|_| ())
}

fn decompose(candidate: &str) -> Result<(Url, String), ValidationError> {
    if candidate.is_empty() {
        return Err(ValidationError::Empty);
    }
    let caps = WEBSVN_URL_PATTERN
        .captures(candidate)
        .ok_or(ValidationError::MissingWsvnPath)?;

    let base_url = Url::parse(&format!("{}/", &caps[1]))
        .map_err(|e| ValidationError::NotAccepted(e.to_string()))?;
    if base_url.cannot_be_a_base() {
        return Err(ValidationError::NotAccepted(format!(
            "{base_url} cannot hold repository paths"
        )));
    }

    let repname = caps
        .get(2)
        .map(|m| m.as_str().trim_start_matches('/'))
        .filter(|name| !name.is_empty() && !is_dot_segment(name))
        .ok_or(ValidationError::MissingRepository)?;

    Ok((base_url, repname.to_string()))
}

/// `.` and `..` (also percent-encoded) would resolve links outside the base url.
fn is_dot_segment(name: &str) -> bool {
    let name = name.to_ascii_lowercase().replace("%2e", ".");
    name == "." || name == ".."
}

impl From<WebSvnUrl> for String {
    fn from(url: WebSvnUrl) -> Self {
        url.url
    }
}

impl<'de> Deserialize<'de> for WebSvnUrl {
    /// Deserializes from a plain string, validating it on the way in.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let url = String::deserialize(deserializer)?;
        WebSvnUrl::new(url).map_err(serde::de::Error::custom)
    }
}
