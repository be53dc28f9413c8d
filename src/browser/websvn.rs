use crate::browser::{BrowserError, RepositoryBrowser};
use crate::domain::{ChangePath, LogEntry, ValidationError, WebSvnUrl};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Prefix of the form fields a settings screen submits for this browser.
pub const FORM_FIELD_PREFIX: &str = "webSVN2.";

const DISPLAY_NAME: &str = "WebSVN2";

/// Everything but ASCII alphanumerics and `.-_*`, so `/` becomes `%2F` and space `%20`.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'*');

/// [`RepositoryBrowser`] that links into WebSVN 2.3.
///
/// Built once from a url of the form `http://server/optional-path/wsvn/repo-name`;
/// every link is the repository name plus a query resolved against the
/// `.../wsvn/` base url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebSvnBrowser {
    url: WebSvnUrl,
}

impl WebSvnBrowser {
    /// Creates a browser from the configured WebSVN url.
    ///
    /// # Examples
    ///
    /// ```
    /// use wsvn::WebSvnBrowser;
    ///
    /// let browser = WebSvnBrowser::new("http://example.org/wsvn/myrepo").unwrap();
    /// assert_eq!(
    ///     browser.change_set_link(42).unwrap().as_str(),
    ///     "http://example.org/wsvn/myrepo?op=revision&rev=42"
    /// );
    /// ```
    pub fn new(url: impl Into<String>) -> Result<Self, BrowserError> {
        Ok(Self::from(WebSvnUrl::new(url)?))
    }

    /// Rebuilds a browser from submitted form fields, reading `webSVN2.url`.
    pub fn from_form_data(form: &HashMap<String, String>) -> Result<Self, BrowserError> {
        let field = format!("{FORM_FIELD_PREFIX}url");
        let url = form
            .get(&field)
            .ok_or(ValidationError::MissingField(field))?;
        Self::new(url.as_str())
    }

    pub fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    /// Returns the url as it was configured.
    pub fn url(&self) -> &str {
        self.url.url()
    }

    pub fn base_url(&self) -> &Url {
        self.url.base_url()
    }

    /// Returns the name of the Subversion repository.
    pub fn repname(&self) -> &str {
        self.url.repname()
    }

    pub fn diff_link(&self, path: &str, revision: u64) -> Result<Url, BrowserError> {
        self.resolve(&format!(
            "{}/{}?op=diff&rev={revision}",
            self.repname(),
            encode_path(path)
        ))
    }

    // TODO: directories should link to the WebSVN listing view instead of a file view.
    pub fn file_link(&self, path: &str, revision: u64) -> Result<Url, BrowserError> {
        self.resolve(&format!(
            "{}/{}?rev={revision}",
            self.repname(),
            encode_path(path)
        ))
    }

    pub fn change_set_link(&self, revision: u64) -> Result<Url, BrowserError> {
        self.resolve(&format!("{}?op=revision&rev={revision}", self.repname()))
    }

    /// `relative` starts with the raw repository name, so it is anchored with `./`
    /// to keep a name like `my:repo` from being read as a scheme.
    fn resolve(&self, relative: &str) -> Result<Url, BrowserError> {
        let link = self.base_url().join(&format!("./{relative}"))?;
        debug!("Resolved {relative} against {} to {link}", self.base_url());
        Ok(link)
    }
}

impl From<WebSvnUrl> for WebSvnBrowser {
    fn from(url: WebSvnUrl) -> Self {
        Self { url }
    }
}

impl RepositoryBrowser for WebSvnBrowser {
    fn diff_link(&self, path: &ChangePath, entry: &LogEntry) -> Result<Url, BrowserError> {
        WebSvnBrowser::diff_link(self, path.value(), entry.revision())
    }

    fn file_link(&self, path: &ChangePath, entry: &LogEntry) -> Result<Url, BrowserError> {
        WebSvnBrowser::file_link(self, path.value(), entry.revision())
    }

    fn change_set_link(&self, entry: &LogEntry) -> Result<Url, BrowserError> {
        WebSvnBrowser::change_set_link(self, entry.revision())
    }
}

fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser() -> WebSvnBrowser {
        WebSvnBrowser::new("http://example.org/wsvn/myrepo").unwrap()
    }

    #[test]
    fn change_set_link() {
        assert_eq!(
            browser().change_set_link(42).unwrap().as_str(),
            "http://example.org/wsvn/myrepo?op=revision&rev=42"
        );
    }

    #[test]
    fn diff_link_encodes_path_separators() {
        assert_eq!(
            browser().diff_link("src/Main.java", 7).unwrap().as_str(),
            "http://example.org/wsvn/myrepo/src%2FMain.java?op=diff&rev=7"
        );
    }

    #[test]
    fn file_link() {
        assert_eq!(
            browser().file_link("README", 1).unwrap().as_str(),
            "http://example.org/wsvn/myrepo/README?rev=1"
        );
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("a b/c.txt"), "a%20b%2Fc.txt");
        assert_eq!(encode_path("my-file_v2.*"), "my-file_v2.*");
        assert_eq!(encode_path("/trunk/ä+&?#"), "%2Ftrunk%2F%C3%A4%2B%26%3F%23");
    }

    #[test]
    fn links_are_idempotent() {
        let browser = browser();
        assert_eq!(
            browser.file_link("a b/c.txt", 3).unwrap(),
            browser.file_link("a b/c.txt", 3).unwrap()
        );
        assert_eq!(
            browser.diff_link("a b/c.txt", 3).unwrap(),
            browser.diff_link("a b/c.txt", 3).unwrap()
        );
    }

    #[test]
    fn trailing_slash_in_configured_url_is_ignored() {
        let browser = WebSvnBrowser::new("http://example.org/svn/wsvn/myrepo/").unwrap();
        assert_eq!(browser.url(), "http://example.org/svn/wsvn/myrepo/");
        assert_eq!(
            browser.change_set_link(5).unwrap().as_str(),
            "http://example.org/svn/wsvn/myrepo?op=revision&rev=5"
        );
    }

    #[test]
    fn repository_name_with_colon_stays_under_base_url() {
        let browser = WebSvnBrowser::new("http://example.org/wsvn/my:repo").unwrap();

        assert_eq!(
            browser.change_set_link(42).unwrap().as_str(),
            "http://example.org/wsvn/my:repo?op=revision&rev=42"
        );
        assert_eq!(
            browser.diff_link("README", 1).unwrap().as_str(),
            "http://example.org/wsvn/my:repo/README?op=diff&rev=1"
        );
        assert_eq!(
            browser.file_link("README", 1).unwrap().as_str(),
            "http://example.org/wsvn/my:repo/README?rev=1"
        );
    }

    #[test]
    fn url_that_cannot_hold_links_is_rejected_up_front() {
        assert!(matches!(
            WebSvnBrowser::new("mailto:x/wsvn/repo"),
            Err(BrowserError::InvalidConfiguration(ValidationError::NotAccepted(_)))
        ));
    }

    #[test]
    fn invalid_url_is_an_invalid_configuration() {
        for url in ["", "http://example.org/myrepo", "http://example.org/wsvn/"] {
            assert!(
                matches!(
                    WebSvnBrowser::new(url),
                    Err(BrowserError::InvalidConfiguration(_))
                ),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_form_data() {
        let mut form = HashMap::new();
        form.insert(
            "webSVN2.url".to_string(),
            "http://example.org/wsvn/myrepo".to_string(),
        );
        let browser = WebSvnBrowser::from_form_data(&form).unwrap();
        assert_eq!(browser.repname(), "myrepo");
        assert_eq!(browser.display_name(), "WebSVN2");
    }

    #[test]
    fn form_data_without_url_is_rejected() {
        let mut form = HashMap::new();
        form.insert("url".to_string(), "http://example.org/wsvn/myrepo".to_string());

        let err = WebSvnBrowser::from_form_data(&form).unwrap_err();
        assert!(matches!(
            err,
            BrowserError::InvalidConfiguration(ValidationError::MissingField(ref field))
                if field == "webSVN2.url"
        ));
    }

    #[test]
    fn browser_deserializes_from_url_string() {
        let browser: WebSvnBrowser =
            serde_json::from_str("\"http://example.org/wsvn/myrepo\"").unwrap();
        assert_eq!(browser, self::browser());
        assert!(serde_json::from_str::<WebSvnBrowser>("\"http://example.org/\"").is_err());
    }

    #[test]
    fn browser_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WebSvnBrowser>();
    }
}
