use crate::browser::{BrowserError, RepositoryBrowser};
use crate::domain::ChangeLog;
use serde::Serialize;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEntry {
    pub revision: u64,
    pub change_set: Url,
    pub paths: Vec<RenderedPath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPath {
    pub path: String,
    pub diff: Url,
    pub file: Url,
}

/// Builds every link a change-log page shows, entry by entry.
///
/// Stops at the first link that cannot be built and returns its error unchanged.
#[instrument(skip_all, fields(entries = change_log.entries.len()))]
pub fn render_change_log<B>(
    browser: &B,
    change_log: &ChangeLog,
) -> Result<Vec<RenderedEntry>, BrowserError>
where
    B: RepositoryBrowser + ?Sized,
{
    let mut rendered = Vec::with_capacity(change_log.entries.len());

    for entry in &change_log.entries {
        let paths = entry
            .paths()
            .iter()
            .map(|path| {
                Ok(RenderedPath {
                    path: path.value().to_string(),
                    diff: browser.diff_link(path, entry)?,
                    file: browser.file_link(path, entry)?,
                })
            })
            .collect::<Result<Vec<_>, BrowserError>>()?;

        rendered.push(RenderedEntry {
            revision: entry.revision(),
            change_set: browser.change_set_link(entry)?,
            paths,
        });
    }

    info!("Rendered links for {} change log entries", rendered.len());
    Ok(rendered)
}
