use serde::{Deserialize, Serialize};

/// A single committed Subversion revision and the paths it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    revision: u64,
    #[serde(default)]
    paths: Vec<ChangePath>,
}

/// A file or directory changed within a [`LogEntry`].
///
/// The path is relative to the repository root, as reported by `svn log -v`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePath {
    value: String,
}

/// The change log of one build, oldest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLog {
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

impl LogEntry {
    pub fn new(revision: u64, paths: Vec<ChangePath>) -> Self {
        Self { revision, paths }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn paths(&self) -> &[ChangePath] {
        &self.paths
    }
}

impl ChangePath {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
