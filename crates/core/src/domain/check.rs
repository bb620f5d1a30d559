// Pre-flight Check Domain Model

use serde::{Deserialize, Serialize};

/// Check identifier (opaque string, e.g. "check-java-version")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckId(String);

impl CheckId {
    /// Java runtime presence and version probe
    pub const JAVA_VERSION: &'static str = "check-java-version";
    /// Local port availability probe
    pub const PORT_AVAILABLE: &'static str = "check-port-available";

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CheckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a single pre-flight check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Idle => write!(f, "idle"),
            CheckStatus::Running => write!(f, "running"),
            CheckStatus::Succeeded => write!(f, "succeeded"),
            CheckStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One pre-flight check with its last recorded outcome.
///
/// Checks are created in bulk when the game selection changes and are
/// mutated only by the check runner for the matching id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    pub id: CheckId,
    pub status: CheckStatus,
    pub message: String,
}

impl Check {
    /// Create a fresh check in the Idle state
    pub fn new(id: CheckId) -> Self {
        Self {
            id,
            status: CheckStatus::Idle,
            message: String::new(),
        }
    }
}
