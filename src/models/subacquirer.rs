use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel base URL that forces the mock driver for a single subacquirer.
pub const MOCK_ENDPOINT: &str = "mock";

/// A third-party payment provider this platform can route to.
///
/// Seeded from configuration; `base_url` and `active` are only mutated by an
/// operator toggling mode, never by request traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subacquirer {
    pub id: Uuid,
    /// Stable driver key, e.g. `"subadq_a"`.
    pub code: String,
    pub name: String,
    /// Real API base URL, the `"mock"` sentinel, or empty.
    pub base_url: String,
    pub active: bool,
}

impl Subacquirer {
    pub fn new(code: &str, name: &str, base_url: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            base_url: base_url.to_string(),
            active: true,
        }
    }

    /// True when this provider has no reachable endpoint configured.
    pub fn uses_mock_endpoint(&self) -> bool {
        self.base_url.is_empty() || self.base_url == MOCK_ENDPOINT
    }
}
