//! Outbound HTTP settings shared by the feed and wiki clients.

use integration_ical::IcsConfig;
use serde::{Deserialize, Serialize};

/// `[http]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds (`HTTP_TIMEOUT_SECS`, default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("ics-to-wiki/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Feed client settings
    #[must_use]
    pub fn ics_config(&self) -> IcsConfig {
        IcsConfig {
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }
}
