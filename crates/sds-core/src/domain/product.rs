//! Copernicus product requests and catalogue records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a product request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryState {
    /// Recorded, no download attempted yet.
    New,
    /// Retrieval from the long-term archive has been triggered.
    Pending,
    /// A download started but did not finish.
    Incomplete,
    /// The product is stored locally.
    Available,
    /// The hub refused to provide the product.
    Unavailable,
    /// The product id does not exist.
    Invalid,
}

impl QueryState {
    /// States in which another download attempt makes sense.
    pub const fn should_download(self) -> bool {
        matches!(self, Self::New | Self::Pending | Self::Incomplete)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Pending => "pending",
            Self::Incomplete => "incomplete",
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "pending" => Ok(Self::Pending),
            "incomplete" => Ok(Self::Incomplete),
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            "invalid" => Ok(Self::Invalid),
            other => Err(format!("Unknown query state: {other}")),
        }
    }
}

/// A row of the request schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRequest {
    /// Product UUID on the hub.
    pub id: String,
    pub state: QueryState,
    /// When the hub was last asked for this product.
    pub last_query: Option<DateTime<Utc>>,
    /// Product title, e.g. `S2A_MSIL1C_20220104T103431_N0301_R108_T32UMA_20220104T123507`.
    pub title: String,
}

impl ProductRequest {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: QueryState::New,
            last_query: None,
            title: title.into(),
        }
    }
}

/// What the catalogue knows about a single product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMetadata {
    pub id: String,
    pub title: String,
    /// Size of the archive in bytes.
    pub size: u64,
    /// False when the product sits in the long-term archive.
    pub online: bool,
    /// MD5 of the archive, lowercase hex.
    pub checksum: Option<String>,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub sensing_start: Option<DateTime<Utc>>,
    pub cloud_cover: Option<f64>,
}

/// Hub account used for a call. The password never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_states() {
        assert!(QueryState::New.should_download());
        assert!(QueryState::Pending.should_download());
        assert!(QueryState::Incomplete.should_download());
        assert!(!QueryState::Available.should_download());
        assert!(!QueryState::Unavailable.should_download());
        assert!(!QueryState::Invalid.should_download());
    }

    #[test]
    fn state_round_trips_through_text() {
        for state in [
            QueryState::New,
            QueryState::Pending,
            QueryState::Incomplete,
            QueryState::Available,
            QueryState::Unavailable,
            QueryState::Invalid,
        ] {
            assert_eq!(state.to_string().parse::<QueryState>().unwrap(), state);
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{state}\""));
        }
        assert!("done".parse::<QueryState>().is_err());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
