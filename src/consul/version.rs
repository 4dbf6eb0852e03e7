use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("'{0}' must have at least three dot separated components")]
    TooFewComponents(String),
    #[error("'{0}' components do not form an integer")]
    NotNumeric(String),
}

/// Version reported by a consul agent, used only to gate optional request fields.
///
/// Ordering follows the agent-side feature gates this tool has always used:
/// the three components are concatenated without separators and the result
/// is compared as a single integer. `1.4.10` therefore sorts above `1.5.0`
/// (`1410 > 150`). There is intentionally no equality operator.
#[derive(Debug, Clone)]
pub struct ApiVersion {
    major: String,
    minor: String,
    patch: String,
    key: u128,
}

pub const SERVICE_IDENTITIES_SINCE: &str = "1.5.0";
pub const NODE_IDENTITIES_SINCE: &str = "1.8.0";

impl ApiVersion {
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let mut parts = raw.trim().split('.');
        let (Some(major), Some(minor), Some(patch)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(VersionError::TooFewComponents(raw.to_owned()));
        };

        let key = format!("{}{}{}", major, minor, patch)
            .parse::<u128>()
            .map_err(|_| VersionError::NotNumeric(raw.to_owned()))?;

        Ok(Self {
            major: major.to_owned(),
            minor: minor.to_owned(),
            patch: patch.to_owned(),
            key,
        })
    }

    pub fn is_at_least(&self, other: &ApiVersion) -> bool {
        self.key >= other.key
    }

    pub fn is_at_most(&self, other: &ApiVersion) -> bool {
        self.key <= other.key
    }

    pub fn supports_service_identities(&self) -> bool {
        self.is_at_least(&threshold(SERVICE_IDENTITIES_SINCE))
    }

    pub fn supports_node_identities(&self) -> bool {
        self.is_at_least(&threshold(NODE_IDENTITIES_SINCE))
    }
}

// thresholds are compile time literals
fn threshold(raw: &'static str) -> ApiVersion {
    match ApiVersion::parse(raw) {
        Ok(version) => version,
        Err(_) => unreachable!("invalid built-in version threshold {raw}"),
    }
}

impl FromStr for ApiVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApiVersion::parse(s)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
