//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings that depend on the game system rather than on one army book.
///
/// # Example RON
///
/// ```ron
/// RosterConfig(
///     leader_rule: "Hero",
///     default_points_limit: Some(2000),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Rule that marks a joined unit as a leader shown ahead of its host.
    #[serde(default = "default_leader_rule")]
    pub leader_rule: String,

    /// Points limit given to new rosters.
    #[serde(default)]
    pub default_points_limit: Option<u32>,
}

fn default_leader_rule() -> String {
    "Hero".to_string()
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            leader_rule: default_leader_rule(),
            default_points_limit: None,
        }
    }
}

impl RosterConfig {
    /// Parse configuration from RON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RosterError::ConfigParse`] on malformed input.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RosterConfig::from_ron_str("RosterConfig()").unwrap();
        assert_eq!(config, RosterConfig::default());
        assert_eq!(config.leader_rule, "Hero");
    }

    #[test]
    fn test_overrides() {
        let config = RosterConfig::from_ron_str(
            r#"RosterConfig(leader_rule: "Character", default_points_limit: Some(1500))"#,
        )
        .unwrap();
        assert_eq!(config.leader_rule, "Character");
        assert_eq!(config.default_points_limit, Some(1500));
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(RosterConfig::from_ron_str("RosterConfig(leader_rule: 3)").is_err());
    }
}
