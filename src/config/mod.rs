//! Configuration for the typeahead engine.
//!
//! The core consumes a small configuration surface: how many candidates the
//! dropdown may hold, whether keyboard navigation wraps at the list
//! boundaries, and where the dropdown is placed relative to the caret.
//! All types derive serde traits with per-field defaults so hosts can embed
//! them in their own configuration files.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeaheadConfig {
    /// Dropdown configuration.
    #[serde(default)]
    pub dropdown: DropdownConfig,
}

/// Dropdown behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropdownConfig {
    /// Maximum number of candidates kept in the dropdown; result batches
    /// are truncated to this length, dropping the tail. Must be positive.
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Whether keyboard navigation wraps around at the first/last entry.
    #[serde(default = "default_rotate")]
    pub rotate: bool,

    /// Where the dropdown is placed relative to the caret.
    #[serde(default)]
    pub placement: Placement,
}

/// Dropdown placement relative to the caret anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Above the caret line.
    Top,

    /// Below the caret line.
    #[default]
    Bottom,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            max_count: default_max_count(),
            rotate: default_rotate(),
            placement: Placement::default(),
        }
    }
}

impl DropdownConfig {
    /// Validate the configuration.
    ///
    /// # Returns
    /// * `Result<()>` - Ok, or a `ConfigError` naming the offending field
    pub fn validate(&self) -> Result<()> {
        if self.max_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_count".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn default_max_count() -> usize {
    10
}

fn default_rotate() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DropdownConfig::default();
        assert_eq!(config.max_count, 10);
        assert!(config.rotate);
        assert_eq!(config.placement, Placement::Bottom);
    }

    #[test]
    fn test_validate_rejects_zero_max_count() {
        let config = DropdownConfig {
            max_count: 0,
            ..DropdownConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(DropdownConfig::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_empty_object_uses_defaults() {
        let config: TypeaheadConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.dropdown.max_count, 10);
        assert!(config.dropdown.rotate);
    }

    #[test]
    fn test_deserialize_partial_dropdown() {
        let config: DropdownConfig =
            serde_json::from_str(r#"{"max_count": 3, "placement": "top"}"#).unwrap();
        assert_eq!(config.max_count, 3);
        assert!(config.rotate);
        assert_eq!(config.placement, Placement::Top);
    }

    #[test]
    fn test_placement_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Placement::Top).unwrap(), r#""top""#);
        assert_eq!(
            serde_json::to_string(&Placement::Bottom).unwrap(),
            r#""bottom""#
        );
    }
}
