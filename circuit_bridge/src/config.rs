// circuit_bridge/src/config.rs
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// Environment variable naming a TOML file with a [`BridgeConfig`].
pub const CONFIG_ENV: &str = "CIRCUIT_BRIDGE_CONFIG";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_max_description_bytes")]
    pub max_description_bytes: u64,
    #[serde(default = "default_max_gates")]
    pub max_gates: usize,
    #[serde(default = "default_check_satisfiability")]
    pub check_satisfiability: bool,
}

fn default_max_description_bytes() -> u64 {
    4 * 1024 * 1024
}

fn default_max_gates() -> usize {
    1 << 20
}

fn default_check_satisfiability() -> bool {
    true
}

impl BridgeConfig {
    pub fn load(path: &Path) -> BridgeResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| BridgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content)
            .map_err(|err| BridgeError::Config(format!("unable to parse config: {err}")))
    }

    pub fn save(&self, path: &Path) -> BridgeResult<()> {
        let encoded = toml::to_string_pretty(self)
            .map_err(|err| BridgeError::Config(format!("unable to encode config: {err}")))?;
        fs::write(path, encoded).map_err(|source| BridgeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_env() -> BridgeResult<Self> {
        match env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(&PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_description_bytes: default_max_description_bytes(),
            max_gates: default_max_gates(),
            check_satisfiability: default_check_satisfiability(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: BridgeConfig = toml::from_str("max_gates = 8").expect("parse");
        assert_eq!(config.max_gates, 8);
        assert_eq!(config.max_description_bytes, default_max_description_bytes());
        assert!(config.check_satisfiability);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bridge.toml");
        let config = BridgeConfig {
            max_description_bytes: 512,
            max_gates: 3,
            check_satisfiability: false,
        };
        config.save(&path).expect("save");
        assert_eq!(BridgeConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn unparsable_config_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bridge.toml");
        fs::write(&path, "max_gates = \"many\"").expect("write");
        let err = BridgeConfig::load(&path).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }
}
