//! Environment-backed defaults.
//!
//! Site-specific paths do not belong in command lines that get pasted into
//! papers' READMEs, so they can come from the environment (or a `.env` file):
//!
//! - `SHFIT_MAP_DIR`  directory holding the per-energy-bin maps
//! - `SHFIT_CONFIG`   detector configuration prefix (default `IC`)
//! - `SHFIT_PATTERN`  map file-name template (default `{config}*_E{bin}.fits`)
//! - `SHFIT_FONT`     font file for chart text

use std::path::PathBuf;

use crate::io::DEFAULT_PATTERN;

pub const DEFAULT_DETECTOR_CONFIG: &str = "IC";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvDefaults {
    pub map_dir: Option<PathBuf>,
    pub detector_config: Option<String>,
    pub pattern: Option<String>,
    pub font: Option<PathBuf>,
}

impl EnvDefaults {
    /// Read defaults from the process environment, loading `.env` first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read defaults through an arbitrary lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            map_dir: get("SHFIT_MAP_DIR").map(PathBuf::from),
            detector_config: get("SHFIT_CONFIG"),
            pattern: get("SHFIT_PATTERN"),
            font: get("SHFIT_FONT").map(PathBuf::from),
        }
    }

    pub fn map_dir_or_cwd(&self) -> PathBuf {
        self.map_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn detector_config_or_default(&self) -> String {
        self.detector_config
            .clone()
            .unwrap_or_else(|| DEFAULT_DETECTOR_CONFIG.to_string())
    }

    pub fn pattern_or_default(&self) -> String {
        self.pattern.clone().unwrap_or_else(|| DEFAULT_PATTERN.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_fills_fields_and_ignores_blanks() {
        let vars: HashMap<&str, &str> = [
            ("SHFIT_MAP_DIR", "/data/maps"),
            ("SHFIT_CONFIG", "IC86"),
            ("SHFIT_PATTERN", "  "),
        ]
        .into_iter()
        .collect();
        let env = EnvDefaults::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(env.map_dir, Some(PathBuf::from("/data/maps")));
        assert_eq!(env.detector_config_or_default(), "IC86");
        assert_eq!(env.pattern_or_default(), DEFAULT_PATTERN);
        assert_eq!(env.font, None);
    }

    #[test]
    fn empty_environment_uses_builtin_defaults() {
        let env = EnvDefaults::from_lookup(|_| None);
        assert_eq!(env.map_dir_or_cwd(), PathBuf::from("."));
        assert_eq!(env.detector_config_or_default(), "IC");
    }
}
