use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use simple_logger::SimpleLogger;
use vm::VmConfig;

use crate::source::require_source;

/// Host configuration file.
///
/// ```toml
/// [vm]
/// max_call_depth = 256
/// seed = 7
///
/// [log]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    pub vm: VmConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`. Unset defers to
    /// `RUST_LOG`, then `warn`.
    pub level: Option<String>,
}

impl HostConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = require_source(path)?;
                Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Command-line flags win over the file.
    pub fn apply_flags(&mut self, seed: Option<u64>, trace: bool) {
        if seed.is_some() {
            self.vm.seed = seed;
        }
        if trace {
            self.vm.trace = true;
        }
    }

    pub fn level(&self) -> Result<Option<LevelFilter>> {
        if self.vm.trace {
            return Ok(Some(LevelFilter::Trace));
        }
        self.log
            .level
            .as_deref()
            .map(|level| {
                level
                    .parse::<LevelFilter>()
                    .with_context(|| format!("unknown log level `{level}`"))
            })
            .transpose()
    }

    pub fn init_logging(&self) -> Result<()> {
        let logger = match self.level()? {
            Some(level) => SimpleLogger::new().with_level(level),
            None => SimpleLogger::new().with_level(LevelFilter::Warn).env(),
        };
        logger.init().context("failed to initialise logging")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(HostConfig::from_toml("").unwrap(), HostConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = HostConfig::from_toml(
            "[vm]\nmax_call_depth = 8\nseed = 3\n\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();
        assert_eq!(config.vm.max_call_depth, 8);
        assert_eq!(config.vm.seed, Some(3));
        assert_eq!(config.vm.max_stack, VmConfig::default().max_stack);
        assert_eq!(config.level().unwrap(), Some(LevelFilter::Debug));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(HostConfig::from_toml("[vm]\nfuel = 1\n").is_err());
        assert!(HostConfig::from_toml("[gc]\n").is_err());
    }

    #[test]
    fn flags_win() {
        let mut config = HostConfig::from_toml("[vm]\nseed = 3\n").unwrap();
        config.apply_flags(Some(9), true);
        assert_eq!(config.vm.seed, Some(9));
        assert_eq!(config.level().unwrap(), Some(LevelFilter::Trace));
    }

    #[test]
    fn bad_level_is_an_error() {
        let config = HostConfig::from_toml("[log]\nlevel = \"loud\"\n").unwrap();
        assert!(config.level().is_err());
    }
}
