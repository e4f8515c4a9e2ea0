use std::path::PathBuf;

use log::warn;

pub const DATA_DIR_ENV: &str = "MATH_HEROES_DATA_DIR";

/// Runtime configuration, resolved from the environment and CLI overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub debug: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            data_dir: std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            seed: Self::seed_from_env(),
            debug: Self::is_debug_mode(),
        }
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if data_dir.is_some() {
            self.data_dir = data_dir;
        }
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Where progress records live: the override if set, else the platform data dir.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(|| {
            directories::ProjectDirs::from("", "", "mathheroes")
                .map(|dirs| dirs.data_dir().to_path_buf())
        })
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        let raw = std::env::var("SEED").ok()?;
        match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(err) => {
                warn!(target: "settings", "Ignoring SEED={:?}: {}", raw, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        std::env::set_var(DATA_DIR_ENV, "/tmp/heroes");
        std::env::set_var("SEED", "1234");
        std::env::set_var("DEBUG", "1");

        let settings = Settings::from_env();
        assert_eq!(settings.data_dir, Some(PathBuf::from("/tmp/heroes")));
        assert_eq!(settings.seed, Some(1234));
        assert!(settings.debug);

        std::env::remove_var(DATA_DIR_ENV);
        std::env::remove_var("SEED");
        std::env::remove_var("DEBUG");
    }

    #[test]
    #[serial]
    fn test_invalid_seed_is_ignored() {
        std::env::set_var("SEED", "not-a-number");
        assert_eq!(Settings::seed_from_env(), None);
        std::env::remove_var("SEED");
    }

    #[test]
    fn test_cli_overrides_win() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/env")),
            seed: Some(1),
            debug: false,
        }
        .with_data_dir(Some(PathBuf::from("/cli")))
        .with_seed(None);

        assert_eq!(settings.resolved_data_dir(), Some(PathBuf::from("/cli")));
        assert_eq!(settings.seed, Some(1));
    }
}
