use anyhow::{Result, anyhow};
use std::env;
use std::path::PathBuf;

/// Overrides the data directory when set and non-empty.
pub const HOME_ENV: &str = "PLANBOARD_HOME";

pub fn get_planboard_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".planboard"))
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_planboard_dir()?.join("config.toml"))
}

pub fn get_database_path() -> Result<PathBuf> {
    Ok(get_planboard_dir()?.join("planboard.db"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    Ok(get_planboard_dir()?.join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_override() {
        // SAFETY: serialized with every other test touching PLANBOARD_HOME.
        unsafe { env::set_var(HOME_ENV, "/tmp/planboard-test-home") };
        let dir = get_planboard_dir().unwrap();
        unsafe { env::remove_var(HOME_ENV) };

        assert_eq!(dir, PathBuf::from("/tmp/planboard-test-home"));
    }

    #[test]
    #[serial]
    fn test_default_locations() {
        unsafe { env::remove_var(HOME_ENV) };

        let dir = get_planboard_dir().unwrap();
        assert!(dir.to_string_lossy().ends_with(".planboard"));
        assert!(get_config_path().unwrap().ends_with(".planboard/config.toml"));
        assert!(get_database_path().unwrap().ends_with(".planboard/planboard.db"));
        assert!(get_logs_dir().unwrap().ends_with(".planboard/logs"));
    }
}
