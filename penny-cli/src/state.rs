use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `$PENNY_HOME` if set, otherwise `~/.penny`.
pub fn penny_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("PENNY_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".penny"))
}

pub fn ensure_penny_home() -> Result<PathBuf> {
    let dir = penny_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Relative paths are taken from the penny home directory.
pub fn resolve(home: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        home.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let home = Path::new("/home/ada/.penny");
        assert_eq!(resolve(home, Path::new("budget.json")), home.join("budget.json"));
        assert_eq!(resolve(home, Path::new("/tmp/sms.json")), PathBuf::from("/tmp/sms.json"));
    }
}
