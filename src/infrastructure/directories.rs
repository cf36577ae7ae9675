use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::config::DirectoryConfig;

pub fn ensure_logs_dir(cfg: &DirectoryConfig) -> Result<PathBuf> {
    let dir = PathBuf::from(&cfg.logs_dir);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", cfg.logs_dir))?;

    let probe_file = dir.join(".write-test");
    fs::write(&probe_file, b"ok")
        .with_context(|| format!("log directory {} is not writable", dir.display()))?;
    fs::remove_file(&probe_file)?;

    Ok(dir.canonicalize().unwrap_or(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_directory() {
        let root = std::env::temp_dir().join(format!("email-triage-logs-{}", std::process::id()));
        let nested = root.join("a").join("b");
        let cfg = DirectoryConfig {
            logs_dir: nested.to_string_lossy().into_owned(),
        };
        let resolved = ensure_logs_dir(&cfg).unwrap();
        assert!(resolved.is_dir());
        assert!(!resolved.join(".write-test").exists());
        fs::remove_dir_all(&root).unwrap();
    }
}
