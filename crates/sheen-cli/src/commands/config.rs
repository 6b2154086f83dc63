use std::path::Path;

use anyhow::{bail, Result};

use sheen_core::AppConfig;

pub fn run(path: Option<&Path>, write: bool) -> Result<()> {
    let defaults = AppConfig::default();
    if !write {
        print!("{}", defaults.to_toml()?);
        return Ok(());
    }

    let path = path.map(Path::to_path_buf).unwrap_or_else(AppConfig::config_path);
    if path.exists() {
        bail!(
            "{} already exists; remove it first to regenerate the defaults",
            path.display()
        );
    }
    defaults.save_to(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("sheen-cli-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::remove_dir_all(&dir);

        run(Some(&path), true).expect("first write");
        let written = AppConfig::load_from(&path).expect("written file loads");
        assert_eq!(written.stepper.visible, 4);

        assert!(run(Some(&path), true).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
