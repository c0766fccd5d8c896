use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NeodbConfig {
    pub neofile: Option<PathBuf>,
    pub cadfile: Option<PathBuf>,
    pub limit: Option<usize>,
    pub log_dir: Option<PathBuf>,
}

impl NeodbConfig {
    /// Config written by `neodb init`
    pub fn starter() -> Self {
        Self {
            neofile: Some(default_neo_path()),
            cadfile: Some(default_cad_path()),
            limit: Some(10),
            log_dir: None,
        }
    }

    /// NEO dataset path: CLI flag, then config, then `data/neos.csv`
    pub fn resolve_neofile(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.neofile.clone())
            .unwrap_or_else(default_neo_path)
    }

    /// Close-approach dataset path: CLI flag, then config, then `data/cad.json`
    pub fn resolve_cadfile(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.cadfile.clone())
            .unwrap_or_else(default_cad_path)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("neodb.toml")
}

pub fn default_neo_path() -> PathBuf {
    PathBuf::from("data").join("neos.csv")
}

pub fn default_cad_path() -> PathBuf {
    PathBuf::from("data").join("cad.json")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<NeodbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: NeodbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &NeodbConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    ensure_parent_dir(path)?;
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
