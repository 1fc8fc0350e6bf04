use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::source::page_size;
use crate::tail::TailOptions;

/// Overrides `path_prefixes`, separated like `PATH`.
pub const PATH_PREFIXES_ENV: &str = "REVTAIL_PATH_PREFIXES";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub chunk_size: Option<usize>,
    pub default_num_lines: i64,
    pub case_sensitive: bool,
    #[serde(default)]
    pub channel_capacity: usize,
    #[serde(default)]
    pub path_prefixes: Vec<PathBuf>,
}

impl Config {
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or_else(page_size)
    }

    pub fn tail_options(&self, max_lines: Option<i64>) -> TailOptions {
        TailOptions {
            max_lines: max_lines.unwrap_or(self.default_num_lines),
            chunk_size: self.chunk_size(),
            channel_capacity: self.channel_capacity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_hash: String,
}

pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p).with_context(|| format!("failed to read config {}", p.display()))?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };

    let mut config: Config = serde_yaml::from_slice(&bytes)?;
    if config.chunk_size == Some(0) {
        bail!("chunk_size must be positive");
    }
    if let Some(prefixes) = std::env::var_os(PATH_PREFIXES_ENV) {
        let prefixes: Vec<PathBuf> = std::env::split_paths(&prefixes)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        if !prefixes.is_empty() {
            config.path_prefixes = prefixes;
        }
    }

    let config_hash = hash_bytes(&bytes);

    Ok(LoadedConfig { config, config_hash })
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    hex::encode(digest)
}
