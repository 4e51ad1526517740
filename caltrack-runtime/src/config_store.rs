use anyhow::Context;
use caltrack_core::config::ClientConfig;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> anyhow::Result<ClientConfig> {
        let file = File::open(&self.path)
            .with_context(|| format!("open config: {}", self.path.display()))?;
        serde_json::from_reader(BufReader::new(file)).context("decode config JSON")
    }

    /// The stored config, or defaults when no file exists yet.
    pub fn load_or_default(&self) -> anyhow::Result<ClientConfig> {
        match File::open(&self.path) {
            Ok(file) => {
                serde_json::from_reader(BufReader::new(file)).context("decode config JSON")
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", self.path.display());
                Ok(crate::defaults::default_client_config())
            }
            Err(e) => Err(e).with_context(|| format!("open config: {}", self.path.display())),
        }
    }

    /// Writes pretty JSON to a temp file next to the target and renames it into place.
    pub fn save(&self, cfg: &ClientConfig) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create config directory: {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir).context("create temp config")?;
        serde_json::to_writer_pretty(&mut tmp, cfg).context("encode config JSON")?;
        tmp.as_file().sync_all().context("flush temp config")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("write config: {}", self.path.display()))?;
        Ok(())
    }
}
