//! Хранилище конфигураций карт
//!
//! Сохранённые конфигурации — TOML-файлы `<id>.toml` в одном каталоге.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::MapConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse stored config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Идентификатор пустой или содержит недопустимые символы
    #[error("invalid config id `{0}`")]
    InvalidId(String),
}

/// Сохранение и загрузка конфигураций по идентификатору
pub trait ConfigStore {
    fn save(&self, id: &str, config: &MapConfig) -> Result<(), StoreError>;

    fn load(&self, id: &str) -> Result<MapConfig, StoreError>;

    /// Идентификаторы сохранённых конфигураций по алфавиту
    fn ids(&self) -> Result<Vec<String>, StoreError>;
}

/// Допустимы латинские буквы, цифры, `-` и `_`
fn check_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_owned()))
    }
}

/// Каталог TOML-файлов
#[derive(Debug, Clone)]
pub struct TomlDirStore {
    root: PathBuf,
}

impl TomlDirStore {
    /// Открывает каталог, создавая его при необходимости
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path(&self, id: &str) -> Result<PathBuf, StoreError> {
        check_id(id)?;
        Ok(self.root.join(format!("{id}.toml")))
    }
}

impl ConfigStore for TomlDirStore {
    fn save(&self, id: &str, config: &MapConfig) -> Result<(), StoreError> {
        let path = self.path(id)?;
        let contents = toml::to_string_pretty(config)?;
        fs::write(&path, contents)?;
        debug!(path = %path.display(), "конфигурация сохранена");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<MapConfig, StoreError> {
        let contents = fs::read_to_string(self.path(id)?)?;
        Ok(MapConfig::from_toml_str(&contents)?)
    }

    fn ids(&self) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "toml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
