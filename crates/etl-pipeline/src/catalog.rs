//! Data catalog: where each named dataset lives.
//!
//! Datasets are declared in TOML, one table per dataset:
//!
//! ```toml
//! [raw_test]
//! type = "csv"
//! filepath = "data/01_raw/test.csv"
//!
//! [intermediate_test]
//! type = "csv"
//! filepath = "data/02_intermediate/test.csv"
//! separator = ";"
//! ```
//!
//! `conf/base/catalog.toml` is read first, then `conf/<env>/catalog.toml`
//! replaces entries with the same name. Datasets that are not declared are
//! held in memory for the duration of a run.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::project::ProjectPaths;

/// Catalog file name inside each environment directory.
pub const CATALOG_FILE: &str = "catalog.toml";

/// Environment whose catalog is always loaded first.
pub const BASE_ENV: &str = "base";

const DEFAULT_SEPARATOR: char = ',';

type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Storage for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatasetConfig {
    /// Delimited text file. Every column is read as text.
    Csv {
        filepath: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        separator: Option<char>,
    },
    /// Kept in memory only.
    Memory,
}

impl DatasetConfig {
    pub fn csv(filepath: impl Into<PathBuf>) -> Self {
        Self::Csv {
            filepath: filepath.into(),
            separator: None,
        }
    }
}

/// Parsed contents of one catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogConfig {
    pub datasets: BTreeMap<String, DatasetConfig>,
}

impl CatalogConfig {
    /// Read a catalog file. A missing file is an empty catalog.
    pub fn read(path: &Path) -> CatalogResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CatalogError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&contents).map_err(|source| CatalogError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Entries in `other` replace entries of the same name.
    pub fn merge(&mut self, other: Self) {
        self.datasets.extend(other.datasets);
    }
}

/// Loads and saves datasets by name.
#[derive(Debug, Clone)]
pub struct DataCatalog {
    paths: ProjectPaths,
    datasets: BTreeMap<String, DatasetConfig>,
    memory: HashMap<String, DataFrame>,
}

impl DataCatalog {
    /// Catalog with no declared datasets; relative paths resolve against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(ProjectPaths::new(root), CatalogConfig::default())
    }

    pub fn from_config(paths: ProjectPaths, config: CatalogConfig) -> Self {
        Self {
            paths,
            datasets: config.datasets,
            memory: HashMap::new(),
        }
    }

    /// Base catalog overlaid with the catalog of `env`.
    pub fn for_env(paths: &ProjectPaths, env: &str) -> CatalogResult<Self> {
        let mut config = CatalogConfig::read(&paths.env_conf_dir(BASE_ENV).join(CATALOG_FILE))?;
        if env != BASE_ENV {
            config.merge(CatalogConfig::read(
                &paths.env_conf_dir(env).join(CATALOG_FILE),
            )?);
        }
        tracing::debug!(env, datasets = config.datasets.len(), "catalog loaded");
        Ok(Self::from_config(paths.clone(), config))
    }

    #[must_use]
    pub fn with_dataset(mut self, name: impl Into<String>, config: DatasetConfig) -> Self {
        self.datasets.insert(name.into(), config);
        self
    }

    /// Hold `df` in memory under `name`, shadowing any declared storage.
    pub fn add_memory(&mut self, name: impl Into<String>, df: DataFrame) {
        self.memory.insert(name.into(), df);
    }

    /// Declared storage for a dataset.
    pub fn describe(&self, name: &str) -> Option<&DatasetConfig> {
        self.datasets.get(name)
    }

    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn load(&self, name: &str) -> CatalogResult<DataFrame> {
        if let Some(df) = self.memory.get(name) {
            return Ok(df.clone());
        }
        match self.datasets.get(name) {
            Some(DatasetConfig::Csv {
                filepath,
                separator,
            }) => self.read_csv(name, filepath, *separator),
            Some(DatasetConfig::Memory) | None => Err(CatalogError::DatasetNotFound {
                name: name.to_string(),
            }),
        }
    }

    pub fn save(&mut self, name: &str, df: DataFrame) -> CatalogResult<()> {
        match self.datasets.get(name) {
            Some(DatasetConfig::Csv {
                filepath,
                separator,
            }) => {
                let mut df = df;
                self.write_csv(name, filepath, *separator, &mut df)
            }
            Some(DatasetConfig::Memory) | None => {
                self.memory.insert(name.to_string(), df);
                Ok(())
            }
        }
    }

    fn read_csv(
        &self,
        name: &str,
        filepath: &Path,
        separator: Option<char>,
    ) -> CatalogResult<DataFrame> {
        let path = self.paths.resolve(filepath);
        if !path.exists() {
            return Err(CatalogError::MissingFile {
                name: name.to_string(),
                path,
            });
        }
        let separator = separator_byte(name, separator)?;
        let csv_error = |source: PolarsError| CatalogError::Csv {
            action: "load",
            name: name.to_string(),
            path: path.clone(),
            source,
        };

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|options| options.with_separator(separator))
            .try_into_reader_with_file_path(Some(path.clone()))
            .map_err(csv_error)?
            .finish()
            .map_err(csv_error)?;
        tracing::debug!(dataset = name, path = %path.display(), rows = df.height(), "loaded csv");
        Ok(df)
    }

    fn write_csv(
        &self,
        name: &str,
        filepath: &Path,
        separator: Option<char>,
        df: &mut DataFrame,
    ) -> CatalogResult<()> {
        let path = self.paths.resolve(filepath);
        let separator = separator_byte(name, separator)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut file = File::create(&path).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(separator)
            .finish(df)
            .map_err(|source| CatalogError::Csv {
                action: "save",
                name: name.to_string(),
                path: path.clone(),
                source,
            })?;
        tracing::debug!(dataset = name, path = %path.display(), rows = df.height(), "saved csv");
        Ok(())
    }
}

fn separator_byte(name: &str, separator: Option<char>) -> CatalogResult<u8> {
    let separator = separator.unwrap_or(DEFAULT_SEPARATOR);
    u8::try_from(separator)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| CatalogError::InvalidSeparator {
            name: name.to_string(),
            separator,
        })
}
