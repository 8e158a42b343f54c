//! Loading and saving config files in several formats, selected by
//! file name extension.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use run_git::path_util::add_extension;
use serde::{Serialize, de::DeserializeOwned};

use crate::{debug, json5_from_str::json5_from_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigBackend {
    Json5,
    Yaml,
    Hcl,
}

impl ConfigBackend {
    pub fn format_name(self) -> &'static str {
        match self {
            ConfigBackend::Json5 => "JSON5",
            ConfigBackend::Yaml => "YAML",
            ConfigBackend::Hcl => "HCL",
        }
    }

    pub fn decode<T: DeserializeOwned>(self, s: &str) -> Result<T> {
        match self {
            ConfigBackend::Json5 => Ok(json5_from_str(s)?),
            ConfigBackend::Yaml => Ok(serde_yml::from_str(s)?),
            ConfigBackend::Hcl => Ok(hcl::from_str(s)?),
        }
    }

    pub fn encode<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            ConfigBackend::Json5 => {
                // JSON is valid JSON5, and nicer to read when pretty-printed.
                Ok(serde_json::to_string_pretty(value)?)
            }
            ConfigBackend::Yaml => Ok(serde_yml::to_string(value)?),
            ConfigBackend::Hcl => Ok(hcl::to_string(value)?),
        }
    }

    pub fn load_config_file<T: DeserializeOwned>(self, path: &Path) -> Result<T> {
        let s = std::fs::read_to_string(path)
            .with_context(|| anyhow!("loading config file from {path:?}"))?;
        self.decode(&s).with_context(|| {
            anyhow!(
                "decoding {} from config file {path:?}",
                self.format_name()
            )
        })
    }

    pub fn save_config_file<T: Serialize>(self, path: &Path, value: &T) -> Result<()> {
        let s = self
            .encode(value)
            .with_context(|| anyhow!("encoding config as {}", self.format_name()))?;
        std::fs::write(path, s).with_context(|| anyhow!("writing config file to {path:?}"))
    }
}

pub const FILE_EXTENSIONS: &[(&str, ConfigBackend)] = &[
    ("json5", ConfigBackend::Json5),
    ("json", ConfigBackend::Json5),
    ("yml", ConfigBackend::Yaml),
    ("yaml", ConfigBackend::Yaml),
    ("hcl", ConfigBackend::Hcl),
];

pub fn backend_from_path(path: &Path) -> Result<ConfigBackend> {
    let Some(ext) = path.extension() else {
        bail!(
            "given file path does not have an extension \
             for determining the file type: {path:?}"
        )
    };
    let Some(ext) = ext.to_str() else {
        bail!("given file path does have an extension that is not unicode: {path:?}")
    };
    match FILE_EXTENSIONS.iter().find(|(e, _b)| *e == ext) {
        Some((_, backend)) => Ok(*backend),
        None => bail!("given file path does have an unknown extension {ext:?}: {path:?}"),
    }
}

pub fn save_config_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let backend = backend_from_path(path)?;
    backend.save_config_file(path, value)
}

pub trait LoadConfigFile: DeserializeOwned + Default {
    /// Each of the `FILE_EXTENSIONS` is appended to look for a file.
    fn default_config_path_without_suffix() -> Result<Option<PathBuf>>;

    /// If `path` is given, the file must exist and is loaded. Otherwise
    /// the default location is checked with every known extension: if
    /// exactly one file exists it is loaded, if none exists the
    /// `Default` instance is returned, if several exist that's an
    /// error.
    fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        if let Some(path) = path {
            let path = path.as_ref();
            let backend = backend_from_path(path)?;
            return backend.load_config_file(path);
        }
        let Some(path) = Self::default_config_path_without_suffix()? else {
            return Ok(Self::default());
        };
        let path_and_backends: Vec<(PathBuf, ConfigBackend)> = FILE_EXTENSIONS
            .iter()
            .map(|(extension, backend)| -> Result<Option<(PathBuf, ConfigBackend)>> {
                let path = add_extension(&path, extension)
                    .ok_or_else(|| anyhow!("path is missing a file name: {path:?}"))?;
                Ok(path.exists().then_some((path, *backend)))
            })
            .filter_map(|x| x.transpose())
            .collect::<Result<_>>()?;
        match path_and_backends.as_slice() {
            [] => {
                debug!("no config file at {path:?}.*, using defaults");
                Ok(Self::default())
            }
            [(path, backend)] => backend.load_config_file(path),
            _ => {
                let paths: Vec<_> = path_and_backends.iter().map(|(path, _)| path).collect();
                bail!("multiple config file paths found, leading to ambiguity: {paths:?}")
            }
        }
    }
}

#[test]
fn t_backend_from_path() -> Result<()> {
    assert_eq!(
        backend_from_path(Path::new("sweep.json5"))?,
        ConfigBackend::Json5
    );
    assert_eq!(backend_from_path(Path::new("a/sweep.yml"))?, ConfigBackend::Yaml);
    assert_eq!(backend_from_path(Path::new("sweep.hcl"))?, ConfigBackend::Hcl);
    assert!(backend_from_path(Path::new("sweep")).is_err());
    assert!(backend_from_path(Path::new("sweep.toml")).is_err());
    Ok(())
}
