//! Configuration for folio.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (FOLIO_CONTENT_DIR, FOLIO_SOURCE, FOLIO_CONFIG)
//! 2. Config file (.folio/config.yaml, then <user config dir>/folio/config.yaml)
//! 3. Defaults (./content, file-backed source)
//!
//! Config file discovery:
//! - Searches current directory and parents for .folio/config.yaml
//! - Paths in a project config file are relative to the directory holding .folio/

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::ContentKind;
use crate::library::{FileSource, LoaderOptions, SourceKind};
use crate::search::SearchOptions;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub search: Option<SearchOptions>,
    #[serde(default)]
    pub watch: Option<WatchSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentConfig {
    /// Content root (relative to the project root)
    pub root: Option<String>,
    /// `files` or `static`
    pub source: Option<SourceKind>,
    /// Recognized content extensions
    pub extensions: Option<Vec<String>>,
    /// File-name globs that are never content
    pub ignore: Option<Vec<String>>,
    /// Kind to subdirectory mapping
    #[serde(default)]
    pub directories: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchSettings {
    pub debounce_ms: Option<u64>,
}

/// Environment overrides
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub content_dir: Option<String>,
    pub source: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            content_dir: std::env::var("FOLIO_CONTENT_DIR").ok(),
            source: std::env::var("FOLIO_SOURCE").ok(),
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the content root
    pub content_root: PathBuf,
    /// Which content source to load from
    pub source: SourceKind,
    /// Loader settings (extensions, ignore globs)
    pub loader: LoaderOptions,
    /// Kind subdirectory overrides
    pub directories: Vec<(ContentKind, String)>,
    /// Search tuning
    pub search: SearchOptions,
    /// Watch debounce window
    pub watch_debounce: Duration,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// File-backed source for the configured root, loader and directories
    pub fn file_source(&self) -> FileSource {
        self.directories.iter().fold(
            FileSource::new(&self.content_root).with_options(self.loader.clone()),
            |source, (kind, dir)| source.with_directory(*kind, dir.clone()),
        )
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var("FOLIO_CONFIG") {
        return Some(PathBuf::from(explicit));
    }

    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".folio").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let global = dirs::config_dir()?.join("folio").join("config.yaml");
    global.exists().then_some(global)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Directory that relative paths in a config file are resolved against
fn config_base_dir(config_path: &Path) -> PathBuf {
    let parent = config_path.parent().unwrap_or(Path::new("."));
    if parent.file_name().is_some_and(|n| n == ".folio") {
        parent.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}

/// Merge a parsed config file, environment overrides and defaults
fn resolve(
    file: Option<(PathBuf, ConfigFile)>,
    env: &EnvOverrides,
    cwd: &Path,
) -> Result<ResolvedConfig> {
    let (config_file, content, search, watch, base_dir) = match file {
        Some((path, config)) => {
            let base = config_base_dir(&path);
            (Some(path), config.content, config.search, config.watch, base)
        }
        None => (None, ContentConfig::default(), None, None, cwd.to_path_buf()),
    };

    let content_root = if let Some(ref dir) = env.content_dir {
        resolve_path(cwd, dir)
    } else if let Some(ref root) = content.root {
        resolve_path(&base_dir, root)
    } else {
        base_dir.join("content")
    };

    let source = match env.source {
        Some(ref s) => s.parse().context("Invalid FOLIO_SOURCE")?,
        None => content.source.unwrap_or_default(),
    };

    let defaults = LoaderOptions::default();
    let loader = LoaderOptions {
        extensions: content.extensions.unwrap_or(defaults.extensions),
        ignore: content.ignore.unwrap_or(defaults.ignore),
    };

    let mut directories = Vec::new();
    for (kind, dir) in content.directories {
        let kind: ContentKind = kind
            .parse()
            .with_context(|| format!("Invalid kind in content.directories: {}", kind))?;
        directories.push((kind, dir));
    }
    directories.sort();

    let watch_debounce = Duration::from_millis(watch.and_then(|w| w.debounce_ms).unwrap_or(500));

    Ok(ResolvedConfig {
        content_root,
        source,
        loader,
        directories,
        search: search.unwrap_or_default(),
        watch_debounce,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let file = match find_config_file() {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    resolve(file, &EnvOverrides::from_env(), &cwd)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
