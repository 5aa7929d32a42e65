//! Configuration for soulscribe.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SOULSCRIBE_HOME, DEEPGRAM_API_KEY, OPENAI_API_KEY)
//! 2. Config file (.soulscribe/config.yaml)
//! 3. Defaults (~/.soulscribe)
//!
//! Config file discovery:
//! - Searches current directory and parents for .soulscribe/config.yaml
//! - Paths in the config file are relative to the config file's directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub deepgram: Option<DeepgramConfig>,
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
    #[serde(default)]
    pub capture: Option<CaptureConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to config file)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeepgramConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureConfig {
    /// Command spawned to capture microphone audio, e.g. "rec" or "sox"
    pub command: Option<String>,
    /// Extra arguments before the output path
    #[serde(default)]
    pub args: Vec<String>,
}

/// Resolved Deepgram settings
#[derive(Debug, Clone)]
pub struct DeepgramSettings {
    pub api_key: String,
    pub base_url: String,
}

/// Resolved OpenAI settings
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Resolved capture settings
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            command: "rec".to_string(),
            args: Vec::new(),
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to soulscribe home (journal db, cache, recordings)
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub deepgram: DeepgramSettings,
    pub openai: OpenAiSettings,
    pub capture: CaptureSettings,
}

impl ResolvedConfig {
    /// Path to the journal database file
    pub fn db_path(&self) -> PathBuf {
        self.home.join("journal.db")
    }

    /// Path to the local session/profile cache mirror
    pub fn cache_path(&self) -> PathBuf {
        self.home.join("cache.json")
    }

    /// Directory for finished recordings
    pub fn recordings_dir(&self) -> PathBuf {
        self.home.join("recordings")
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".soulscribe").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's directory
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

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".soulscribe");

    let config_file = find_config_file();
    let file = match &config_file {
        Some(path) => Some(load_config_file(path)?),
        None => None,
    };

    // Resolve home path
    let home = if let Ok(env_home) = std::env::var("SOULSCRIBE_HOME") {
        PathBuf::from(env_home)
    } else if let Some(home_path) = file.as_ref().and_then(|f| f.paths.home.as_ref()) {
        let base = config_file
            .as_ref()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));
        resolve_path(base, home_path)
    } else {
        default_home
    };

    let dg = file.as_ref().and_then(|f| f.deepgram.clone()).unwrap_or_default();
    let deepgram = DeepgramSettings {
        api_key: std::env::var("DEEPGRAM_API_KEY")
            .ok()
            .or(dg.api_key)
            .unwrap_or_default(),
        base_url: dg
            .base_url
            .unwrap_or_else(|| "https://api.deepgram.com".to_string()),
    };

    let oa = file.as_ref().and_then(|f| f.openai.clone()).unwrap_or_default();
    let openai = OpenAiSettings {
        api_key: std::env::var("OPENAI_API_KEY")
            .ok()
            .or(oa.api_key)
            .unwrap_or_default(),
        base_url: oa
            .base_url
            .unwrap_or_else(|| "https://api.openai.com".to_string()),
        model: oa.model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
        temperature: oa.temperature.unwrap_or(0.7),
        max_tokens: oa.max_tokens.unwrap_or(500),
    };

    let cap = file.as_ref().and_then(|f| f.capture.clone()).unwrap_or_default();
    let capture = CaptureSettings {
        command: cap.command.unwrap_or_else(|| "rec".to_string()),
        args: cap.args,
    };

    Ok(ResolvedConfig {
        home,
        config_file,
        deepgram,
        openai,
        capture,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".soulscribe");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ./
deepgram:
  api_key: dg-test
openai:
  model: gpt-4o
  temperature: 0.2
  max_tokens: 800
capture:
  command: sox
  args: ["-d"]
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./".to_string()));
        assert_eq!(config.deepgram.unwrap().api_key, Some("dg-test".to_string()));

        let oa = config.openai.unwrap();
        assert_eq!(oa.model, Some("gpt-4o".to_string()));
        assert_eq!(oa.temperature, Some(0.2));
        assert_eq!(oa.max_tokens, Some(800));

        let cap = config.capture.unwrap();
        assert_eq!(cap.command, Some("sox".to_string()));
        assert_eq!(cap.args, vec!["-d".to_string()]);
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            resolve_path(&base, "../sibling"),
            PathBuf::from("/home/user/project/../sibling")
        );
    }

    #[test]
    fn test_derived_paths() {
        let config = ResolvedConfig {
            home: PathBuf::from("/test/.soulscribe"),
            config_file: None,
            deepgram: DeepgramSettings {
                api_key: String::new(),
                base_url: "https://api.deepgram.com".to_string(),
            },
            openai: OpenAiSettings {
                api_key: String::new(),
                base_url: "https://api.openai.com".to_string(),
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
                max_tokens: 500,
            },
            capture: CaptureSettings::default(),
        };

        assert_eq!(config.db_path(), PathBuf::from("/test/.soulscribe/journal.db"));
        assert_eq!(config.cache_path(), PathBuf::from("/test/.soulscribe/cache.json"));
        assert_eq!(
            config.recordings_dir(),
            PathBuf::from("/test/.soulscribe/recordings")
        );
    }
}
