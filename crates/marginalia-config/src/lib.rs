use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Diagnostic topics to enable, by name (`walk`, `words`, `anchor`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub topics: Vec<String>,
}

/// Elements that addressing ignores, by tag name or class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipConfig {
    pub tags: Vec<String>,
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default annotation store when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations_path: Option<PathBuf>,
    /// Start XPath addresses at the nearest ancestor carrying an `id`.
    pub id_anchors: bool,
    pub trace: TraceConfig,
    pub skip: SkipConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            annotations_path: None,
            id_anchors: true,
            trace: TraceConfig::default(),
            skip: SkipConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the annotation store path
        config.annotations_path = config
            .annotations_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/marginalia");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/marginalia/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert!(config.id_anchors);
        assert!(config.skip.tags.is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let config_content = r#"
annotations_path = "/srv/notes/annotations.json"
id_anchors = false

[trace]
topics = ["words", "anchor"]

[skip]
tags = ["del"]
classes = ["annotation-marker"]
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(
            config.annotations_path,
            Some(PathBuf::from("/srv/notes/annotations.json"))
        );
        assert!(!config.id_anchors);
        assert_eq!(config.trace.topics, vec!["words", "anchor"]);
        assert_eq!(config.skip.tags, vec!["del"]);
        assert_eq!(config.skip.classes, vec!["annotation-marker"]);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            annotations_path: Some(PathBuf::from("/tmp/annotations.json")),
            skip: SkipConfig {
                tags: vec!["del".into()],
                classes: vec![],
            },
            ..Config::default()
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_config_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "id_anchors = \"sometimes\"").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { config_path, .. }) if config_path == config_file
        ));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            annotations_path: Some(PathBuf::from("/tmp/annotations.json")),
            id_anchors: false,
            trace: TraceConfig {
                topics: vec!["partition".into()],
            },
            skip: SkipConfig::default(),
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_config_with_env_var_in_toml() {
        unsafe {
            env::set_var("MARGINALIA_TEST_ROOT", "/custom/notes");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "annotations_path = \"$MARGINALIA_TEST_ROOT/annotations.json\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(
            config.annotations_path,
            Some(PathBuf::from("/custom/notes/annotations.json"))
        );

        unsafe {
            env::remove_var("MARGINALIA_TEST_ROOT");
        }
    }
}
