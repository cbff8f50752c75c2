use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pdfgrid";
const DEFAULT_PYTHON: &str = "python3";

/// Which extractor turns a PDF into blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Native engine when compiled in, otherwise the script
    #[default]
    Auto,
    /// Built-in MuPDF bindings (requires the `pdf` feature)
    Native,
    /// External `extract.py` run through Python
    Script,
}

impl ExtractorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorKind::Auto => "auto",
            ExtractorKind::Native => "native",
            ExtractorKind::Script => "script",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub extractor: ExtractorKind,

    #[serde(default = "default_python")]
    pub python: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor_script: Option<PathBuf>,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_python() -> String {
    DEFAULT_PYTHON.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            extractor: ExtractorKind::default(),
            python: default_python(),
            extractor_script: None,
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Where an installed copy of the extractor script lives
pub fn installed_script_path() -> Option<PathBuf> {
    dirs::data_dir().map(|data| data.join(APP_NAME).join("tools").join("extract.py"))
}

pub fn load_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };

    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match parse_settings(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn parse_settings(content: &str) -> Result<Settings, serde_yaml::Error> {
    serde_yaml::from_str::<Settings>(content)
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    settings.version = CURRENT_VERSION;
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = generate_settings_yaml(settings);

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

fn generate_settings_yaml(settings: &Settings) -> String {
    let mut content = String::new();

    content.push_str(&format!("version: {}\n", settings.version));
    content.push('\n');
    content.push_str("# How PDFs are turned into text blocks: auto, native or script\n");
    content.push_str(&format!("extractor: {}\n", settings.extractor.as_str()));
    content.push_str("# Interpreter used to run the extractor script\n");
    content.push_str(&format!("python: {}\n", yaml_string(&settings.python)));
    match &settings.extractor_script {
        Some(script) => {
            let script = script.display().to_string();
            content.push_str(&format!("extractor_script: {}\n", yaml_string(&script)));
        }
        None => {
            content.push_str("# extractor_script: \"/path/to/extract.py\"\n");
        }
    }

    content
}

/// `value` as a YAML scalar, quoted and escaped where needed
fn yaml_string(value: &str) -> String {
    match serde_yaml::to_string(value) {
        Ok(scalar) => scalar.trim_end().to_string(),
        Err(e) => {
            warn!("Could not serialize {value:?} as YAML: {e}");
            format!("{value:?}")
        }
    }
}

// Public API for accessing/modifying settings

pub fn get_settings() -> Settings {
    SETTINGS.read().map(|s| s.clone()).unwrap_or_default()
}

/// Override the extractor for this run only; nothing is written to disk
pub fn override_extractor(kind: ExtractorKind) {
    if let Ok(mut settings) = SETTINGS.write() {
        settings.extractor = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = parse_settings("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reads_extractor_choice() {
        let settings = parse_settings("extractor: script\npython: /usr/bin/python3.12\n").unwrap();
        assert_eq!(settings.extractor, ExtractorKind::Script);
        assert_eq!(settings.python, "/usr/bin/python3.12");
        assert_eq!(settings.extractor_script, None);
    }

    #[test]
    fn generated_yaml_parses_back() {
        let settings = Settings {
            extractor: ExtractorKind::Native,
            extractor_script: Some(PathBuf::from("/opt/pdfgrid/extract.py")),
            ..Settings::default()
        };
        let parsed = parse_settings(&generate_settings_yaml(&settings)).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn windows_paths_and_quotes_survive_saving() {
        let settings = Settings {
            python: r#"C:\Program Files\Python "3.12"\python.exe"#.to_string(),
            extractor_script: Some(PathBuf::from(r"C:\Users\me\extract.py")),
            ..Settings::default()
        };
        let parsed = parse_settings(&generate_settings_yaml(&settings)).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn override_is_visible_to_readers() {
        override_extractor(ExtractorKind::Script);
        assert_eq!(get_settings().extractor, ExtractorKind::Script);
    }

    #[test]
    fn default_yaml_parses_back() {
        let parsed = parse_settings(&generate_settings_yaml(&Settings::default())).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn save_writes_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILENAME);
        save_settings_to_file(&Settings::default(), &path);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(parse_settings(&content).unwrap(), Settings::default());
    }
}
