use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PromptError, Result};
use crate::html::ROLE_ATTRIBUTE;
use crate::transcript::DEFAULT_SENTINEL;

/// Config file looked up in the working directory when none is given.
pub const LOCAL_CONFIG_FILE: &str = "promptctl.toml";

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "PROMPTCTL_CONFIG";

pub const DEFAULT_INPUT_DIR: &str = "docs/qa/chat-exports";
pub const DEFAULT_OUTPUT_DIR: &str = "docs/qa/chat-exports/prompts";

/// Which blocks survive to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    /// Every extracted block
    #[default]
    All,
    /// Only persona-declared specs with an objective/deliverables section
    Official,
}

/// Knobs for file classification and the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractRules {
    /// Author role collected from HTML exports
    pub role: String,
    /// Attribute that carries the author role
    pub role_attribute: String,
    /// Transcript line that follows a user message
    pub sentinel: String,
    /// File names (case-insensitive) treated as CLI transcripts
    pub transcript_names: Vec<String>,
    /// File name prefix (case-insensitive) of ready-made prompt files
    pub explicit_prefix: String,
    /// Date folder used when the source path carries no `YYYYMMDD` segment
    pub fallback_date: String,
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self {
            role: "user".to_string(),
            role_attribute: ROLE_ATTRIBUTE.to_string(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            transcript_names: vec!["codex-chat.txt".to_string(), "codex-chat.md".to_string()],
            explicit_prefix: "prompt_".to_string(),
            fallback_date: "unknown".to_string(),
        }
    }
}

impl ExtractRules {
    pub fn validate(&self) -> Result<()> {
        if self.role.trim().is_empty() {
            return Err(PromptError::config("rules.role must not be empty"));
        }
        if self.role_attribute.trim().is_empty() {
            return Err(PromptError::config("rules.role_attribute must not be empty"));
        }
        if self.sentinel.trim().is_empty() {
            return Err(PromptError::config("rules.sentinel must not be empty"));
        }
        if self.fallback_date.trim().is_empty() {
            return Err(PromptError::config("rules.fallback_date must not be empty"));
        }
        // An empty prefix would claim every .txt/.md file.
        if self.explicit_prefix.trim().is_empty() {
            return Err(PromptError::config("rules.explicit_prefix must not be empty"));
        }
        if self.transcript_names.iter().any(|name| name.trim().is_empty()) {
            return Err(PromptError::config("rules.transcript_names must not contain blank entries"));
        }
        Ok(())
    }
}

/// `[extract]` table: defaults for the extract command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub kind: Option<PromptKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptctlConfig {
    pub extract: ExtractSection,
    pub rules: ExtractRules,
}

impl PromptctlConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `$PROMPTCTL_CONFIG`, then
    /// `./promptctl.toml` are tried, falling back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(PromptError::config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => Self::discover(),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn discover() -> Option<PathBuf> {
        if let Ok(from_env) = env::var(CONFIG_ENV) {
            if !from_env.trim().is_empty() {
                return Some(PathBuf::from(from_env));
            }
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        local.exists().then_some(local)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| PromptError::io(path, err))?;
        let mut config = Self::from_toml(&content).map_err(|err| match err {
            PromptError::ConfigParse { source, .. } => PromptError::config_parse(path, source),
            other => other,
        })?;
        config.expand_variables();
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|err| PromptError::config_parse("<inline>", err))?;
        config.rules.validate()?;
        Ok(config)
    }

    /// Expand `${HOME}` in configured directories.
    fn expand_variables(&mut self) {
        let home = env::var("HOME").unwrap_or_default();
        let expand = |path: &PathBuf| PathBuf::from(path.display().to_string().replace("${HOME}", &home));

        if let Some(ref input) = self.extract.input_dir {
            self.extract.input_dir = Some(expand(input));
        }
        if let Some(ref output) = self.extract.output_dir {
            self.extract.output_dir = Some(expand(output));
        }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.extract
            .input_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.extract
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn kind(&self) -> PromptKind {
        self.extract.kind.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = PromptctlConfig::from_toml("").unwrap();
        assert_eq!(config, PromptctlConfig::default());
        assert_eq!(config.input_dir(), PathBuf::from(DEFAULT_INPUT_DIR));
        assert_eq!(config.output_dir(), PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.kind(), PromptKind::All);
        assert_eq!(config.rules.sentinel, "No tasks in progress");
    }

    #[test]
    fn partial_tables_merge_with_defaults() {
        let config = PromptctlConfig::from_toml(
            r#"
            [extract]
            kind = "official"
            output_dir = "out"

            [rules]
            sentinel = ">>> idle"
            "#,
        )
        .unwrap();

        assert_eq!(config.kind(), PromptKind::Official);
        assert_eq!(config.output_dir(), PathBuf::from("out"));
        assert_eq!(config.input_dir(), PathBuf::from(DEFAULT_INPUT_DIR));
        assert_eq!(config.rules.sentinel, ">>> idle");
        assert_eq!(config.rules.role, "user");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = PromptctlConfig::from_toml("[extract]\nkind = \"some\"\n").unwrap_err();
        assert!(matches!(err, PromptError::ConfigParse { .. }));
    }

    #[test]
    fn empty_role_is_rejected() {
        let err = PromptctlConfig::from_toml("[rules]\nrole = \" \"\n").unwrap_err();
        assert!(matches!(err, PromptError::Config { .. }));
    }

    #[test]
    fn blank_classification_rules_are_rejected() {
        let err = PromptctlConfig::from_toml("[rules]\nexplicit_prefix = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("explicit_prefix"));

        let err = PromptctlConfig::from_toml("[rules]\ntranscript_names = [\"codex-chat.txt\", \" \"]\n")
            .unwrap_err();
        assert!(err.to_string().contains("transcript_names"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = PromptctlConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
