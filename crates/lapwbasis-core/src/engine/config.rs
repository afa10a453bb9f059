use crate::core::models::basis_file::SpeciesFormat;
use crate::core::models::family::{FamilyKind, UserId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Rule for resolving several stored records that share one content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Reuse the earliest created record.
    UseFirst,
    /// Refuse to pick and fail with the list of conflicting records.
    #[default]
    Strict,
}

/// Repository-wide defaults, usually read from a TOML file.
///
/// ```toml
/// family-kind = "data.lapwbasis.family"
/// conflict-policy = "use-first"
/// default-format = "xml"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct RepositorySettings {
    pub family_kind: FamilyKind,
    pub conflict_policy: ConflictPolicy,
    pub default_format: Option<SpeciesFormat>,
}

impl RepositorySettings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}

/// Everything one family upload needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadConfig {
    pub directory: PathBuf,
    pub family_name: String,
    pub description: String,
    pub format: SpeciesFormat,
    pub conflict_policy: ConflictPolicy,
    pub caller: UserId,
    pub family_kind: FamilyKind,
}

#[derive(Default)]
pub struct UploadConfigBuilder {
    directory: Option<PathBuf>,
    family_name: Option<String>,
    description: Option<String>,
    format: Option<SpeciesFormat>,
    conflict_policy: Option<ConflictPolicy>,
    caller: Option<UserId>,
    family_kind: Option<FamilyKind>,
}

impl UploadConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the builder with repository defaults. Later setter calls override them.
    pub fn from_settings(settings: &RepositorySettings) -> Self {
        Self {
            format: settings.default_format,
            conflict_policy: Some(settings.conflict_policy),
            family_kind: Some(settings.family_kind.clone()),
            ..Self::default()
        }
    }

    pub fn directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.directory = Some(path.into());
        self
    }
    pub fn family_name(mut self, name: impl Into<String>) -> Self {
        self.family_name = Some(name.into());
        self
    }
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
    pub fn format(mut self, format: SpeciesFormat) -> Self {
        self.format = Some(format);
        self
    }
    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = Some(policy);
        self
    }
    pub fn caller(mut self, caller: UserId) -> Self {
        self.caller = Some(caller);
        self
    }
    pub fn family_kind(mut self, kind: FamilyKind) -> Self {
        self.family_kind = Some(kind);
        self
    }

    pub fn build(self) -> Result<UploadConfig, ConfigError> {
        Ok(UploadConfig {
            directory: self
                .directory
                .ok_or(ConfigError::MissingParameter("directory"))?,
            family_name: self
                .family_name
                .ok_or(ConfigError::MissingParameter("family_name"))?,
            description: self.description.unwrap_or_default(),
            format: self.format.ok_or(ConfigError::MissingParameter("format"))?,
            conflict_policy: self.conflict_policy.unwrap_or_default(),
            caller: self.caller.ok_or(ConfigError::MissingParameter("caller"))?,
            family_kind: self.family_kind.unwrap_or_default(),
        })
    }
}
