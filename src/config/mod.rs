//! Configuration management.
//!
//! Privacy settings, provider identity, and language directives are
//! configured outside the request path and passed into the resolver and
//! assembler as plain read-only structures.

use serde::Deserialize;
use std::path::Path;

use crate::models::PrivacySettings;

/// Main configuration for lectern.
#[derive(Debug, Clone, Default)]
pub struct LecternConfig {
    /// Privacy settings, provider identity, and trusted-provider allowlist.
    pub privacy: PrivacySettings,
    /// Target language for assistant responses.
    pub response_language: Option<String>,
    /// Language for dictionary-style definitions.
    pub dictionary_language: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Current provider identifier.
    pub provider: Option<String>,
    /// Trusted-provider allowlist.
    pub trusted_providers: Option<Vec<String>>,
    /// Response language.
    pub response_language: Option<String>,
    /// Dictionary language.
    pub dictionary_language: Option<String>,
    /// Privacy toggles.
    pub privacy: Option<ConfigFilePrivacy>,
}

/// Privacy section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFilePrivacy {
    /// Book text extraction toggle.
    pub book_text_extraction: Option<bool>,
    /// Annotations sharing toggle.
    pub annotations_sharing: Option<bool>,
    /// Highlights sharing toggle.
    pub highlights_sharing: Option<bool>,
    /// Notebook sharing toggle.
    pub notebook_sharing: Option<bool>,
    /// Progress sharing toggle (opt-out).
    pub progress_sharing: Option<bool>,
    /// Stats sharing toggle (opt-out).
    pub stats_sharing: Option<bool>,
}

impl LecternConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/lectern/` on macOS)
    /// 2. XDG config dir (`~/.config/lectern/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs.config_dir().join("lectern").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("lectern")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `LecternConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(provider) = file.provider {
            config.privacy.provider = provider;
        }
        if let Some(trusted) = file.trusted_providers {
            config.privacy.trusted_providers = trusted;
        }
        config.response_language = file.response_language;
        config.dictionary_language = file.dictionary_language;

        if let Some(privacy) = file.privacy {
            if let Some(v) = privacy.book_text_extraction {
                config.privacy.book_text_extraction = v;
            }
            if let Some(v) = privacy.annotations_sharing {
                config.privacy.annotations_sharing = v;
            }
            if let Some(v) = privacy.highlights_sharing {
                config.privacy.highlights_sharing = v;
            }
            if let Some(v) = privacy.notebook_sharing {
                config.privacy.notebook_sharing = v;
            }
            // Opt-out channels keep the unset/explicit distinction.
            config.privacy.progress_sharing = privacy.progress_sharing;
            config.privacy.stats_sharing = privacy.stats_sharing;
        }

        config
    }

    /// Sets the current provider.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.privacy.provider = provider.into();
        self
    }

    /// Sets the response language.
    #[must_use]
    pub fn with_response_language(mut self, language: impl Into<String>) -> Self {
        self.response_language = Some(language.into());
        self
    }
}
