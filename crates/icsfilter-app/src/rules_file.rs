//! Location and storage of the filter rule document.

use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use icsfilter_core::config::RulesConfig;
use icsfilter_core::constants::{RULES_DIR, RULES_FALLBACK_DIR, RULES_FILE_NAME};
use icsfilter_core::error::{CoreError, CoreResult};

/// The rule document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesFile {
    dir: PathBuf,
    file_name: String,
}

impl RulesFile {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// ## Summary
    /// Splits a file path into directory and file name.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidInput`] if the path has no file name.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let file_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| CoreError::InvalidInput(format!("Not a file path: {}", path.display())))?;
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(dir, file_name))
    }

    /// ## Summary
    /// Resolves the rule file: the configured path if there is one,
    /// otherwise the default location in the user's config directory.
    ///
    /// ## Errors
    /// Returns [`CoreError::ConfigError`] when no config directory can be
    /// determined, or [`CoreError::InvalidInput`] for a configured path
    /// without a file name.
    pub fn locate(config: &RulesConfig) -> CoreResult<Self> {
        if let Some(path) = config.path.as_deref() {
            return Self::from_path(Path::new(path));
        }

        let base = BaseDirs::new().ok_or_else(|| {
            CoreError::ConfigError("No home directory, cannot locate rule file".to_string())
        })?;
        Ok(Self::in_config_dir(base.config_dir()))
    }

    /// The default rule file below `config_dir`.
    ///
    /// The `webcal-client` location is used when its file exists, the
    /// `com.jolla/calendar` one otherwise.
    #[must_use]
    pub fn in_config_dir(config_dir: &Path) -> Self {
        let primary = Self::new(config_dir.join(RULES_DIR), RULES_FILE_NAME);
        if primary.path().exists() {
            return primary;
        }
        Self::new(config_dir.join(RULES_FALLBACK_DIR), RULES_FILE_NAME)
    }

    /// Retargets the file. `None` keeps the current directory or name.
    #[must_use]
    pub fn with_location(mut self, dir: Option<&Path>, file_name: Option<&str>) -> Self {
        if let Some(dir) = dir {
            self.dir = dir.to_path_buf();
        }
        if let Some(name) = file_name.filter(|name| !name.is_empty()) {
            self.file_name = name.to_string();
        }
        self
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// ## Summary
    /// Reads the rule document.
    ///
    /// A missing file is not an error: it is logged and read as empty text,
    /// which makes filtering a pass-through.
    ///
    /// ## Errors
    /// Returns [`CoreError::RulesFile`] if the file exists but cannot be read.
    pub fn read(&self) -> CoreResult<String> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), len = text.len(), "Read rule file");
                Ok(text)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Rule file not found");
                Ok(String::new())
            }
            Err(source) => Err(CoreError::RulesFile {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// ## Summary
    /// Replaces the rule document with `text`, creating its directory first.
    ///
    /// ## Errors
    /// Returns [`CoreError::RulesFile`] if the directory or file cannot be
    /// written.
    pub fn overwrite(&self, text: &str) -> CoreResult<()> {
        let path = self.path();
        let rules_error = |source| CoreError::RulesFile {
            path: path.display().to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(rules_error)?;
        fs::write(&path, text).map_err(rules_error)?;

        tracing::info!(path = %path.display(), len = text.len(), "Rule file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_location_falls_back_to_jolla_dir() {
        let temp = TempDir::new().unwrap();
        let file = RulesFile::in_config_dir(temp.path());
        assert_eq!(
            file.path(),
            temp.path()
                .join("com.jolla")
                .join("calendar")
                .join("iCalendarFilters.json")
        );
    }

    #[test]
    fn default_location_prefers_existing_webcal_file() {
        let temp = TempDir::new().unwrap();
        let primary = temp.path().join("webcal-client");
        fs::create_dir_all(&primary).unwrap();
        fs::write(primary.join("iCalendarFilters.json"), "{}").unwrap();

        let file = RulesFile::in_config_dir(temp.path());
        assert_eq!(file.path(), primary.join("iCalendarFilters.json"));
    }

    #[test]
    fn configured_path_wins() {
        let config = RulesConfig {
            path: Some("/etc/icsfilter/rules.json".to_string()),
        };
        let file = RulesFile::locate(&config).unwrap();
        assert_eq!(file.path(), PathBuf::from("/etc/icsfilter/rules.json"));
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        let err = RulesFile::from_path(Path::new("/")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test_log::test]
    fn missing_file_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let file = RulesFile::new(temp.path(), "absent.json");
        assert_eq!(file.read().unwrap(), "");
    }

    #[test_log::test]
    fn overwrite_creates_directory_and_replaces_content() {
        let temp = TempDir::new().unwrap();
        let file = RulesFile::new(temp.path().join("nested").join("dir"), "rules.json");

        file.overwrite(r#"{"calendars":[{"label":"a"}]}"#).unwrap();
        file.overwrite(r#"{"calendars":[{"label":"b"}]}"#).unwrap();

        assert_eq!(file.read().unwrap(), r#"{"calendars":[{"label":"b"}]}"#);
    }

    #[test]
    fn with_location_keeps_unset_parts() {
        let file = RulesFile::new("/a", "rules.json")
            .with_location(Some(Path::new("/b")), None)
            .with_location(None, Some(""));
        assert_eq!(file.path(), PathBuf::from("/b/rules.json"));

        let file = file.with_location(None, Some("other.json"));
        assert_eq!(file.path(), PathBuf::from("/b/other.json"));
    }
}
