// Profile loader implementation
// reason: config crate for TOML/YAML/JSON profile files, std::env for overrides
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use illdb_core::domain::{definition_key, ProfileField, ProfileRegistry};

/// Profile loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load profiles from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Builds the immutable ProfileRegistry injected into the adapter
///
/// Accepted file shapes (format chosen by extension):
///
/// ```toml
/// ILLDB_LIVE_HOST = "db1.internal"
/// ILLDB_LIVE_PORT = 3306
///
/// [staging]
/// host = "db2.internal"
/// port = 3307
/// user = "reader"
/// pwd = "secret"
/// ```
pub struct ProfileLoader;

impl ProfileLoader {
    /// Load a profiles file, then overlay `ILLDB_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<ProfileRegistry, ConfigError> {
        let from_file = match path {
            Some(path) => Self::from_file(path)?,
            None => ProfileRegistry::default(),
        };

        let registry = from_file.overlay(Self::from_env());

        info!(
            profiles = ?registry.profile_names(),
            definitions = registry.len(),
            "Profile registry loaded"
        );

        Ok(registry)
    }

    pub fn from_file(path: &Path) -> Result<ProfileRegistry, ConfigError> {
        let load_err = |source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        };

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .build()
            .map_err(load_err)?;

        let entries: HashMap<String, config::Value> =
            settings.try_deserialize().map_err(load_err)?;

        let mut definitions = Vec::new();
        for (key, value) in entries {
            if let config::ValueKind::Table(_) = value.kind {
                let table = value.into_table().map_err(load_err)?;
                definitions.extend(Self::table_definitions(&key, table)?);
            } else {
                definitions.push((key.to_uppercase(), Self::scalar(&key, value)?));
            }
        }

        debug!(path = %path.display(), definitions = definitions.len(), "Profiles file read");

        Ok(ProfileRegistry::from_definitions(definitions))
    }

    /// Profile definitions from the process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> ProfileRegistry {
        Self::from_vars(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    /// Keep only `ILLDB_<PROFILE>_{HOST,PORT,USER,PWD}` entries
    pub fn from_vars<I>(vars: I) -> ProfileRegistry
    where
        I: IntoIterator<Item = (String, String)>,
    {
        ProfileRegistry::from_definitions(
            vars.into_iter()
                .filter(|(key, _)| ProfileField::parse_key(&key.to_uppercase()).is_some()),
        )
    }

    fn table_definitions(
        profile: &str,
        table: config::Map<String, config::Value>,
    ) -> Result<Vec<(String, String)>, ConfigError> {
        let mut definitions = Vec::new();
        for (field_name, value) in table {
            let field = match field_name.to_lowercase().as_str() {
                "host" => ProfileField::Host,
                "port" => ProfileField::Port,
                "user" => ProfileField::User,
                "pwd" | "password" => ProfileField::Password,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key: format!("{}.{}", profile, other),
                        message: "expected one of host, port, user, pwd".to_string(),
                    })
                }
            };
            let key = definition_key(profile, field);
            let value = Self::scalar(&key, value)?;
            definitions.push((key, value));
        }
        Ok(definitions)
    }

    fn scalar(key: &str, value: config::Value) -> Result<String, ConfigError> {
        value.into_string().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_from_file_flat_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "profiles.toml",
            r#"
ILLDB_LIVE_HOST = "db1.internal"
ILLDB_LIVE_PORT = 3306
ILLDB_LIVE_USER = "reader"
ILLDB_LIVE_PWD = "s3cret"
"#,
        );

        let registry = ProfileLoader::from_file(&path).unwrap();
        let profile = registry.lookup("live").unwrap();

        assert_eq!(profile.host, "db1.internal");
        assert_eq!(profile.port, "3306");
        assert_eq!(profile.password, "s3cret");
    }

    #[test]
    fn test_from_file_profile_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "profiles.toml",
            r#"
[staging]
host = "db2.internal"
port = 3307
user = "qa"
password = "pw"
"#,
        );

        let registry = ProfileLoader::from_file(&path).unwrap();
        let profile = registry.lookup("STAGING").unwrap();

        assert_eq!(profile.host, "db2.internal");
        assert_eq!(profile.port, "3307");
        assert_eq!(profile.user, "qa");
    }

    #[test]
    fn test_from_file_unknown_table_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "profiles.toml", "[dev]\nhostname = \"x\"\n");

        let result = ProfileLoader::from_file(&path);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_from_file_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "profiles.yaml",
            "dev:\n  host: localhost\n  port: 3306\n  user: root\n  pwd: \"1\"\n",
        );

        let registry = ProfileLoader::from_file(&path).unwrap();
        assert_eq!(registry.lookup("dev").unwrap().password, "1");
    }

    #[test]
    fn test_from_file_missing() {
        let result = ProfileLoader::from_file(Path::new("/nonexistent/profiles.toml"));
        assert!(matches!(result, Err(ConfigError::Load { .. })));
    }

    #[test]
    fn test_from_vars_filters_unrelated() {
        let registry = ProfileLoader::from_vars(vec![
            ("ILLDB_LIVE_HOST".to_string(), "h".to_string()),
            ("ILLDB_LIVE_PORT".to_string(), "1".to_string()),
            ("ILLDB_LIVE_USER".to_string(), "u".to_string()),
            ("ILLDB_LIVE_PWD".to_string(), "p".to_string()),
            ("ILLDB_LOG_FORMAT".to_string(), "json".to_string()),
            ("ILLDB_BROWSER".to_string(), "python".to_string()),
            ("PATH".to_string(), "/usr/bin".to_string()),
        ]);

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.profile_names(), vec!["LIVE".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_from_env_skips_non_utf8_variables() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var("ILLDB_LOADER_UNRELATED", OsStr::from_bytes(b"f\xffo"));
        std::env::set_var(OsStr::from_bytes(b"ILLDB_\xff_HOST"), "h");
        std::env::set_var("ILLDB_ENVLOADER_HOST", "env-host");
        std::env::set_var("ILLDB_ENVLOADER_PORT", "3306");
        std::env::set_var("ILLDB_ENVLOADER_USER", "u");
        std::env::set_var("ILLDB_ENVLOADER_PWD", "p");

        let registry = ProfileLoader::from_env();

        assert_eq!(registry.lookup("envloader").unwrap().host, "env-host");
    }

    #[test]
    fn test_env_overlays_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "profiles.toml",
            "[live]\nhost = \"db1\"\nport = 1\nuser = \"u\"\npwd = \"p\"\n",
        );

        let registry = ProfileLoader::from_file(&path)
            .unwrap()
            .overlay(ProfileLoader::from_vars(vec![(
                "ILLDB_LIVE_HOST".to_string(),
                "db9".to_string(),
            )]));

        assert_eq!(registry.lookup("live").unwrap().host, "db9");
    }
}
