// Profile Domain Model
// A profile is one backend environment's connection parameters

use std::fmt;

/// Prefix shared by every profile definition key
pub const DEFINITION_PREFIX: &str = "ILLDB_";

/// The four fields a profile must define, with their definition key suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileField {
    Host,
    Port,
    User,
    Password,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Host,
        ProfileField::Port,
        ProfileField::User,
        ProfileField::Password,
    ];

    /// Definition key suffix (e.g. `_HOST`)
    pub fn suffix(&self) -> &'static str {
        match self {
            ProfileField::Host => "_HOST",
            ProfileField::Port => "_PORT",
            ProfileField::User => "_USER",
            ProfileField::Password => "_PWD",
        }
    }

    /// Split a definition key into (profile namespace, field)
    ///
    /// `ILLDB_STAGING_EU_PORT` -> `("STAGING_EU", Port)`.
    /// Returns None for keys outside the profile namespace.
    pub fn parse_key(key: &str) -> Option<(&str, ProfileField)> {
        let rest = key.strip_prefix(DEFINITION_PREFIX)?;
        Self::ALL.iter().find_map(|field| {
            rest.strip_suffix(field.suffix())
                .filter(|name| !name.is_empty())
                .map(|name| (name, *field))
        })
    }
}

/// Build the definition key for a profile field
///
/// The profile name is uppercased: `definition_key("live", Host)` is `ILLDB_LIVE_HOST`.
pub fn definition_key(profile: &str, field: ProfileField) -> String {
    format!(
        "{}{}{}",
        DEFINITION_PREFIX,
        profile.to_uppercase(),
        field.suffix()
    )
}

/// Resolved profile (all four fields present)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
}

impl Profile {
    pub fn descriptor(&self) -> ConnectionDescriptor {
        ConnectionDescriptor {
            host: self.host.clone(),
            port: self.port.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

/// Connection parameters handed to the browser tool on every call
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    host: String,
    port: String,
    user: String,
    password: String,
}

impl ConnectionDescriptor {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Argument fragment: `--host <h> --port <p> -u <user> -p <pwd>`
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--host".to_string(),
            self.host.clone(),
            "--port".to_string(),
            self.port.clone(),
            "-u".to_string(),
            self.user.clone(),
            "-p".to_string(),
            self.password.clone(),
        ]
    }

    /// Full fragment as a single line, password included
    pub fn render(&self) -> String {
        self.to_args().join(" ")
    }
}

// Display and Debug mask the password so descriptors are safe to log
impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "--host {} --port {} -u {} -p ****",
            self.host, self.port, self.user
        )
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Profile {
        Profile {
            name: "LIVE".to_string(),
            host: "db1.internal".to_string(),
            port: "3306".to_string(),
            user: "reader".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_definition_key_uppercases_profile() {
        assert_eq!(definition_key("live", ProfileField::Host), "ILLDB_LIVE_HOST");
        assert_eq!(
            definition_key("missing_profile", ProfileField::Password),
            "ILLDB_MISSING_PROFILE_PWD"
        );
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(
            ProfileField::parse_key("ILLDB_STAGING_EU_PORT"),
            Some(("STAGING_EU", ProfileField::Port))
        );
        assert_eq!(
            ProfileField::parse_key("ILLDB_LIVE_PWD"),
            Some(("LIVE", ProfileField::Password))
        );
        assert_eq!(ProfileField::parse_key("ILLDB_LOG_FORMAT"), None);
        assert_eq!(ProfileField::parse_key("ILLDB__HOST"), None);
        assert_eq!(ProfileField::parse_key("PATH"), None);
    }

    #[test]
    fn test_descriptor_flag_format() {
        let descriptor = sample().descriptor();

        assert_eq!(
            descriptor.render(),
            "--host db1.internal --port 3306 -u reader -p s3cret"
        );
        assert_eq!(descriptor.to_args().len(), 8);
    }

    #[test]
    fn test_descriptor_display_masks_password() {
        let descriptor = sample().descriptor();

        assert!(!descriptor.to_string().contains("s3cret"));
        assert!(!format!("{:?}", descriptor).contains("s3cret"));
        assert!(descriptor.to_string().contains("db1.internal"));
    }
}
