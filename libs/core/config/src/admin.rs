use crate::{env_required, ConfigError, FromEnv};

/// Reserved administrative account configuration.
///
/// The secret is read from the environment and handed to the auth layer,
/// which hashes it immediately; it is never persisted or compared in
/// plaintext anywhere else. There are intentionally no defaults.
#[derive(Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

impl AdminConfig {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Manual Debug so the secret never lands in logs or error reports.
impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl FromEnv for AdminConfig {
    /// Reads ADMIN_EMAIL and ADMIN_PASSWORD; both are required.
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            email: env_required("ADMIN_EMAIL")?,
            password: env_required("ADMIN_PASSWORD")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_reads_both_variables() {
        temp_env::with_vars(
            [
                ("ADMIN_EMAIL", Some("root@example.com")),
                ("ADMIN_PASSWORD", Some("s3cret")),
            ],
            || {
                let config = AdminConfig::from_env().unwrap();
                assert_eq!(config.email, "root@example.com");
                assert_eq!(config.password, "s3cret");
            },
        );
    }

    #[test]
    fn from_env_requires_email() {
        temp_env::with_vars(
            [
                ("ADMIN_EMAIL", None),
                ("ADMIN_PASSWORD", Some("s3cret")),
            ],
            || {
                let err = AdminConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("ADMIN_EMAIL"));
            },
        );
    }

    #[test]
    fn debug_redacts_the_secret() {
        let config = AdminConfig::new("root@example.com", "s3cret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("root@example.com"));
    }
}
