//! User registry backed by a JSON file
//!
//! Gates the assistant section of the dashboard: a caller is "registered"
//! when their email is on file. Emails are unique case-insensitively and
//! passwords are stored as SHA-256 digests.

use {
    chrono::Utc,
    serde::{Deserialize, Serialize},
    sha2::{Digest, Sha256},
    std::{fs, path::PathBuf},
};

#[derive(Debug)]
pub enum RegistryError {
    DuplicateEmail(String),
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::Io(err)
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err)
    }
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateEmail(email) => {
                write!(f, "An account with email {} already exists", email)
            }
            RegistryError::Io(e) => write!(f, "IO error: {}", e),
            RegistryError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionTier {
    Monthly,
    Lifetime,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Monthly => "5/month",
            SubscriptionTier::Lifetime => "50/lifetime",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub subscription: SubscriptionTier,
    pub registered_at: String,
}

pub struct UserRegistry {
    file_path: PathBuf,
    users: Vec<UserRecord>,
}

impl UserRegistry {
    /// Open the registry at `file_path`. A missing or unreadable file
    /// yields an empty registry rather than an error.
    pub fn load(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let users = match fs::read_to_string(&file_path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Unreadable registry file {}: {}", file_path.display(), e);
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };
        Self { file_path, users }
    }

    /// Case-insensitive email lookup.
    pub fn exists(&self, email: &str) -> bool {
        self.users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Add a user and persist immediately. Duplicate emails are rejected.
    pub fn register(
        &mut self,
        full_name: &str,
        email: &str,
        password: &str,
        subscription: SubscriptionTier,
    ) -> Result<(), RegistryError> {
        if self.exists(email) {
            return Err(RegistryError::DuplicateEmail(email.to_string()));
        }

        self.users.push(UserRecord {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password),
            subscription,
            registered_at: Utc::now().to_rfc3339(),
        });
        self.save()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn save(&self) -> Result<(), RegistryError> {
        let json = serde_json::to_string_pretty(&self.users)?;
        fs::write(&self.file_path, json)?;
        log::debug!(
            "Saved {} users to {}",
            self.users.len(),
            self.file_path.display()
        );
        Ok(())
    }
}

/// SHA-256 hex digest of the password.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_registry() -> (tempfile::TempDir, UserRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = UserRegistry::load(dir.path().join("users.json"));
        (dir, registry)
    }

    #[test]
    fn test_missing_file_yields_empty_registry() {
        let (_dir, registry) = temp_registry();
        assert!(registry.is_empty());
        assert!(!registry.exists("nobody@example.com"));
    }

    #[test]
    fn test_register_and_lookup() {
        let (_dir, mut registry) = temp_registry();

        registry
            .register("Amina Odhiambo", "amina@example.com", "s3cret", SubscriptionTier::Monthly)
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.exists("amina@example.com"));
        assert!(registry.exists("AMINA@EXAMPLE.COM"));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (_dir, mut registry) = temp_registry();
        registry
            .register("Amina Odhiambo", "amina@example.com", "s3cret", SubscriptionTier::Monthly)
            .unwrap();

        let result = registry.register(
            "Another Amina",
            "Amina@Example.com",
            "other",
            SubscriptionTier::Lifetime,
        );

        assert!(matches!(result, Err(RegistryError::DuplicateEmail(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        {
            let mut registry = UserRegistry::load(&path);
            registry
                .register("Brian Kip", "brian@example.com", "hunter2", SubscriptionTier::Lifetime)
                .unwrap();
        }

        let reloaded = UserRegistry::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.exists("brian@example.com"));
    }

    #[test]
    fn test_password_stored_hashed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let mut registry = UserRegistry::load(&path);
        registry
            .register("Brian Kip", "brian@example.com", "password", SubscriptionTier::Monthly)
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("\"password\""));
        assert!(raw.contains(
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        ));
    }

    #[test]
    fn test_subscription_tier_labels() {
        assert_eq!(SubscriptionTier::Monthly.as_str(), "5/month");
        assert_eq!(SubscriptionTier::Lifetime.as_str(), "50/lifetime");
    }

    #[test]
    fn test_hash_password_known_digest() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }
}
