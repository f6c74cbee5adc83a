//! Server configuration read from Shuttle secrets

/// XP granted for the first recommendation request of the day
pub const DEFAULT_RECOMMENDATION_BONUS_XP: u64 = 25;

/// Where characters and profiles are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process memory; data is lost on restart
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// Settings resolved at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub api_key: Option<String>,
    pub storage: StorageBackend,
    pub recommendation_bonus_xp: u64,
    pub mirror_url: Option<String>,
    pub mirror_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            storage: StorageBackend::default(),
            recommendation_bonus_xp: DEFAULT_RECOMMENDATION_BONUS_XP,
            mirror_url: None,
            mirror_secret: None,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from a key lookup (e.g. `SecretStore::get`).
    ///
    /// Blank values count as unset; an unparsable bonus falls back to the
    /// default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let recommendation_bonus_xp = match get("RECOMMENDATION_BONUS_XP") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "⚠️  Invalid RECOMMENDATION_BONUS_XP {:?}, using {}",
                    raw,
                    DEFAULT_RECOMMENDATION_BONUS_XP
                );
                DEFAULT_RECOMMENDATION_BONUS_XP
            }),
            None => DEFAULT_RECOMMENDATION_BONUS_XP,
        };

        let storage = match get("LUMINA_STORAGE") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("⚠️  {}, using postgres", e);
                StorageBackend::Postgres
            }),
            None => StorageBackend::Postgres,
        };

        Self {
            api_key: get("LUMINA_API_KEY"),
            storage,
            recommendation_bonus_xp,
            mirror_url: get("MIRROR_URL"),
            mirror_secret: get("MIRROR_SECRET"),
        }
    }
}
