//! Server configuration
//!
//! Built once at startup from Shuttle secrets and handed to every service.
//! Nothing below the routes reads the environment directly.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use marquee::{DomainError, MAX_BATCH_WRITES};

/// Backfill page size in production
pub const DEFAULT_PAGE_LIMIT: usize = 400;
/// Backfill page size when running emulated
pub const EMULATED_PAGE_LIMIT: usize = 3;
/// Dimension of stub vectors when none is configured
pub const STUB_DIMENSION: usize = 16;

/// Which embedding provider to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Vertex,
    Stub,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "vertex" | "vertexai" => Ok(ProviderKind::Vertex),
            "stub" => Ok(ProviderKind::Stub),
            _ => Err(format!("Unknown embedding provider: {}", s)),
        }
    }
}

/// Which catalog store backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(format!("Unknown catalog store: {}", s)),
        }
    }
}

/// Vertex AI connection settings
#[derive(Debug, Clone)]
pub struct VertexSettings {
    pub project_id: String,
    pub location: String,
    pub access_token: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Running against emulated infrastructure (small pages, stub provider)
    pub emulated: bool,
    /// Items fetched per backfill invocation
    pub page_limit: usize,
    /// Mutations per import commit
    pub batch_size: usize,
    /// CSV file loaded by `/import`
    pub source_path: PathBuf,
    pub provider: ProviderKind,
    /// Required vector length, if known
    pub embedding_dimension: Option<usize>,
    pub store: StoreKind,
    /// Wall-clock budget for one backfill invocation
    pub invocation_budget: Duration,
    /// Upper bound on one provider call
    pub provider_timeout: Duration,
    pub openai_api_key: Option<String>,
    pub vertex: Option<VertexSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            emulated: false,
            page_limit: DEFAULT_PAGE_LIMIT,
            batch_size: MAX_BATCH_WRITES,
            source_path: PathBuf::from("data/data.csv"),
            provider: ProviderKind::OpenAi,
            embedding_dimension: None,
            store: StoreKind::Postgres,
            invocation_budget: Duration::from_secs(530),
            provider_timeout: Duration::from_secs(30),
            openai_api_key: None,
            vertex: None,
        }
    }
}

impl AppConfig {
    /// Defaults for local runs against emulated services
    pub fn emulated() -> Self {
        Self {
            emulated: true,
            page_limit: EMULATED_PAGE_LIMIT,
            provider: ProviderKind::Stub,
            ..Self::default()
        }
    }

    /// Build from a key lookup (Shuttle `SecretStore::get` in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let emulated = parse_opt::<bool>(&lookup, "MARQUEE_EMULATED")?.unwrap_or(false);
        let mut config = if emulated {
            Self::emulated()
        } else {
            Self::default()
        };

        if let Some(limit) = parse_opt::<usize>(&lookup, "BACKFILL_PAGE_LIMIT")? {
            config.page_limit = limit;
        }
        if let Some(size) = parse_opt::<usize>(&lookup, "IMPORT_BATCH_SIZE")? {
            config.batch_size = size;
        }
        if let Some(path) = lookup("CATALOG_SOURCE_PATH") {
            config.source_path = PathBuf::from(path);
        }
        if let Some(provider) = parse_opt::<ProviderKind>(&lookup, "EMBEDDING_PROVIDER")? {
            config.provider = provider;
        }
        config.embedding_dimension = parse_opt::<usize>(&lookup, "EMBEDDING_DIMENSION")?;
        if let Some(store) = parse_opt::<StoreKind>(&lookup, "CATALOG_STORE")? {
            config.store = store;
        }
        if let Some(secs) = parse_opt::<u64>(&lookup, "INVOCATION_BUDGET_SECS")? {
            config.invocation_budget = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_opt::<u64>(&lookup, "PROVIDER_TIMEOUT_SECS")? {
            config.provider_timeout = Duration::from_secs(secs);
        }

        config.openai_api_key = lookup("OPENAI_API_KEY");
        config.vertex = match (lookup("VERTEX_PROJECT_ID"), lookup("VERTEX_ACCESS_TOKEN")) {
            (Some(project_id), Some(access_token)) => Some(VertexSettings {
                project_id,
                location: lookup("VERTEX_LOCATION").unwrap_or_else(|| "us-central1".to_string()),
                access_token,
            }),
            _ => None,
        };

        config.validate()?;
        Ok(config)
    }

    /// Whether embeddings come from the offline stub
    pub fn use_stub_provider(&self) -> bool {
        self.provider == ProviderKind::Stub
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.page_limit == 0 || self.page_limit > MAX_BATCH_WRITES {
            return Err(DomainError::Config(format!(
                "BACKFILL_PAGE_LIMIT must be between 1 and {}",
                MAX_BATCH_WRITES
            )));
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_WRITES {
            return Err(DomainError::Config(format!(
                "IMPORT_BATCH_SIZE must be between 1 and {}",
                MAX_BATCH_WRITES
            )));
        }
        if self.embedding_dimension == Some(0) {
            return Err(DomainError::Config(
                "EMBEDDING_DIMENSION must be at least 1".to_string(),
            ));
        }
        match self.provider {
            ProviderKind::OpenAi if self.openai_api_key.is_none() => Err(DomainError::Config(
                "EMBEDDING_PROVIDER=openai requires OPENAI_API_KEY".to_string(),
            )),
            ProviderKind::Vertex if self.vertex.is_none() => Err(DomainError::Config(
                "EMBEDDING_PROVIDER=vertex requires VERTEX_PROJECT_ID and VERTEX_ACCESS_TOKEN"
                    .to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn parse_opt<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| DomainError::Config(format!("Invalid {}: {}", key, e)))
        })
        .transpose()
}
