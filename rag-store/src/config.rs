//! Runtime and collection configuration.

use crate::errors::RagError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (the default for policy embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Configuration of the Qdrant-backed policy collection.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Dimensionality of every stored vector.
    pub vector_size: usize,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Client-side timeout for every Qdrant call.
    pub timeout_secs: u64,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl RagConfig {
    /// Creates a default config for a given endpoint and collection.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            vector_size: 1536,
            distance: DistanceKind::Cosine,
            timeout_secs: 30,
            exact_search: false,
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`,
    /// `QDRANT_TIMEOUT_SECS` and `VECTOR_SIZE`, falling back to defaults.
    ///
    /// # Errors
    /// [`RagError::Config`] when a number does not parse or validation fails.
    pub fn from_env() -> Result<Self, RagError> {
        let mut cfg = Self::new_default(
            env_or("QDRANT_URL", "http://localhost:6334"),
            env_or("QDRANT_COLLECTION", "airline_policies"),
        );
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        cfg.vector_size = env_num("VECTOR_SIZE", cfg.vector_size)?;
        cfg.timeout_secs = env_num("QDRANT_TIMEOUT_SECS", cfg.timeout_secs)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.vector_size == 0 {
            return Err(RagError::Config("vector_size must be > 0".into()));
        }
        if self.timeout_secs == 0 {
            return Err(RagError::Config("timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_num<T: std::str::FromStr>(name: &str, default: T) -> Result<T, RagError> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| RagError::Config(format!("{name} must be a positive integer, got '{raw}'"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_cosine() {
        let cfg = RagConfig::new_default("http://localhost:6334", "airline_policies");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.distance, DistanceKind::Cosine);
        assert_eq!(cfg.vector_size, 1536);
    }

    #[test]
    fn zero_vector_size_is_rejected() {
        let mut cfg = RagConfig::new_default("http://localhost:6334", "c");
        cfg.vector_size = 0;
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }

    #[test]
    fn blank_collection_is_rejected() {
        let cfg = RagConfig::new_default("http://localhost:6334", "  ");
        assert!(cfg.validate().is_err());
    }
}
