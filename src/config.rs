use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

pub const ONE_DAY: Duration = Duration::from_secs(24 * 3600);

/// Longest validity SigV4 presigning accepts.
pub const MAX_SIGNED_URL_EXPIRATION: Duration = Duration::from_secs(7 * 24 * 3600);

/// Connection and caching settings for one facade instance.
///
/// Built once at startup and handed to the clients by reference; nothing
/// here is shared mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Object-store service identifier. Only `s3` is accepted.
    pub service_name: String,
    /// Custom endpoint for S3-compatible services. `None` uses AWS.
    pub endpoint_url: Option<String>,
    pub bucket: String,
    pub region: String,
    /// Attempts per store request, including the first one.
    pub max_attempts: u32,
    /// Redis host; the port is always 6379.
    pub cache_host: String,
    /// Validity window baked into generated signed URLs.
    pub signed_url_expiration: Duration,
    /// How long signed URLs and metadata stay in the cache.
    pub cache_ttl: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            service_name: "s3".into(),
            endpoint_url: None,
            bucket: String::new(),
            region: "ru-central1".into(),
            max_attempts: 3,
            cache_host: "localhost".into(),
            signed_url_expiration: 2 * ONE_DAY,
            cache_ttl: ONE_DAY,
        }
    }
}

impl StorageConfig {
    /// A cached URL must never outlive the URL itself, and the URL validity
    /// must be one the store can actually sign.
    pub fn validate(&self) -> Result<()> {
        if self.signed_url_expiration > MAX_SIGNED_URL_EXPIRATION {
            anyhow::bail!(
                "signed URL validity ({}s) exceeds the presigning limit of {}s",
                self.signed_url_expiration.as_secs(),
                MAX_SIGNED_URL_EXPIRATION.as_secs()
            );
        }
        if self.cache_ttl > self.signed_url_expiration {
            anyhow::bail!(
                "cache TTL ({}s) exceeds signed URL validity ({}s)",
                self.cache_ttl.as_secs(),
                self.signed_url_expiration.as_secs()
            );
        }
        if self.max_attempts == 0 {
            anyhow::bail!("max attempts must be at least 1");
        }
        Ok(())
    }
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Serve from the in-process store and cache instead of S3 and Redis.
    pub in_memory: bool,
    pub storage: StorageConfig,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Cache-accelerated gateway over an S3-compatible bucket")]
pub struct Args {
    /// Host to bind to (overrides CACHED_STORE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides CACHED_STORE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Object store service name (overrides S3_SERVICE_NAME)
    #[arg(long)]
    pub service_name: Option<String>,

    /// Object store endpoint URL (overrides S3_ENDPOINT_URL)
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Bucket holding the objects (overrides S3_BUCKET)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Object store region (overrides S3_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Redis host (overrides REDIS_HOST)
    #[arg(long)]
    pub cache_host: Option<String>,

    /// Signed URL validity in seconds (overrides SIGNED_URL_EXPIRATION_SECS)
    #[arg(long)]
    pub signed_url_expiration_secs: Option<u64>,

    /// Cache TTL in seconds (overrides CACHE_TTL_SECS)
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,

    /// Use the in-process store and cache
    #[arg(long)]
    pub in_memory: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let defaults = StorageConfig::default();

        // --- Environment fallback ---
        let env_host = env::var("CACHED_STORE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = env_parse("CACHED_STORE_PORT", 3000u16)?;
        let env_service = env::var("S3_SERVICE_NAME").unwrap_or(defaults.service_name);
        let env_endpoint = env::var("S3_ENDPOINT_URL").ok().filter(|v| !v.is_empty());
        let env_bucket = env::var("S3_BUCKET").unwrap_or(defaults.bucket);
        let env_region = env::var("S3_REGION").unwrap_or(defaults.region);
        let env_attempts = env_parse("S3_MAX_ATTEMPTS", defaults.max_attempts)?;
        let env_cache_host = env::var("REDIS_HOST").unwrap_or(defaults.cache_host);
        let env_expiration = env_parse(
            "SIGNED_URL_EXPIRATION_SECS",
            defaults.signed_url_expiration.as_secs(),
        )?;
        let env_ttl = env_parse("CACHE_TTL_SECS", defaults.cache_ttl.as_secs())?;

        // --- Merge ---
        let storage = StorageConfig {
            service_name: args.service_name.unwrap_or(env_service),
            endpoint_url: args.endpoint_url.or(env_endpoint),
            bucket: args.bucket.unwrap_or(env_bucket),
            region: args.region.unwrap_or(env_region),
            max_attempts: env_attempts,
            cache_host: args.cache_host.unwrap_or(env_cache_host),
            signed_url_expiration: Duration::from_secs(
                args.signed_url_expiration_secs.unwrap_or(env_expiration),
            ),
            cache_ttl: Duration::from_secs(args.cache_ttl_secs.unwrap_or(env_ttl)),
        };
        storage.validate()?;

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            in_memory: args.in_memory,
            storage,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|err| anyhow::anyhow!("{}", err))
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_cache_inside_url_window() {
        let cfg = StorageConfig::default();
        assert_eq!(cfg.signed_url_expiration, Duration::from_secs(172_800));
        assert_eq!(cfg.cache_ttl, Duration::from_secs(86_400));
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_cache_ttl_longer_than_url_validity() {
        let cfg = StorageConfig {
            cache_ttl: 3 * ONE_DAY,
            ..StorageConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn url_validity_is_capped_at_seven_days() {
        let at_limit = StorageConfig {
            signed_url_expiration: Duration::from_secs(604_800),
            ..StorageConfig::default()
        };
        at_limit.validate().unwrap();

        let args = Args {
            signed_url_expiration_secs: Some(604_801),
            ..Args::default()
        };
        let err = AppConfig::from_args(args).unwrap_err();
        assert!(err.to_string().contains("presigning limit"));
    }

    #[test]
    fn cli_arguments_override_defaults() {
        let args = Args {
            host: Some("127.0.0.1".into()),
            port: Some(8080),
            bucket: Some("media".into()),
            endpoint_url: Some("https://storage.example.net".into()),
            cache_ttl_secs: Some(600),
            in_memory: true,
            ..Args::default()
        };
        let cfg = AppConfig::from_args(args).unwrap();
        assert_eq!(cfg.addr(), "127.0.0.1:8080");
        assert!(cfg.in_memory);
        assert_eq!(cfg.storage.bucket, "media");
        assert_eq!(
            cfg.storage.endpoint_url.as_deref(),
            Some("https://storage.example.net")
        );
        assert_eq!(cfg.storage.cache_ttl, Duration::from_secs(600));
    }

    #[test]
    fn cli_values_are_validated() {
        let args = Args {
            signed_url_expiration_secs: Some(60),
            cache_ttl_secs: Some(120),
            ..Args::default()
        };
        assert!(AppConfig::from_args(args).is_err());
    }
}
