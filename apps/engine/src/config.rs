use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::cv::ExtractionLimits;
use crate::harvester::HarvesterConfig;
use crate::matching::{MatchWeights, VectorizerKind};

/// Application configuration loaded from environment variables.
/// Everything has a development default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub app_env: AppEnv,
    pub redis_url: Option<String>,
    pub encryption_key: Option<String>,
    pub extraction: ExtractionLimits,
    pub harvester: HarvesterConfig,
    pub match_weights: MatchWeights,
    pub vectorizer: VectorizerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn as_str(self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
        }
    }
}

impl FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" | "test" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            other => bail!("unknown APP_ENV '{other}'"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let harvester_defaults = HarvesterConfig::default();
        let extraction_defaults = ExtractionLimits::default();
        let weight_defaults = MatchWeights::default();

        let harvester = HarvesterConfig {
            base_url: env_or("HARVESTER_BASE_URL", harvester_defaults.base_url)?,
            source: env_or("HARVESTER_SOURCE", harvester_defaults.source)?,
            min_delay: env_secs("HARVESTER_MIN_DELAY", harvester_defaults.min_delay)?,
            max_delay: env_secs("HARVESTER_MAX_DELAY", harvester_defaults.max_delay)?,
            max_retries: env_or("HARVESTER_MAX_RETRIES", harvester_defaults.max_retries)?,
            pool_max: env_or("HARVESTER_POOL_MAX", harvester_defaults.pool_max)?,
            keepalive_max: env_or("HARVESTER_KEEPALIVE_MAX", harvester_defaults.keepalive_max)?,
            timeout: Duration::from_secs(env_or(
                "HARVESTER_TIMEOUT_SECS",
                harvester_defaults.timeout.as_secs(),
            )?),
            contact_placeholder: env_or(
                "HARVESTER_CONTACT_PLACEHOLDER",
                harvester_defaults.contact_placeholder,
            )?,
        };
        if harvester.min_delay > harvester.max_delay {
            bail!("HARVESTER_MIN_DELAY must not exceed HARVESTER_MAX_DELAY");
        }

        Ok(Config {
            port: env_or("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info".to_string())?,
            app_env: env_or("APP_ENV", AppEnv::Development)?,
            redis_url: optional_env("REDIS_URL"),
            encryption_key: optional_env("ENCRYPTION_KEY"),
            extraction: ExtractionLimits {
                max_skills: env_or("MAX_SKILLS_EXTRACTED", extraction_defaults.max_skills)?,
                max_soft_skills: env_or(
                    "MAX_SOFT_SKILLS_EXTRACTED",
                    extraction_defaults.max_soft_skills,
                )?,
                max_projects: env_or("MAX_PROJECTS_EXTRACTED", extraction_defaults.max_projects)?,
            },
            harvester,
            match_weights: MatchWeights {
                skills: env_or("MATCH_WEIGHT_SKILLS", weight_defaults.skills)?,
                projects: env_or("MATCH_WEIGHT_PROJECTS", weight_defaults.projects)?,
            }
            .normalized(),
            vectorizer: env_or("MATCH_VECTORIZER", VectorizerKind::default())?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Environment variable '{key}' is invalid: {e}")),
        None => Ok(default),
    }
}

/// Fractional seconds; negative, NaN or infinite values are rejected.
fn env_secs(key: &str, default: Duration) -> Result<Duration> {
    let secs = env_or(key, default.as_secs_f64())?;
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("Environment variable '{key}' is invalid: {secs} is not a duration"))
}
