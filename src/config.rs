//! Runtime configuration loaded from the environment (`.env` via dotenvy).
//!
//! The resolver's constant tables (ladders, thresholds, scrape interval) live here
//! rather than in code, since dashboards disagree on them.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::core::util::ladder::Ladder;
use crate::core::util::query_duration::QueryDuration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Grid, in seconds, that start/end timestamps are floored to.
    pub alignment_secs: u64,
    /// Width a zero-width aligned range is widened to.
    pub min_range_secs: u64,
    pub step_ladder: Ladder,
    pub rate_ladder: Ladder,
    pub step_target_points: u32,
    pub rate_target_points: u32,
    pub scrape_interval_secs: u64,
    /// Size of one `jitter_units` increment.
    pub jitter_unit: QueryDuration,
    /// Jitter clamp, as a percentage of the snapped step.
    pub max_jitter_percent: u64,
    pub step_raw_below: QueryDuration,
    pub step_medium_below: QueryDuration,
    pub range_raw_below: QueryDuration,
    pub range_medium_max: QueryDuration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            alignment_secs: 1,
            min_range_secs: 3_600,
            step_ladder: Ladder::default_step(),
            rate_ladder: Ladder::default_rate(),
            step_target_points: 150,
            rate_target_points: 200,
            scrape_interval_secs: 15,
            jitter_unit: QueryDuration::from_millis(100),
            max_jitter_percent: 20,
            step_raw_below: QueryDuration::from_millis(150_000),
            step_medium_below: QueryDuration::from_millis(1_800_000),
            range_raw_below: QueryDuration::from_hours(12),
            range_medium_max: QueryDuration::from_days(7),
        }
    }
}

impl ResolverConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            alignment_secs: parse_var(&lookup, "RESOLVER_ALIGNMENT_SECS", defaults.alignment_secs)?,
            min_range_secs: parse_var(&lookup, "RESOLVER_MIN_RANGE_SECS", defaults.min_range_secs)?,
            step_ladder: parse_var(&lookup, "RESOLVER_STEP_LADDER", defaults.step_ladder)?,
            rate_ladder: parse_var(&lookup, "RESOLVER_RATE_LADDER", defaults.rate_ladder)?,
            step_target_points: parse_var(
                &lookup,
                "RESOLVER_STEP_TARGET_POINTS",
                defaults.step_target_points,
            )?,
            rate_target_points: parse_var(
                &lookup,
                "RESOLVER_RATE_TARGET_POINTS",
                defaults.rate_target_points,
            )?,
            scrape_interval_secs: parse_var(
                &lookup,
                "RESOLVER_SCRAPE_INTERVAL_SECS",
                defaults.scrape_interval_secs,
            )?,
            jitter_unit: parse_var(&lookup, "RESOLVER_JITTER_UNIT", defaults.jitter_unit)?,
            max_jitter_percent: parse_var(
                &lookup,
                "RESOLVER_MAX_JITTER_PERCENT",
                defaults.max_jitter_percent,
            )?,
            step_raw_below: parse_var(&lookup, "RESOLVER_STEP_RAW_BELOW", defaults.step_raw_below)?,
            step_medium_below: parse_var(
                &lookup,
                "RESOLVER_STEP_MEDIUM_BELOW",
                defaults.step_medium_below,
            )?,
            range_raw_below: parse_var(
                &lookup,
                "RESOLVER_RANGE_RAW_BELOW",
                defaults.range_raw_below,
            )?,
            range_medium_max: parse_var(
                &lookup,
                "RESOLVER_RANGE_MEDIUM_MAX",
                defaults.range_medium_max,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.alignment_secs == 0 {
            bail!("RESOLVER_ALIGNMENT_SECS must be at least 1");
        }
        if self.step_target_points == 0 || self.rate_target_points == 0 {
            bail!("target point budgets must be at least 1");
        }
        if self.max_jitter_percent > 100 {
            bail!("RESOLVER_MAX_JITTER_PERCENT must be within 0..=100");
        }
        if self.step_raw_below > self.step_medium_below {
            bail!("RESOLVER_STEP_RAW_BELOW must not exceed RESOLVER_STEP_MEDIUM_BELOW");
        }
        if self.range_raw_below > self.range_medium_max {
            bail!("RESOLVER_RANGE_RAW_BELOW must not exceed RESOLVER_RANGE_MEDIUM_MAX");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Base URL of the Prometheus/Thanos query API. Proxy endpoints are off when unset.
    pub metrics_backend_url: Option<String>,
    pub log_dir: PathBuf,
    pub resolver: ResolverConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "SERVER_PORT", 3000)?,
        };

        let metrics_backend_url = lookup("METRICS_BACKEND_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());

        let log_dir = lookup("LOG_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));

        Ok(Self {
            server,
            metrics_backend_url,
            log_dir,
            resolver: ResolverConfig::from_lookup(&lookup)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: '{raw}'")),
        _ => Ok(default),
    }
}
