//! Process configuration read from `ONO_*` environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::rules::DEFAULT_DISCARD_RECYCLE_THRESHOLD;
use crate::domain::{derive_shuffle_seed, shuffle_rng, RuleSettings, ShuffleRng};
use crate::error::AppError;

/// Long-poll timing for one class of viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTier {
    pub interval: Duration,
    pub attempts: u32,
}

/// The slice of configuration the services need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub rules: RuleSettings,
    /// Delay between a win and the room's deletion.
    pub cleanup_delay: Duration,
    pub idle_ttl: Duration,
    pub sweep_interval: Duration,
    pub participant_poll: PollTier,
    pub spectator_poll: PollTier,
    /// Fixed base seed; `None` seeds each shuffle from the OS.
    pub shuffle_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules: RuleSettings::default(),
            cleanup_delay: Duration::from_secs(10),
            idle_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(60),
            participant_poll: PollTier {
                interval: Duration::from_millis(1000),
                attempts: 15,
            },
            spectator_poll: PollTier {
                interval: Duration::from_millis(2000),
                attempts: 5,
            },
            shuffle_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn poll_tier(&self, spectator: bool) -> PollTier {
        if spectator {
            self.spectator_poll
        } else {
            self.participant_poll
        }
    }

    /// RNG for one mutation of `room_code` at `state_version`.
    pub fn rng_for(&self, room_code: &str, state_version: u64) -> ShuffleRng {
        shuffle_rng(
            self.shuffle_seed
                .map(|base| derive_shuffle_seed(base, room_code, state_version)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_json_payload: usize,
    /// Allowed browser origins; empty allows any.
    pub cors_origins: Vec<String>,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            rules: RuleSettings {
                uno_grace: time::Duration::milliseconds(parse_or("ONO_UNO_GRACE_MS", 2000i64)?),
                discard_recycle_threshold: parse_or(
                    "ONO_DISCARD_RECYCLE_THRESHOLD",
                    DEFAULT_DISCARD_RECYCLE_THRESHOLD,
                )?,
            },
            cleanup_delay: Duration::from_millis(parse_or("ONO_CLEANUP_DELAY_MS", 10_000)?),
            idle_ttl: Duration::from_secs(parse_or("ONO_IDLE_TTL_SECS", 300)?),
            sweep_interval: Duration::from_secs(parse_or("ONO_SWEEP_INTERVAL_SECS", 60)?),
            participant_poll: PollTier {
                interval: Duration::from_millis(parse_or("ONO_POLL_INTERVAL_MS", 1000)?),
                attempts: parse_or("ONO_POLL_ATTEMPTS", defaults.participant_poll.attempts)?,
            },
            spectator_poll: PollTier {
                interval: Duration::from_millis(parse_or("ONO_SPECTATOR_POLL_INTERVAL_MS", 2000)?),
                attempts: parse_or("ONO_SPECTATOR_POLL_ATTEMPTS", defaults.spectator_poll.attempts)?,
            },
            shuffle_seed: parse_opt("ONO_SHUFFLE_SEED")?,
        };

        if engine.sweep_interval.is_zero() {
            return Err(AppError::config("ONO_SWEEP_INTERVAL_SECS must be greater than zero"));
        }

        Ok(Self {
            host: env::var("ONO_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("ONO_PORT", 3001)?,
            max_json_payload: parse_or("ONO_MAX_JSON_PAYLOAD", 16 * 1024)?,
            cors_origins: env::var("ONO_CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            engine,
        })
    }
}

fn parse_opt<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::config(format!("Environment variable '{name}' has an invalid value: {raw}"))
        }),
        Err(_) => Ok(None),
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    Ok(parse_opt(name)?.unwrap_or(default))
}
