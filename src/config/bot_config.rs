// Runtime configuration, read from the environment (and `.env`, via dotenv).

use crate::core::leveling::DayBoundary;
use anyhow::{bail, Result};
use chrono::FixedOffset;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_FILE: &str = "user_data.json";
pub const DEFAULT_SAVE_INTERVAL_SECS: u64 = 5 * 60;

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// Where the progression snapshot is read from and written to.
    pub data_file: PathBuf,
    /// How often the progression snapshot is flushed.
    pub save_interval: Duration,
    /// Calendar used for the daily bonus. The host's local day unless
    /// `XP_DAY_UTC_OFFSET_MINUTES` pins a fixed offset.
    pub day_boundary: DayBoundary,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = match lookup("DISCORD_TOKEN") {
            Some(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => bail!(
                "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token."
            ),
        };

        let data_file = lookup("XP_DATA_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let save_interval_secs = match lookup("SAVE_INTERVAL_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(value = %raw, "Invalid SAVE_INTERVAL_SECS, using default");
                    DEFAULT_SAVE_INTERVAL_SECS
                }
            },
            None => DEFAULT_SAVE_INTERVAL_SECS,
        };

        let day_boundary = match lookup("XP_DAY_UTC_OFFSET_MINUTES") {
            Some(raw) if !raw.trim().is_empty() => match parse_utc_offset(&raw) {
                Some(offset) => DayBoundary::Fixed(offset),
                None => {
                    tracing::warn!(value = %raw, "Invalid XP_DAY_UTC_OFFSET_MINUTES, using local time");
                    DayBoundary::Local
                }
            },
            _ => DayBoundary::Local,
        };

        Ok(Self {
            token,
            data_file,
            save_interval: Duration::from_secs(save_interval_secs),
            day_boundary,
        })
    }
}

fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let minutes = raw.trim().parse::<i32>().ok()?;
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<BotConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.data_file, PathBuf::from("user_data.json"));
        assert_eq!(config.save_interval, Duration::from_secs(300));
        assert_eq!(config.day_boundary, DayBoundary::Local);
    }

    #[test]
    fn day_offset_pins_the_bonus_calendar() {
        let eastern = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("XP_DAY_UTC_OFFSET_MINUTES", "-240"),
        ])
        .unwrap();
        let junk = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("XP_DAY_UTC_OFFSET_MINUTES", "99999"),
        ])
        .unwrap();

        assert_eq!(
            eastern.day_boundary,
            DayBoundary::Fixed(FixedOffset::west_opt(4 * 3600).unwrap())
        );
        assert_eq!(junk.day_boundary, DayBoundary::Local);
    }

    #[test]
    fn overrides_are_respected() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("XP_DATA_FILE", "data/xp.json"),
            ("SAVE_INTERVAL_SECS", "60"),
        ])
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("data/xp.json"));
        assert_eq!(config.save_interval, Duration::from_secs(60));
    }

    #[test]
    fn bad_interval_falls_back_to_default() {
        let zero = config_from(&[("DISCORD_TOKEN", "abc"), ("SAVE_INTERVAL_SECS", "0")]).unwrap();
        let junk = config_from(&[("DISCORD_TOKEN", "abc"), ("SAVE_INTERVAL_SECS", "soon")]).unwrap();

        assert_eq!(zero.save_interval, Duration::from_secs(300));
        assert_eq!(junk.save_interval, Duration::from_secs(300));
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }
}
