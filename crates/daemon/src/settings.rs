//! Daemon settings, read from `BATCHQ_*` environment variables

use batchq_api_rpc::server::RpcServerConfig;
use batchq_core::QueueConfig;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub queue: QueueConfig,
    pub rpc_host: String,
    pub rpc_port: u16,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or unparsable values fall
    /// back to their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = QueueConfig::default();
        let rpc_defaults = RpcServerConfig::default();

        let queue = QueueConfig {
            capacity: parse_or(&lookup, "BATCHQ_CAPACITY", defaults.capacity),
            drain_batch_size: parse_or(
                &lookup,
                "BATCHQ_DRAIN_BATCH_SIZE",
                defaults.drain_batch_size,
            ),
            idle_interval: millis_or(&lookup, "BATCHQ_IDLE_INTERVAL_MS", defaults.idle_interval),
            catch_up_interval: millis_or(
                &lookup,
                "BATCHQ_CATCH_UP_INTERVAL_MS",
                defaults.catch_up_interval,
            ),
        };

        Self {
            queue,
            rpc_host: lookup("BATCHQ_RPC_HOST").unwrap_or(rpc_defaults.host),
            rpc_port: parse_or(&lookup, "BATCHQ_RPC_PORT", rpc_defaults.port),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring invalid setting, using default");
            default
        }),
        None => default,
    }
}

fn millis_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    Duration::from_millis(parse_or(lookup, key, default.as_millis() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = settings_from(&[]);

        assert_eq!(settings.queue, QueueConfig::default());
        assert_eq!(settings.rpc_host, "127.0.0.1");
        assert_eq!(settings.rpc_port, 9630);

        let rpc = RpcServerConfig::default();
        assert_eq!((settings.rpc_host, settings.rpc_port), (rpc.host, rpc.port));
    }

    #[test]
    fn test_zero_interval_is_raw_until_normalized() {
        let settings = settings_from(&[("BATCHQ_IDLE_INTERVAL_MS", "0")]);

        // The daemon logs the built queue's config, which is the normalized one
        assert_eq!(settings.queue.idle_interval, Duration::ZERO);
        assert_eq!(
            settings.queue.normalized().idle_interval,
            QueueConfig::default().idle_interval
        );
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("BATCHQ_CAPACITY", "50"),
            ("BATCHQ_DRAIN_BATCH_SIZE", "5"),
            ("BATCHQ_IDLE_INTERVAL_MS", "250"),
            ("BATCHQ_CATCH_UP_INTERVAL_MS", " 10 "),
            ("BATCHQ_RPC_PORT", "0"),
        ]);

        assert_eq!(settings.queue.capacity, 50);
        assert_eq!(settings.queue.drain_batch_size, 5);
        assert_eq!(settings.queue.idle_interval, Duration::from_millis(250));
        assert_eq!(settings.queue.catch_up_interval, Duration::from_millis(10));
        assert_eq!(settings.rpc_port, 0);
    }

    #[test]
    fn test_invalid_value_falls_back() {
        let settings = settings_from(&[("BATCHQ_CAPACITY", "lots"), ("BATCHQ_RPC_PORT", "99999")]);

        assert_eq!(settings.queue.capacity, QueueConfig::default().capacity);
        assert_eq!(settings.rpc_port, 9630);
    }
}
