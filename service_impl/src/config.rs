use std::env;

use async_trait::async_trait;
use service::{
    config::{Config, ConfigService},
    ServiceError,
};

const DEFAULT_SESSION_LIFETIME_HOURS: i64 = 24;
const MAX_SESSION_LIFETIME_HOURS: i64 = 24 * 365;
const DEFAULT_DASHBOARD_REPORT_LIMIT: usize = 10;

pub struct ConfigServiceImpl;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value {:?} for {}", value, key);
            default
        }),
        Err(_) => default,
    }
}

/// Falls back to the default for lifetimes outside of one hour to one year.
fn bounded_session_lifetime(hours: i64) -> i64 {
    if (1..=MAX_SESSION_LIFETIME_HOURS).contains(&hours) {
        hours
    } else {
        tracing::warn!(
            "Session lifetime of {} hours out of range, using {}",
            hours,
            DEFAULT_SESSION_LIFETIME_HOURS
        );
        DEFAULT_SESSION_LIFETIME_HOURS
    }
}

#[async_trait]
impl ConfigService for ConfigServiceImpl {
    async fn get_config(&self) -> Result<Config, ServiceError> {
        Ok(Config {
            session_lifetime_hours: bounded_session_lifetime(env_or(
                "SESSION_LIFETIME_HOURS",
                DEFAULT_SESSION_LIFETIME_HOURS,
            )),
            dashboard_report_limit: env_or(
                "DASHBOARD_REPORT_LIMIT",
                DEFAULT_DASHBOARD_REPORT_LIMIT,
            ),
        })
    }
}
