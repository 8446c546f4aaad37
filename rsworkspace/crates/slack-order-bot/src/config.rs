use std::fmt;
use std::time::Duration;

use crate::env::ReadEnv;
use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_EVENTS_PATH: &str = "/slack/events";
const DEFAULT_INTERACTIONS_PATH: &str = "/slack/interactions";
const DEFAULT_SIGNATURE_MAX_AGE_SECS: u64 = 5 * 60;
const DEFAULT_API_BASE: &str = "https://slack.com";

/// Liveness probe route; neither webhook path may take it.
pub const HEALTH_PATH: &str = "/healthz";

/// Configuration for the order bot.
///
/// Resolved once at startup from environment variables:
/// - `SLACK_SIGNING_SECRET`: signing secret of the Slack app (required)
/// - `SLACK_BOT_TOKEN`: bot user OAuth token, `xoxb-...` (required)
/// - `SLACK_ORDER_BOT_PORT`: HTTP listening port (default: 3000)
/// - `SLACK_EVENTS_PATH`: Events API request URL path (default: `/slack/events`)
/// - `SLACK_INTERACTIONS_PATH`: interactivity request URL path (default: `/slack/interactions`)
/// - `SLACK_SIGNATURE_MAX_AGE_SECS`: accepted request timestamp skew (default: 300)
/// - `SLACK_API_BASE`: Web API base URL (default: `https://slack.com`)
#[derive(Clone)]
pub struct OrderBotConfig {
    pub signing_secret: String,
    pub bot_token: String,
    pub port: u16,
    pub events_path: String,
    pub interactions_path: String,
    pub signature_max_age: Duration,
    pub api_base: String,
}

impl OrderBotConfig {
    pub fn from_env<E: ReadEnv>(env: &E) -> Result<Self, ConfigError> {
        let events_path = route_path(env, "SLACK_EVENTS_PATH", DEFAULT_EVENTS_PATH)?;
        let interactions_path =
            route_path(env, "SLACK_INTERACTIONS_PATH", DEFAULT_INTERACTIONS_PATH)?;
        if interactions_path == events_path {
            return Err(ConfigError::Invalid("SLACK_INTERACTIONS_PATH"));
        }

        Ok(Self {
            signing_secret: required(env, "SLACK_SIGNING_SECRET")?,
            bot_token: required(env, "SLACK_BOT_TOKEN")?,
            port: env
                .var("SLACK_ORDER_BOT_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            events_path,
            interactions_path,
            signature_max_age: Duration::from_secs(
                env.var("SLACK_SIGNATURE_MAX_AGE_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_SIGNATURE_MAX_AGE_SECS),
            ),
            api_base: env
                .var("SLACK_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }
}

impl fmt::Debug for OrderBotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBotConfig")
            .field("signing_secret", &"<redacted>")
            .field("bot_token", &"<redacted>")
            .field("port", &self.port)
            .field("events_path", &self.events_path)
            .field("interactions_path", &self.interactions_path)
            .field("signature_max_age", &self.signature_max_age)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn required<E: ReadEnv>(env: &E, key: &'static str) -> Result<String, ConfigError> {
    env.var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// A webhook route: absolute, static (no captures or wildcards) and not the
/// health route.
fn route_path<E: ReadEnv>(
    env: &E,
    key: &'static str,
    default: &str,
) -> Result<String, ConfigError> {
    let path = env.var(key).unwrap_or_else(|_| default.to_string());
    let is_static = !path.contains(['{', '}', '*', ':']);
    if path.starts_with('/') && is_static && path != HEALTH_PATH {
        Ok(path)
    } else {
        Err(ConfigError::Invalid(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::InMemoryEnv;

    fn base_env() -> InMemoryEnv {
        let env = InMemoryEnv::new();
        env.set("SLACK_SIGNING_SECRET", "signing-secret");
        env.set("SLACK_BOT_TOKEN", "xoxb-test");
        env
    }

    #[test]
    fn defaults_when_only_secrets_set() {
        let config = OrderBotConfig::from_env(&base_env()).unwrap();

        assert_eq!(config.signing_secret, "signing-secret");
        assert_eq!(config.bot_token, "xoxb-test");
        assert_eq!(config.port, 3000);
        assert_eq!(config.events_path, "/slack/events");
        assert_eq!(config.interactions_path, "/slack/interactions");
        assert_eq!(config.signature_max_age, Duration::from_secs(300));
        assert_eq!(config.api_base, "https://slack.com");
    }

    #[test]
    fn reads_all_env_vars() {
        let env = base_env();
        env.set("SLACK_ORDER_BOT_PORT", "9090");
        env.set("SLACK_EVENTS_PATH", "/events");
        env.set("SLACK_INTERACTIONS_PATH", "/actions");
        env.set("SLACK_SIGNATURE_MAX_AGE_SECS", "60");
        env.set("SLACK_API_BASE", "http://127.0.0.1:1234/");

        let config = OrderBotConfig::from_env(&env).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.events_path, "/events");
        assert_eq!(config.interactions_path, "/actions");
        assert_eq!(config.signature_max_age, Duration::from_secs(60));
        assert_eq!(config.api_base, "http://127.0.0.1:1234");
    }

    #[test]
    fn missing_signing_secret_is_an_error() {
        let env = base_env();
        env.remove("SLACK_SIGNING_SECRET");
        assert_eq!(
            OrderBotConfig::from_env(&env).unwrap_err(),
            ConfigError::Missing("SLACK_SIGNING_SECRET")
        );
    }

    #[test]
    fn empty_bot_token_is_an_error() {
        let env = base_env();
        env.set("SLACK_BOT_TOKEN", "");
        assert_eq!(
            OrderBotConfig::from_env(&env).unwrap_err(),
            ConfigError::Missing("SLACK_BOT_TOKEN")
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", OrderBotConfig::from_env(&base_env()).unwrap());
        assert!(!rendered.contains("signing-secret"));
        assert!(!rendered.contains("xoxb-test"));
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let env = base_env();
        env.set("SLACK_ORDER_BOT_PORT", "not-a-port");
        env.set("SLACK_SIGNATURE_MAX_AGE_SECS", "-5");

        let config = OrderBotConfig::from_env(&env).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.signature_max_age, Duration::from_secs(300));
    }

    #[test]
    fn relative_or_empty_paths_are_rejected() {
        for bad in ["slack/events", ""] {
            let env = base_env();
            env.set("SLACK_EVENTS_PATH", bad);
            assert_eq!(
                OrderBotConfig::from_env(&env).unwrap_err(),
                ConfigError::Invalid("SLACK_EVENTS_PATH")
            );
        }
    }

    #[test]
    fn paths_with_route_captures_are_rejected() {
        for bad in ["/slack/{kind}", "/slack/*rest", "/slack/:kind"] {
            let env = base_env();
            env.set("SLACK_INTERACTIONS_PATH", bad);
            assert_eq!(
                OrderBotConfig::from_env(&env).unwrap_err(),
                ConfigError::Invalid("SLACK_INTERACTIONS_PATH")
            );
        }
    }

    #[test]
    fn health_route_cannot_be_reused() {
        let env = base_env();
        env.set("SLACK_EVENTS_PATH", "/healthz");
        assert_eq!(
            OrderBotConfig::from_env(&env).unwrap_err(),
            ConfigError::Invalid("SLACK_EVENTS_PATH")
        );
    }

    #[test]
    fn identical_paths_are_rejected() {
        let env = base_env();
        env.set("SLACK_EVENTS_PATH", "/slack");
        env.set("SLACK_INTERACTIONS_PATH", "/slack");
        assert_eq!(
            OrderBotConfig::from_env(&env).unwrap_err(),
            ConfigError::Invalid("SLACK_INTERACTIONS_PATH")
        );
    }
}
