use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;

pub const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Parser)]
#[command(name = "lectio-relay", about = "Forwards reading results to a Telegram chat")]
pub struct RelayConfig {
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub chat_id: Option<String>,

    /// Base URL of the Bot API, overridable for staging.
    #[arg(long, default_value = TELEGRAM_API)]
    pub telegram_api: String,

    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

/// Where results are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramTarget {
    pub bot_token: String,
    pub chat_id: String,
}

impl RelayConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `None` unless both values are set and non-blank.
    pub fn target(&self) -> Option<TelegramTarget> {
        let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        Some(TelegramTarget {
            bot_token: present(&self.bot_token)?,
            chat_id: present(&self.chat_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credentials_count_as_missing() {
        let config = RelayConfig::parse_from(["lectio-relay", "--bot-token", "abc", "--chat-id", "  "]);
        assert_eq!(config.target(), None);

        let config = RelayConfig::parse_from(["lectio-relay", "--bot-token", "abc", "--chat-id", "42"]);
        assert_eq!(
            config.target(),
            Some(TelegramTarget {
                bot_token: "abc".to_string(),
                chat_id: "42".to_string()
            })
        );
        assert_eq!(config.telegram_api, TELEGRAM_API);
    }
}
