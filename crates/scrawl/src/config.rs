//! Server configuration from the environment.

use scrawl_game::GameConfig;

/// Everything the server needs to start, read from `SCRAWL_*` variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the WebSocket listener to.
    pub addr: String,
    /// Game parameters applied to every room.
    pub game: GameConfig,
}

impl ServerConfig {
    /// Reads the configuration from the environment, falling back to
    /// defaults for anything unset or unparseable:
    ///
    /// - `SCRAWL_ADDR` — listen address (default `127.0.0.1:3001`)
    /// - `SCRAWL_MAX_ROUNDS` — rounds per game (default 5)
    /// - `SCRAWL_ROUND_TIME` — drawing seconds (default 60)
    /// - `SCRAWL_CHOOSE_TIME` — word-choice seconds (default 15)
    pub fn from_env() -> Self {
        let defaults = GameConfig::default();
        Self {
            addr: std::env::var("SCRAWL_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3001".to_string()),
            game: GameConfig {
                max_rounds: env_u32("SCRAWL_MAX_ROUNDS", defaults.max_rounds),
                round_time: env_u32("SCRAWL_ROUND_TIME", defaults.round_time),
                choose_time: env_u32(
                    "SCRAWL_CHOOSE_TIME",
                    defaults.choose_time,
                ),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3001".to_string(),
            game: GameConfig::default(),
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, raw, "not a number, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "127.0.0.1:3001");
        assert_eq!(config.game.max_rounds, 5);
    }

    #[test]
    fn test_env_u32_falls_back() {
        assert_eq!(env_u32("SCRAWL_TEST_UNSET_VAR", 42), 42);
    }
}
