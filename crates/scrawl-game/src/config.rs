//! Game configuration.

/// Parameters of one game. Defaults match the public deployment.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Total rounds before the game ends.
    pub max_rounds: u32,
    /// Drawing countdown, in seconds.
    pub round_time: u32,
    /// Word-choosing countdown, in seconds.
    pub choose_time: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: 5,
            round_time: 60,
            choose_time: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_default() {
        let config = GameConfig::default();
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.round_time, 60);
        assert_eq!(config.choose_time, 15);
    }
}
