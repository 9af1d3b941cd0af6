use crate::game_state::chess_rules::{
    DEFAULT_CAPTURE_SCORE, DEFAULT_QUANTUM_TOKENS, DEFAULT_SUPERPOSITION_BUDGET,
};
use crate::game_state::chess_types::Color;
use crate::oracle::legality_oracle::AiDifficulty;

/// Who plays the side opposite `player_color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    Ai,
    /// Hot-seat: both colors take input.
    Human,
}

/// Game session configuration, from environment variables or defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// The human side.
    pub player_color: Color,
    pub opponent: Opponent,
    pub ai_difficulty: AiDifficulty,
    /// Simulated thinking time range for AI moves.
    pub ai_delay_min_ms: u64,
    pub ai_delay_max_ms: u64,
    /// Turns a superposition survives before a forced collapse.
    pub superposition_budget: u8,
    pub quantum_tokens_per_side: u8,
    pub capture_score: i32,
    /// Fixes collapse coin flips, AI delays and oracle tie-breaks.
    pub rng_seed: Option<u64>,
}

impl GameConfig {
    /// Load configuration from `QUANTUM_CHESS_*` environment variables, with
    /// defaults for anything missing or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let (ai_delay_min_ms, ai_delay_max_ms) = lookup("QUANTUM_CHESS_AI_DELAY_MS")
            .and_then(|v| parse_delay_range(&v))
            .unwrap_or((defaults.ai_delay_min_ms, defaults.ai_delay_max_ms));

        GameConfig {
            player_color: lookup("QUANTUM_CHESS_PLAYER_COLOR")
                .and_then(|v| parse_color(&v))
                .unwrap_or(defaults.player_color),
            opponent: lookup("QUANTUM_CHESS_OPPONENT")
                .and_then(|v| parse_opponent(&v))
                .unwrap_or(defaults.opponent),
            ai_difficulty: lookup("QUANTUM_CHESS_AI_DIFFICULTY")
                .and_then(|v| AiDifficulty::parse(&v))
                .unwrap_or(defaults.ai_difficulty),
            ai_delay_min_ms,
            ai_delay_max_ms,
            rng_seed: lookup("QUANTUM_CHESS_SEED").and_then(|v| v.trim().parse().ok()),
            ..defaults
        }
    }

    /// True when `color` is driven by the AI rather than by input.
    pub fn is_ai_controlled(&self, color: Color) -> bool {
        self.opponent == Opponent::Ai && color != self.player_color
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            player_color: Color::White,
            opponent: Opponent::Ai,
            ai_difficulty: AiDifficulty::Greedy,
            ai_delay_min_ms: 300,
            ai_delay_max_ms: 800,
            superposition_budget: DEFAULT_SUPERPOSITION_BUDGET,
            quantum_tokens_per_side: DEFAULT_QUANTUM_TOKENS,
            capture_score: DEFAULT_CAPTURE_SCORE,
            rng_seed: None,
        }
    }
}

fn parse_color(value: &str) -> Option<Color> {
    match value.trim().to_ascii_lowercase().as_str() {
        "white" | "w" => Some(Color::White),
        "black" | "b" => Some(Color::Black),
        _ => None,
    }
}

fn parse_opponent(value: &str) -> Option<Opponent> {
    match value.trim().to_ascii_lowercase().as_str() {
        "ai" | "computer" => Some(Opponent::Ai),
        "human" | "hotseat" => Some(Opponent::Human),
        _ => None,
    }
}

/// `"300-800"` -> `(300, 800)`; a single number is a fixed delay.
fn parse_delay_range(value: &str) -> Option<(u64, u64)> {
    let (min, max) = match value.split_once('-') {
        Some((min, max)) => (min.trim().parse().ok()?, max.trim().parse().ok()?),
        None => {
            let fixed = value.trim().parse().ok()?;
            (fixed, fixed)
        }
    };
    (min <= max).then_some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GameConfig::default();
        assert_eq!(config.player_color, Color::White);
        assert_eq!(config.opponent, Opponent::Ai);
        assert_eq!(config.ai_difficulty, AiDifficulty::Greedy);
        assert_eq!((config.ai_delay_min_ms, config.ai_delay_max_ms), (300, 800));
        assert_eq!(config.superposition_budget, 3);
        assert_eq!(config.quantum_tokens_per_side, 3);
        assert_eq!(config.capture_score, 100);
        assert!(config.is_ai_controlled(Color::Black));
        assert!(!config.is_ai_controlled(Color::White));
    }

    #[test]
    fn lookup_overrides_and_falls_back() {
        let config = GameConfig::from_lookup(|key| match key {
            "QUANTUM_CHESS_PLAYER_COLOR" => Some("Black".to_owned()),
            "QUANTUM_CHESS_OPPONENT" => Some("human".to_owned()),
            "QUANTUM_CHESS_AI_DIFFICULTY" => Some("random".to_owned()),
            "QUANTUM_CHESS_AI_DELAY_MS" => Some("800-300".to_owned()),
            "QUANTUM_CHESS_SEED" => Some("42".to_owned()),
            _ => None,
        });
        assert_eq!(config.player_color, Color::Black);
        assert_eq!(config.opponent, Opponent::Human);
        assert_eq!(config.ai_difficulty, AiDifficulty::Random);
        // Inverted range is ignored.
        assert_eq!((config.ai_delay_min_ms, config.ai_delay_max_ms), (300, 800));
        assert_eq!(config.rng_seed, Some(42));
        assert!(!config.is_ai_controlled(Color::White));
    }

    #[test]
    fn delay_range_parsing() {
        assert_eq!(parse_delay_range("10-20"), Some((10, 20)));
        assert_eq!(parse_delay_range(" 5 "), Some((5, 5)));
        assert_eq!(parse_delay_range("a-b"), None);
    }
}
