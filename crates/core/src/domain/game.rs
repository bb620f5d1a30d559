// Supported Launch Targets

use serde::{Deserialize, Serialize};

/// Identifier of a launchable game server target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameId {
    Custom,
    Minecraft,
    MinecraftBe,
    Factorio,
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameId::Custom => write!(f, "custom"),
            GameId::Minecraft => write!(f, "minecraft"),
            GameId::MinecraftBe => write!(f, "minecraft_be"),
            GameId::Factorio => write!(f, "factorio"),
        }
    }
}

impl std::str::FromStr for GameId {
    type Err = crate::domain::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(GameId::Custom),
            "minecraft" => Ok(GameId::Minecraft),
            "minecraft_be" => Ok(GameId::MinecraftBe),
            "factorio" => Ok(GameId::Factorio),
            other => Err(crate::domain::DomainError::UnknownGame(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_round_trip() {
        for game in [
            GameId::Custom,
            GameId::Minecraft,
            GameId::MinecraftBe,
            GameId::Factorio,
        ] {
            let parsed: GameId = game.to_string().parse().unwrap();
            assert_eq!(parsed, game);
        }
    }

    #[test]
    fn test_unknown_game_rejected() {
        assert!("half_life".parse::<GameId>().is_err());
    }
}
