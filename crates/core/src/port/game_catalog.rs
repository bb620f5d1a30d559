// Game Catalog Port
// Maps a game id to its default port, ordered check list, and
// default launch command

use crate::domain::{CheckId, GameId};

/// Game metadata lookup
///
/// The check list order is part of the target configuration: the
/// sequencer runs checks in exactly this order.
pub trait GameCatalog: Send + Sync {
    /// Default local port the game server listens on
    fn local_port(&self, game: GameId) -> u16;

    /// Ordered list of pre-flight check ids for this game
    fn check_list(&self, game: GameId) -> Vec<CheckId>;

    /// Default launch command, if the game ships one
    fn default_command(&self, game: GameId) -> Option<String>;
}

/// Built-in catalog for the supported game targets
pub struct StaticGameCatalog;

impl GameCatalog for StaticGameCatalog {
    fn local_port(&self, game: GameId) -> u16 {
        match game {
            GameId::Custom => 3010,
            GameId::Minecraft => 25565,
            GameId::MinecraftBe => 19132,
            GameId::Factorio => 34197,
        }
    }

    fn check_list(&self, game: GameId) -> Vec<CheckId> {
        match game {
            GameId::Minecraft => vec![
                CheckId::new(CheckId::JAVA_VERSION),
                CheckId::new(CheckId::PORT_AVAILABLE),
            ],
            GameId::Custom | GameId::MinecraftBe | GameId::Factorio => {
                vec![CheckId::new(CheckId::PORT_AVAILABLE)]
            }
        }
    }

    fn default_command(&self, game: GameId) -> Option<String> {
        match game {
            GameId::Custom => Some("nc -kl 3010".to_string()),
            GameId::Minecraft | GameId::MinecraftBe | GameId::Factorio => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        let catalog = StaticGameCatalog;
        assert_eq!(catalog.local_port(GameId::Custom), 3010);
        assert_eq!(catalog.local_port(GameId::Minecraft), 25565);
        assert_eq!(catalog.local_port(GameId::MinecraftBe), 19132);
        assert_eq!(catalog.local_port(GameId::Factorio), 34197);
    }

    #[test]
    fn test_minecraft_checks_java_first() {
        let catalog = StaticGameCatalog;
        let checks = catalog.check_list(GameId::Minecraft);
        assert_eq!(checks[0].as_str(), CheckId::JAVA_VERSION);
        assert_eq!(checks[1].as_str(), CheckId::PORT_AVAILABLE);
    }

    #[test]
    fn test_custom_default_command() {
        let catalog = StaticGameCatalog;
        assert_eq!(
            catalog.default_command(GameId::Custom).as_deref(),
            Some("nc -kl 3010")
        );
        assert!(catalog.default_command(GameId::Minecraft).is_none());
    }
}
