//! Quest definitions.

use serde::{Deserialize, Serialize};

/// What a quest counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    /// Enemy kills since the tracker was attached.
    Kills,
    /// Whole seconds survived in a single run.
    Survive,
    /// Highest player level reached.
    Level,
    /// Gold held in a single run.
    Gold,
    /// Bosses defeated.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestDef {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: QuestKind,
    pub target: u32,
    pub reward_gold: u32,
    /// Content key unlocked on completion; recorded, not enforced.
    pub unlock: Option<&'static str>,
}

const fn quest(
    key: &'static str,
    name: &'static str,
    description: &'static str,
    kind: QuestKind,
    target: u32,
    reward_gold: u32,
    unlock: Option<&'static str>,
) -> QuestDef {
    QuestDef { key, name, description, kind, target, reward_gold, unlock }
}

use QuestKind as Q;

#[rustfmt::skip]
pub const QUESTS: [QuestDef; 16] = [
    quest("kills_100", "Pest Control", "Kill 100 enemies", Q::Kills, 100, 50, None),
    quest("kills_500", "Exterminator", "Kill 500 enemies", Q::Kills, 500, 150, None),
    quest("kills_1000", "Slaughter House", "Kill 1,000 enemies", Q::Kills, 1_000, 300, None),
    quest("kills_5000", "Genocide", "Kill 5,000 enemies", Q::Kills, 5_000, 500, Some("quantity_tome")),
    quest("kills_10000", "Apocalypse", "Kill 10,000 enemies", Q::Kills, 10_000, 1_000, Some("cursed_tome")),
    quest("survive_3", "Survivor", "Survive for 3 minutes", Q::Survive, 180, 30, None),
    quest("survive_5", "Endurance", "Survive for 5 minutes", Q::Survive, 300, 75, None),
    quest("survive_10", "Iron Will", "Survive for 10 minutes", Q::Survive, 600, 200, Some("skeleton")),
    quest("level_10", "Getting Stronger", "Reach level 10", Q::Level, 10, 50, None),
    quest("level_20", "Powerhouse", "Reach level 20", Q::Level, 20, 150, Some("armor_tome")),
    quest("level_50", "Legendary", "Reach level 50", Q::Level, 50, 500, None),
    quest("gold_100", "Coin Collector", "Earn 100 gold", Q::Gold, 100, 50, None),
    quest("gold_500", "Treasure Hunter", "Earn 500 gold", Q::Gold, 500, 200, None),
    quest("gold_2000", "Midas Touch", "Earn 2,000 gold", Q::Gold, 2_000, 500, None),
    quest("first_boss", "Boss Slayer", "Defeat a boss", Q::Clear, 1, 300, Some("aura_chad")),
    quest("swarm_6", "Swarm Survivor", "Survive 6 minutes in Final Swarm", Q::Survive, 960, 1_000, Some("soul_harvester")),
];

pub fn find(key: &str) -> Option<&'static QuestDef> {
    QUESTS.iter().find(|q| q.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_and_targets_positive() {
        for (i, q) in QUESTS.iter().enumerate() {
            assert!(q.target > 0, "{}", q.key);
            assert!(QUESTS[i + 1..].iter().all(|o| o.key != q.key), "duplicate {}", q.key);
        }
    }

    #[test]
    fn lookup_by_key() {
        assert_eq!(find("first_boss").map(|q| q.kind), Some(QuestKind::Clear));
        assert!(find("nope").is_none());
    }
}
