use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Competitive queue a ladder record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "1v1")]
    OneVsOne,
    #[serde(rename = "archon")]
    Archon,
    #[serde(rename = "2v2")]
    TwoVsTwo,
    #[serde(rename = "3v3")]
    ThreeVsThree,
    #[serde(rename = "4v4")]
    FourVsFour,
}

impl GameMode {
    /// Every mode, in display order.
    pub const ALL: [GameMode; 5] = [
        GameMode::OneVsOne,
        GameMode::Archon,
        GameMode::TwoVsTwo,
        GameMode::ThreeVsThree,
        GameMode::FourVsFour,
    ];

    /// Wire key used by the gateway and the cache.
    pub fn key(self) -> &'static str {
        match self {
            GameMode::OneVsOne => "1v1",
            GameMode::Archon => "archon",
            GameMode::TwoVsTwo => "2v2",
            GameMode::ThreeVsThree => "3v3",
            GameMode::FourVsFour => "4v4",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        GameMode::ALL.into_iter().find(|mode| mode.key() == key)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Rank id reported for a mode the player has no placement in.
pub const UNRANKED_RANK_ID: i32 = -1;

fn unranked_rank_id() -> i32 {
    UNRANKED_RANK_ID
}

/// Aggregated ladder results for one game mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderStats {
    #[serde(default)]
    pub total_ladders: u32,
    #[serde(default = "unranked_rank_id")]
    pub top_rank_id: i32,
    #[serde(default)]
    pub top_rank: String,
    #[serde(default, rename = "topMMR")]
    pub top_mmr: i32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
}

static UNRANKED: LadderStats = LadderStats {
    total_ladders: 0,
    top_rank_id: UNRANKED_RANK_ID,
    top_rank: String::new(),
    top_mmr: 0,
    wins: 0,
    losses: 0,
    ties: 0,
};

impl Default for LadderStats {
    fn default() -> Self {
        UNRANKED.clone()
    }
}

impl LadderStats {
    pub fn is_ranked(&self) -> bool {
        self.top_rank_id != UNRANKED_RANK_ID
    }

    pub fn games_played(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses) + u64::from(self.ties)
    }
}

/// Per-mode ladder stats. Always holds an entry for every [`GameMode`];
/// modes without data carry the unranked default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, LadderStats>",
    into = "BTreeMap<String, LadderStats>"
)]
pub struct Ladders {
    stats: BTreeMap<GameMode, LadderStats>,
}

impl Default for Ladders {
    fn default() -> Self {
        Self {
            stats: GameMode::ALL
                .into_iter()
                .map(|mode| (mode, LadderStats::default()))
                .collect(),
        }
    }
}

impl Ladders {
    pub fn get(&self, mode: GameMode) -> &LadderStats {
        self.stats.get(&mode).unwrap_or(&UNRANKED)
    }

    pub fn set(&mut self, mode: GameMode, stats: LadderStats) {
        self.stats.insert(mode, stats);
    }

    pub fn with(mut self, mode: GameMode, stats: LadderStats) -> Self {
        self.set(mode, stats);
        self
    }

    /// Iterate in display order.
    pub fn iter(&self) -> impl Iterator<Item = (GameMode, &LadderStats)> {
        self.stats.iter().map(|(mode, stats)| (*mode, stats))
    }

    /// Number of modes with a placement.
    pub fn ranked_count(&self) -> usize {
        self.stats.values().filter(|stats| stats.is_ranked()).count()
    }
}

impl From<BTreeMap<String, LadderStats>> for Ladders {
    fn from(raw: BTreeMap<String, LadderStats>) -> Self {
        let mut ladders = Ladders::default();
        for (key, stats) in raw {
            if let Some(mode) = GameMode::from_key(&key) {
                ladders.set(mode, stats);
            }
        }
        ladders
    }
}

impl From<Ladders> for BTreeMap<String, LadderStats> {
    fn from(ladders: Ladders) -> Self {
        ladders
            .stats
            .into_iter()
            .map(|(mode, stats)| (mode.key().to_string(), stats))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Clan {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
}

/// Player identity as shown in the panel header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Server region label (e.g. "EU", "KR")
    #[serde(default)]
    pub server: String,
    pub name: String,
    #[serde(default)]
    pub clan: Clan,
    /// Rank label of the best placement
    #[serde(default)]
    pub rank: String,
    /// Portrait image reference
    #[serde(default)]
    pub portrait: String,
}

/// Last successfully fetched player and ladder data. Treated as immutable;
/// the controller shares it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player: Player,
    #[serde(default)]
    pub ladders: Ladders,
}
