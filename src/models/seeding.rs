//! National ranking rows, seeding rows and group assignments.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// One row of an uploaded national ranking list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub rank: u32,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl RankingRow {
    pub fn new(rank: u32, name: impl Into<String>) -> Self {
        Self {
            rank,
            name: name.into(),
            email: None,
            country: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// A ranking list selected for seeding (one year/description of the national ranking).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingList {
    pub year: Option<i32>,
    pub description: Option<String>,
    pub rows: Vec<RankingRow>,
}

/// Where a player's seed came from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    /// Matched to a row of the national ranking.
    National,
    /// Unranked, from a country other than the ranking's national country.
    International,
    /// Unranked local player.
    New,
}

/// How a player was matched to a ranking row.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Email,
    Name,
    None,
}

/// Seed assignment for one player. Seeds of a tournament are a permutation of 1..=N.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeedingRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub seed: u32,
    pub source: SeedSource,
    pub match_method: MatchMethod,
    pub ranking_rank: Option<u32>,
    pub ranking_year: Option<i32>,
    pub ranking_description: Option<String>,
    #[serde(default)]
    pub manual_override: bool,
}

/// Group distribution policy.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMethod {
    /// Seed i goes to group i mod G.
    #[default]
    Interleaved,
    /// Like interleaved, but every odd row of G seeds runs backwards.
    Snake,
}

impl std::str::FromStr for GroupMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interleaved" => Ok(GroupMethod::Interleaved),
            "snake" => Ok(GroupMethod::Snake),
            other => Err(format!("unknown group method '{other}'")),
        }
    }
}

/// A seeded player's group placement. Group numbers are 1-based.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub player_id: PlayerId,
    pub seed: u32,
    pub group_number: u32,
    pub group_size: u32,
    pub method: GroupMethod,
}
