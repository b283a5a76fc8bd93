//! Player identity and the seeded view of a player used by pairing.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player (used in matches, seeding rows and lookups).
pub type PlayerId = u64;

/// A registered tournament player. Identity is immutable once created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Player {
    /// Create a player with the given id and display name. Contact fields start empty.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            state: None,
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

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

/// A player as seen by round pairing: id, display name and seed within the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupPlayer {
    pub id: PlayerId,
    pub name: String,
    pub seed: u32,
}

impl GroupPlayer {
    pub fn new(id: PlayerId, name: impl Into<String>, seed: u32) -> Self {
        Self {
            id,
            name: name.into(),
            seed,
        }
    }
}
