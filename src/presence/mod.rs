//! Player presence keyed by `player_id`.
//!
//! Every ping marks the resolved player as seen and drops players that
//! have been silent for longer than [`PLAYER_TIMEOUT_SECS`]. The roster
//! lives in the same origin store as the identity, under [`PRESENCE_KEY`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ports::{KeyValueStore, PortError};

/// Storage key of the roster record.
pub const PRESENCE_KEY: &str = "presence";

/// Seconds of silence after which a player is dropped from the roster.
pub const PLAYER_TIMEOUT_SECS: i64 = 50;

/// Highest team number; `0` means no side chosen.
pub const MAX_TEAM: u8 = 2;

/// One tracked player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name from the last ping.
    pub name: String,
    /// Chosen side, `0` when none.
    pub team: u8,
    /// Time of the last ping.
    pub last_seen: DateTime<Utc>,
}

/// Change in presence worth reporting to other players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceEvent {
    /// A player picked a side, or switched to another one.
    JoinSide {
        /// Player that joined.
        player_id: String,
        /// Side joined.
        team: u8,
    },
    /// A player with a side timed out.
    PlayerLeft {
        /// Player that left.
        player_id: String,
        /// Side the player was on.
        team: u8,
    },
}

impl fmt::Display for PresenceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JoinSide { player_id, team } => write!(f, "join_side {player_id} team={team}"),
            Self::PlayerLeft { player_id, team } => write!(f, "player_left {player_id} team={team}"),
        }
    }
}

/// Players currently present, ordered by `player_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: BTreeMap<String, Player>,
}

impl Roster {
    /// Reads the roster from `store`.
    ///
    /// A missing record yields an empty roster. A record that does not
    /// parse is discarded with a warning; the next save replaces it.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the read fails.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, PortError> {
        let Some(raw) = store.get(PRESENCE_KEY)? else {
            return Ok(Self::default());
        };
        match serde_json::from_str(&raw) {
            Ok(roster) => Ok(roster),
            Err(e) => {
                warn!(error = %e, "discarding unreadable presence roster");
                Ok(Self::default())
            }
        }
    }

    /// Writes the roster to `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), PortError> {
        let raw = serde_json::to_string(self)?;
        store.set(PRESENCE_KEY, &raw)
    }

    /// Records a ping from `player_id` at `when`.
    ///
    /// A non-zero `team` that differs from the stored one emits a
    /// [`PresenceEvent::JoinSide`]. Team `0` never clears a chosen side.
    pub fn mark_seen(&mut self, player_id: &str, name: &str, team: u8, when: DateTime<Utc>) -> Vec<PresenceEvent> {
        let joined = || PresenceEvent::JoinSide { player_id: player_id.to_string(), team };

        if let Some(player) = self.players.get_mut(player_id) {
            player.last_seen = when;
            name.clone_into(&mut player.name);
            if team != 0 && player.team != team {
                player.team = team;
                return vec![joined()];
            }
            return Vec::new();
        }

        debug!(player_id, team, "new player seen");
        self.players.insert(
            player_id.to_string(),
            Player { name: name.to_string(), team, last_seen: when },
        );
        if team == 0 {
            Vec::new()
        } else {
            vec![joined()]
        }
    }

    /// Drops players last seen more than [`PLAYER_TIMEOUT_SECS`] before `now`.
    ///
    /// Emits [`PresenceEvent::PlayerLeft`] for each dropped player that had a side.
    pub fn prune(&mut self, now: DateTime<Utc>) -> Vec<PresenceEvent> {
        let timeout = Duration::seconds(PLAYER_TIMEOUT_SECS);
        let expired: Vec<String> = self
            .players
            .iter()
            .filter(|(_, player)| player.last_seen + timeout < now)
            .map(|(id, _)| id.clone())
            .collect();

        let mut events = Vec::new();
        for player_id in expired {
            if let Some(player) = self.players.remove(&player_id) {
                debug!(player_id = %player_id, "player timed out");
                if player.team != 0 {
                    events.push(PresenceEvent::PlayerLeft { player_id, team: player.team });
                }
            }
        }
        events
    }

    /// Iterates over present players in `player_id` order.
    pub fn players(&self) -> impl Iterator<Item = (&str, &Player)> {
        self.players.iter().map(|(id, player)| (id.as_str(), player))
    }
}
