//! Per-owner game storage shared across requests.

use knots_core::{Game, GameError, GameId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Opaque key grouping the games of one caller.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
pub struct OwnerKey(String);

impl OwnerKey {
    /// Wraps an arbitrary key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<IpAddr> for OwnerKey {
    fn from(addr: IpAddr) -> Self {
        Self(addr.to_string())
    }
}

type OwnerGames = HashMap<GameId, Game>;

/// Maps owners to their games.
///
/// Cloning shares the same storage. The lock only guards the maps
/// themselves; two requests racing on one game are not ordered.
#[derive(Debug, Clone, Default)]
pub struct GameRegistry {
    owners: Arc<Mutex<HashMap<OwnerKey, OwnerGames>>>,
}

impl GameRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game registry");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<OwnerKey, OwnerGames>> {
        self.owners.lock().unwrap_or_else(|poisoned| {
            warn!("Registry lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Creates a fresh game for `owner` and returns a copy of it.
    #[instrument(skip(self))]
    pub fn create_game(&self, owner: &OwnerKey) -> Game {
        let game = Game::new();
        self.insert(owner, game.clone());
        info!(game_id = %game.id(), "Created game");
        game
    }

    /// Stores `game` under `owner`, replacing any game with the same id.
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    pub fn insert(&self, owner: &OwnerKey, game: Game) {
        let mut owners = self.lock();
        owners
            .entry(owner.clone())
            .or_default()
            .insert(game.id().clone(), game);
        debug!("Game stored");
    }

    /// Returns a copy of one game.
    #[instrument(skip(self))]
    pub fn get_game(&self, owner: &OwnerKey, id: &str) -> Result<Game, GameError> {
        self.with_game(owner, id, |game| game.clone())
    }

    /// Runs `f` against the stored game while holding the lock.
    #[instrument(skip(self, f))]
    pub fn with_game<T>(
        &self,
        owner: &OwnerKey,
        id: &str,
        f: impl FnOnce(&mut Game) -> T,
    ) -> Result<T, GameError> {
        let mut owners = self.lock();
        match owners.get_mut(owner).and_then(|games| games.get_mut(id)) {
            Some(game) => Ok(f(game)),
            None => {
                debug!("Game not found");
                Err(GameError::UnknownGame { id: id.to_string() })
            }
        }
    }

    /// Lists the owner's games, most recently updated first.
    #[instrument(skip(self))]
    pub fn list_games(&self, owner: &OwnerKey) -> Vec<Game> {
        let owners = self.lock();
        let mut games: Vec<Game> = owners
            .get(owner)
            .map(|games| games.values().cloned().collect())
            .unwrap_or_default();
        games.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        debug!(count = games.len(), "Listed games");
        games
    }

    /// Number of owners with at least one game.
    pub fn owner_count(&self) -> usize {
        self.lock().len()
    }
}
