//! # Core Type Definitions
//!
//! This module contains all core types for the Herald matchup engine:
//! - World and match identifiers (`WorldId`, `MatchId`, `Region`)
//! - Role representation (`Role`, `RoleMap`)
//! - League data (`Standing`, `RegionSnapshot`)
//! - Output structures (`Seat`, `Prediction`)
//! - Error types (`HeraldError`)
//! - Name lookup trait
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Are immutable once constructed; standings validate their invariants up front

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::ops::Index;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// WORLD & MATCH IDENTIFIERS
// =============================================================================

/// Identifier of a world (the competing group) as assigned by the game API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub u32);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A competitive region. Each region runs its own ladder of tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    NorthAmerica,
    Europe,
}

impl Region {
    /// Numeric id used in match identifiers.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Region::NorthAmerica => 1,
            Region::Europe => 2,
        }
    }

    /// Resolve a numeric region id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Region::NorthAmerica),
            2 => Some(Region::Europe),
            _ => None,
        }
    }
}

/// Identifier of one tier's match: region plus tier number (tier 1 is the top).
///
/// The textual form is `"<region>-<tier>"`, e.g. `"2-3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchId {
    pub region: u8,
    pub tier: u8,
}

impl MatchId {
    #[must_use]
    pub const fn new(region: u8, tier: u8) -> Self {
        Self { region, tier }
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.region, self.tier)
    }
}

impl FromStr for MatchId {
    type Err = HeraldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HeraldError::InvalidMatchId(s.to_string());
        let (region, tier) = s.split_once('-').ok_or_else(invalid)?;
        let region: u8 = region.trim().parse().map_err(|_| invalid())?;
        let tier: u8 = tier.trim().parse().map_err(|_| invalid())?;
        if tier == 0 {
            return Err(invalid());
        }
        Ok(Self::new(region, tier))
    }
}

impl TryFrom<String> for MatchId {
    type Error = HeraldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchId> for String {
    fn from(id: MatchId) -> Self {
        id.to_string()
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// One of the three fixed positions in a tier's match.
///
/// The variants carry the API's color names. For the ladder:
/// - `Green` is role A (the tier's top slot)
/// - `Blue` is role B (the steady slot)
/// - `Red` is role C (the bottom slot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Green,
    Blue,
    Red,
}

impl Role {
    /// Canonical role order. Ranking ties fall back to this order.
    pub const ALL: [Role; 3] = [Role::Green, Role::Blue, Role::Red];

    /// Lowercase color name as used by the API.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Role::Green => "green",
            Role::Blue => "blue",
            Role::Red => "red",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exactly one value per role.
///
/// Field names match the color keys of the API payloads, so a `RoleMap`
/// deserializes straight from `{"red": .., "blue": .., "green": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct RoleMap<T> {
    pub green: T,
    pub blue: T,
    pub red: T,
}

impl<T> RoleMap<T> {
    #[must_use]
    pub const fn new(green: T, blue: T, red: T) -> Self {
        Self { green, blue, red }
    }

    /// Build a map by evaluating `f` once per role, in canonical order.
    pub fn from_fn(mut f: impl FnMut(Role) -> T) -> Self {
        let green = f(Role::Green);
        let blue = f(Role::Blue);
        let red = f(Role::Red);
        Self { green, blue, red }
    }

    /// Fallible variant of [`RoleMap::from_fn`]; stops at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Role) -> Result<T, E>) -> Result<Self, E> {
        let green = f(Role::Green)?;
        let blue = f(Role::Blue)?;
        let red = f(Role::Red)?;
        Ok(Self { green, blue, red })
    }

    #[must_use]
    pub fn get(&self, role: Role) -> &T {
        match role {
            Role::Green => &self.green,
            Role::Blue => &self.blue,
            Role::Red => &self.red,
        }
    }

    /// Iterate `(role, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    /// Transform every value, keeping the role association.
    pub fn map<U>(self, mut f: impl FnMut(Role, T) -> U) -> RoleMap<U> {
        RoleMap {
            green: f(Role::Green, self.green),
            blue: f(Role::Blue, self.blue),
            red: f(Role::Red, self.red),
        }
    }

    /// First role (canonical order) whose value satisfies `pred`.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Role> {
        Role::ALL.into_iter().find(|&role| pred(self.get(role)))
    }
}

impl<T> Index<Role> for RoleMap<T> {
    type Output = T;

    fn index(&self, role: Role) -> &T {
        self.get(role)
    }
}

// =============================================================================
// STANDING
// =============================================================================

/// One tier's current league data.
///
/// Invariants (checked by [`Standing::new`]):
/// - the three main worlds are distinct
/// - every link set contains its main world
/// - the three link sets are pairwise disjoint
/// - the tier is at least 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    match_id: MatchId,
    scores: RoleMap<i64>,
    mains: RoleMap<WorldId>,
    links: RoleMap<Vec<WorldId>>,
}

impl Standing {
    /// Create a standing, validating the role invariants.
    pub fn new(
        match_id: MatchId,
        scores: RoleMap<i64>,
        mains: RoleMap<WorldId>,
        links: RoleMap<Vec<WorldId>>,
    ) -> Result<Self, HeraldError> {
        if match_id.tier == 0 {
            return Err(HeraldError::MalformedStanding(format!(
                "{match_id}: tiers are numbered from 1"
            )));
        }

        for (role, main) in mains.iter() {
            if !links[role].contains(main) {
                return Err(HeraldError::MalformedStanding(format!(
                    "{match_id}: main world {main} missing from the {role} link set"
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for (role, set) in links.iter() {
            for world in set {
                if !seen.insert(*world) {
                    return Err(HeraldError::MalformedStanding(format!(
                        "{match_id}: world {world} appears twice (again in {role})"
                    )));
                }
            }
        }

        Ok(Self {
            match_id,
            scores,
            mains,
            links,
        })
    }

    /// Create a standing where no role has linked worlds.
    pub fn without_links(
        match_id: MatchId,
        scores: RoleMap<i64>,
        mains: RoleMap<WorldId>,
    ) -> Result<Self, HeraldError> {
        let links = mains.map(|_, main| vec![main]);
        Self::new(match_id, scores, mains, links)
    }

    #[must_use]
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    #[must_use]
    pub fn scores(&self) -> &RoleMap<i64> {
        &self.scores
    }

    #[must_use]
    pub fn main(&self, role: Role) -> WorldId {
        self.mains[role]
    }

    /// The full link set of a role, main world included.
    #[must_use]
    pub fn links(&self, role: Role) -> &[WorldId] {
        &self.links[role]
    }

    /// Role whose main world is `world`.
    #[must_use]
    pub fn role_of_main(&self, world: WorldId) -> Option<Role> {
        self.mains.find(|main| *main == world)
    }

    /// Role whose link set contains `world` (main or linked).
    #[must_use]
    pub fn role_of(&self, world: WorldId) -> Option<Role> {
        self.links.find(|set| set.contains(&world))
    }

    /// Every world taking part in this match.
    pub fn world_ids(&self) -> impl Iterator<Item = WorldId> + '_ {
        self.links.iter().flat_map(|(_, set)| set.iter().copied())
    }
}

// =============================================================================
// REGION SNAPSHOT
// =============================================================================

/// Immutable set of standings the engine works on, ordered by match id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSnapshot {
    standings: Vec<Standing>,
}

impl RegionSnapshot {
    /// Create a snapshot from standings in any order.
    #[must_use]
    pub fn new(mut standings: Vec<Standing>) -> Self {
        standings.sort_by_key(Standing::match_id);
        Self { standings }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.standings.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.standings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    /// Every world of every standing.
    #[must_use]
    pub fn world_ids(&self) -> BTreeSet<WorldId> {
        self.standings.iter().flat_map(Standing::world_ids).collect()
    }

    /// Verify that `region` has exactly one standing per tier `1..=N`.
    ///
    /// Reports the first missing tier as `StandingNotFound`.
    pub fn check_contiguous(&self, region: u8) -> Result<(), HeraldError> {
        let tiers: Vec<u8> = self
            .standings
            .iter()
            .map(Standing::match_id)
            .filter(|id| id.region == region)
            .map(|id| id.tier)
            .collect();

        for (expected, tier) in (1..=u8::MAX).zip(tiers.iter().copied()) {
            if tier != expected {
                return Err(HeraldError::StandingNotFound(MatchId::new(region, expected)));
            }
        }
        Ok(())
    }
}

// =============================================================================
// PREDICTION
// =============================================================================

/// One role of the predicted lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// The main world holding the role.
    pub main: WorldId,
    /// Worlds linked to the main world, main excluded.
    pub linked: Vec<WorldId>,
}

impl Seat {
    /// Main world followed by its linked worlds.
    pub fn worlds(&self) -> impl Iterator<Item = WorldId> + '_ {
        std::iter::once(self.main).chain(self.linked.iter().copied())
    }
}

/// Predicted next-cycle matchup for one world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// The world the prediction was made for.
    pub world: WorldId,
    /// Reset instant at which the predicted matchup starts.
    pub reset: DateTime<Utc>,
    /// Region of the predicted match.
    pub region: u8,
    /// Tier of the predicted match.
    pub tier: u8,
    /// Role the world will hold.
    pub role: Role,
    /// All three roles of the predicted match.
    pub lineup: RoleMap<Seat>,
    /// Display names of every world in the lineup.
    pub names: BTreeMap<WorldId, String>,
}

impl Prediction {
    /// Main worlds of the lineup.
    #[must_use]
    pub fn mains(&self) -> RoleMap<WorldId> {
        RoleMap::from_fn(|role| self.lineup[role].main)
    }

    /// Display name of a lineup world.
    #[must_use]
    pub fn name(&self, world: WorldId) -> Option<&str> {
        self.names.get(&world).map(String::as_str)
    }

    /// The predicted match id.
    #[must_use]
    pub fn match_id(&self) -> MatchId {
        MatchId::new(self.region, self.tier)
    }
}

// =============================================================================
// NAME LOOKUP
// =============================================================================

/// Resolves world ids to display names.
///
/// Implemented for the plain maps the app builds from the worlds endpoint;
/// tests can supply their own tables.
pub trait NameLookup {
    fn name_of(&self, world: WorldId) -> Option<&str>;
}

impl NameLookup for BTreeMap<WorldId, String> {
    fn name_of(&self, world: WorldId) -> Option<&str> {
        self.get(&world).map(String::as_str)
    }
}

impl<S: BuildHasher> NameLookup for HashMap<WorldId, String, S> {
    fn name_of(&self, world: WorldId) -> Option<&str> {
        self.get(&world).map(String::as_str)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Herald core.
///
/// - No silent failures
/// - Missing records are fatal: the engine never guesses a fallback
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeraldError {
    /// A standing the snapshot should contain is absent.
    #[error("Standing not found: {0}")]
    StandingNotFound(MatchId),

    /// No display name is known for a world.
    #[error("No name for world {0}")]
    NameNotFound(WorldId),

    /// No population/name record is known for a world.
    #[error("No world info for world {0}")]
    WorldInfoNotFound(WorldId),

    /// The world does not take part in the given match.
    #[error("World {world} does not take part in match {match_id}")]
    NotParticipating { world: WorldId, match_id: MatchId },

    /// A standing violates its role invariants.
    #[error("Malformed standing: {0}")]
    MalformedStanding(String),

    /// A match id string could not be parsed.
    #[error("Invalid match id: {0:?}")]
    InvalidMatchId(String),

    /// A population level string is unknown.
    #[error("Unknown population level: {0:?}")]
    UnknownPopulation(String),
}

// =============================================================================
// TESTS
// =============================================================================
