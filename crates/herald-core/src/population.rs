//! # Population Module
//!
//! World population levels and the per-region population report model.

use crate::ranking::RankingResolver;
use crate::{HeraldError, RegionSnapshot, Role, WorldId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// POPULATION LEVEL
// =============================================================================

/// Population level reported by the worlds endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PopulationLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    Full,
}

impl PopulationLevel {
    /// 1 (Low) through 5 (Full).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            PopulationLevel::Low => 1,
            PopulationLevel::Medium => 2,
            PopulationLevel::High => 3,
            PopulationLevel::VeryHigh => 4,
            PopulationLevel::Full => 5,
        }
    }

    /// API spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PopulationLevel::Low => "Low",
            PopulationLevel::Medium => "Medium",
            PopulationLevel::High => "High",
            PopulationLevel::VeryHigh => "VeryHigh",
            PopulationLevel::Full => "Full",
        }
    }

    /// Emoji shortcode shown next to the world name.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            PopulationLevel::Full => ":red_square:",
            PopulationLevel::VeryHigh => ":orange_square:",
            PopulationLevel::High => ":yellow_square:",
            PopulationLevel::Medium => ":green_square:",
            PopulationLevel::Low => ":blue_square:",
        }
    }
}

impl fmt::Display for PopulationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PopulationLevel {
    type Err = HeraldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(PopulationLevel::Low),
            "Medium" => Ok(PopulationLevel::Medium),
            "High" => Ok(PopulationLevel::High),
            "VeryHigh" => Ok(PopulationLevel::VeryHigh),
            "Full" => Ok(PopulationLevel::Full),
            other => Err(HeraldError::UnknownPopulation(other.to_string())),
        }
    }
}

/// Direction of a population change since the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

impl Trend {
    #[must_use]
    pub fn between(current: PopulationLevel, previous: PopulationLevel) -> Self {
        match current.rank().cmp(&previous.rank()) {
            std::cmp::Ordering::Greater => Trend::Rising,
            std::cmp::Ordering::Less => Trend::Falling,
            std::cmp::Ordering::Equal => Trend::Steady,
        }
    }

    /// Arrow emoji shortcode.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Trend::Rising => ":arrow_upper_right:",
            Trend::Falling => ":arrow_lower_right:",
            Trend::Steady => ":left_right_arrow:",
        }
    }
}

// =============================================================================
// WORLD INFO
// =============================================================================

/// Name and population of a world, as served by the worlds endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub id: WorldId,
    pub name: String,
    pub population: PopulationLevel,
}

// =============================================================================
// REGION POPULATION
// =============================================================================

/// Population of every world in a region, grouped by main world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionPopulation {
    /// The home world, highlighted in reports.
    pub world: WorldId,
    /// Next relink instant, when a relink schedule is known.
    pub relink: Option<DateTime<Utc>>,
    /// Linked worlds per main world, main excluded.
    pub links: BTreeMap<WorldId, Vec<WorldId>>,
    pub population: BTreeMap<WorldId, PopulationLevel>,
    pub names: BTreeMap<WorldId, String>,
}

impl RegionPopulation {
    /// Build the report model for the worlds of `snapshot`.
    ///
    /// Every world of the snapshot needs an entry in `worlds`.
    pub fn build(
        world: WorldId,
        snapshot: &RegionSnapshot,
        worlds: &[WorldInfo],
        relink: Option<DateTime<Utc>>,
    ) -> Result<Self, HeraldError> {
        let info: BTreeMap<WorldId, &WorldInfo> = worlds.iter().map(|w| (w.id, w)).collect();

        let mut links = BTreeMap::new();
        for standing in snapshot.iter() {
            for role in Role::ALL {
                let main = standing.main(role);
                links.insert(main, RankingResolver::linked_groups_of(snapshot, main));
            }
        }

        let mut population = BTreeMap::new();
        let mut names = BTreeMap::new();
        for id in snapshot.world_ids() {
            let entry = info.get(&id).ok_or(HeraldError::WorldInfoNotFound(id))?;
            population.insert(id, entry.population);
            names.insert(id, entry.name.clone());
        }

        Ok(Self {
            world,
            relink,
            links,
            population,
            names,
        })
    }

    #[must_use]
    pub fn name(&self, world: WorldId) -> Option<&str> {
        self.names.get(&world).map(String::as_str)
    }

    #[must_use]
    pub fn level(&self, world: WorldId) -> Option<PopulationLevel> {
        self.population.get(&world).copied()
    }

    /// Main worlds sorted by display name.
    #[must_use]
    pub fn mains_by_name(&self) -> Vec<WorldId> {
        let mut mains: Vec<WorldId> = self.links.keys().copied().collect();
        mains.sort_by(|a, b| self.name(*a).cmp(&self.name(*b)).then(a.cmp(b)));
        mains
    }

    /// Every world sorted by display name.
    #[must_use]
    pub fn worlds_by_name(&self) -> Vec<WorldId> {
        let mut worlds: Vec<WorldId> = self.population.keys().copied().collect();
        worlds.sort_by(|a, b| self.name(*a).cmp(&self.name(*b)).then(a.cmp(b)));
        worlds
    }

    /// Whether any main world has more than one linked world.
    #[must_use]
    pub fn has_double_links(&self) -> bool {
        self.links.values().any(|linked| linked.len() > 1)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchId, RoleMap, Standing};
    use chrono::TimeZone;

    fn info(id: u32, name: &str, population: PopulationLevel) -> WorldInfo {
        WorldInfo {
            id: WorldId(id),
            name: name.to_string(),
            population,
        }
    }

    fn snapshot() -> RegionSnapshot {
        let standing = Standing::new(
            MatchId::new(2, 1),
            RoleMap::new(1, 2, 3),
            RoleMap::new(WorldId(2301), WorldId(2104), WorldId(2013)),
            RoleMap::new(
                vec![WorldId(2301), WorldId(2202)],
                vec![WorldId(2104)],
                vec![WorldId(2013), WorldId(2014), WorldId(2012)],
            ),
        )
        .expect("valid standing");
        RegionSnapshot::new(vec![standing])
    }

    fn worlds() -> Vec<WorldInfo> {
        vec![
            info(2301, "Baruch Bay", PopulationLevel::Full),
            info(2202, "Riverside", PopulationLevel::High),
            info(2104, "Vizunah Square", PopulationLevel::VeryHigh),
            info(2013, "Aurora Glade", PopulationLevel::Medium),
            info(2014, "Gunnar's Hold", PopulationLevel::Low),
            info(2012, "Piken Square", PopulationLevel::High),
        ]
    }

    #[test]
    fn levels_rank_and_parse() {
        assert!(PopulationLevel::Full > PopulationLevel::VeryHigh);
        assert_eq!(PopulationLevel::Medium.rank(), 2);
        assert_eq!("VeryHigh".parse::<PopulationLevel>(), Ok(PopulationLevel::VeryHigh));
        assert!("Crowded".parse::<PopulationLevel>().is_err());
    }

    #[test]
    fn trend_compares_ranks() {
        use PopulationLevel::*;
        assert_eq!(Trend::between(Full, High), Trend::Rising);
        assert_eq!(Trend::between(Low, Medium), Trend::Falling);
        assert_eq!(Trend::between(High, High), Trend::Steady);
    }

    #[test]
    fn build_groups_links_by_main() {
        let relink = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).single();
        let report = RegionPopulation::build(WorldId(2104), &snapshot(), &worlds(), relink)
            .expect("build");

        assert_eq!(report.links.len(), 3);
        assert_eq!(report.links[&WorldId(2301)], vec![WorldId(2202)]);
        assert!(report.links[&WorldId(2104)].is_empty());
        assert_eq!(
            report.links[&WorldId(2013)],
            vec![WorldId(2014), WorldId(2012)]
        );
        assert!(report.has_double_links());
        assert_eq!(report.level(WorldId(2014)), Some(PopulationLevel::Low));
    }

    #[test]
    fn mains_sorted_by_name() {
        let relink = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).single();
        let report = RegionPopulation::build(WorldId(2104), &snapshot(), &worlds(), relink)
            .expect("build");

        assert_eq!(
            report.mains_by_name(),
            vec![WorldId(2013), WorldId(2301), WorldId(2104)]
        );
    }

    #[test]
    fn missing_world_info_is_fatal() {
        let relink = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).single();
        let mut partial = worlds();
        partial.retain(|w| w.id != WorldId(2014));

        let result = RegionPopulation::build(WorldId(2104), &snapshot(), &partial, relink);
        assert_eq!(result, Err(HeraldError::WorldInfoNotFound(WorldId(2014))));
    }
}
