//! Response types of the GW2 API.
//!
//! Only the fields the predictor needs are kept; serde ignores the rest
//! (scores, kills, maps, skirmishes).

use herald_core::{HeraldError, MatchId, RegionSnapshot, Role, RoleMap, Standing, WorldId};
use serde::Deserialize;

/// `GET /v2/wvw/matches/overview?world=<id>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchOverview {
    pub id: MatchId,
    pub worlds: RoleMap<WorldId>,
    pub all_worlds: RoleMap<Vec<WorldId>>,
}

impl MatchOverview {
    /// Role of `world` in this match, main or linked.
    pub fn role_of(&self, world: WorldId) -> Option<Role> {
        self.all_worlds.find(|set| set.contains(&world))
    }
}

/// One entry of `GET /v2/wvw/matches?ids=all`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMatch {
    pub id: MatchId,
    pub worlds: RoleMap<WorldId>,
    pub all_worlds: RoleMap<Vec<WorldId>>,
    pub victory_points: RoleMap<i64>,
}

impl ApiMatch {
    pub fn into_standing(self) -> Result<Standing, HeraldError> {
        Standing::new(self.id, self.victory_points, self.worlds, self.all_worlds)
    }
}

/// Standings of one region, checked for a gap-free tier ladder.
pub fn region_snapshot(matches: Vec<ApiMatch>, region: u8) -> Result<RegionSnapshot, HeraldError> {
    let standings = matches
        .into_iter()
        .filter(|m| m.id.region == region)
        .map(ApiMatch::into_standing)
        .collect::<Result<Vec<_>, _>>()?;

    let snapshot = RegionSnapshot::new(standings);
    snapshot.check_contiguous(region)?;
    Ok(snapshot)
}
