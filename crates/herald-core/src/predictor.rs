//! # Predictor Module
//!
//! Predicts the next matchup of a world from the current standings.
//!
//! A world's own outcome fixes its next tier and role:
//!
//! | Finish | Tier            | Next tier | Next role |
//! |--------|-----------------|-----------|-----------|
//! | first  | top             | same      | green     |
//! | first  | other           | one up    | green     |
//! | second | any             | same      | blue      |
//! | third  | bottom          | same      | green     |
//! | third  | other           | one down  | red       |
//!
//! The two remaining roles of the next tier are back-filled from the
//! neighboring tiers:
//! - green: winner of the tier above (tier 1 sources itself)
//! - blue: second place of the next tier itself
//! - red: loser of the tier below (the bottom tier sources itself)
//!
//! When the world lost the bottom tier it already holds green, and the red
//! source would be the world itself; red is then filled from the green source.

use crate::primitives::TOP_TIER;
use crate::ranking::{Place, RankingResolver};
use crate::{
    HeraldError, MatchId, NameLookup, Prediction, RegionSnapshot, Role, RoleMap, Seat, WorldId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// How the current match ends for a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Won the top tier.
    Crowned,
    /// Won a lower tier.
    Promoted,
    /// Finished second.
    Held,
    /// Lost the bottom tier.
    Floored,
    /// Lost a higher tier.
    Relegated,
}

impl Outcome {
    /// Classify a finish in `tier` of a region with `tier_count` tiers.
    #[must_use]
    pub fn classify(place: Place, tier: u8, tier_count: u8) -> Self {
        match place {
            Place::First if tier == TOP_TIER => Outcome::Crowned,
            Place::First => Outcome::Promoted,
            Place::Second => Outcome::Held,
            Place::Third if tier == tier_count => Outcome::Floored,
            Place::Third => Outcome::Relegated,
        }
    }

    /// Tier the world plays in next, `None` when it would leave the ladder.
    #[must_use]
    pub fn next_tier(self, tier: u8) -> Option<u8> {
        match self {
            Outcome::Promoted => tier.checked_sub(1).filter(|next| *next >= TOP_TIER),
            Outcome::Relegated => tier.checked_add(1),
            Outcome::Crowned | Outcome::Held | Outcome::Floored => Some(tier),
        }
    }

    /// Role the world holds next.
    #[must_use]
    pub fn next_role(self) -> Role {
        match self {
            Outcome::Crowned | Outcome::Promoted | Outcome::Floored => Role::Green,
            Outcome::Held => Role::Blue,
            Outcome::Relegated => Role::Red,
        }
    }
}

/// Matchup prediction engine.
pub struct MatchupPredictor;

impl MatchupPredictor {
    /// Outcome of `world`'s current match.
    ///
    /// `world` may be a main world or one of its linked worlds.
    pub fn outcome_of(
        world: WorldId,
        snapshot: &RegionSnapshot,
        current: MatchId,
    ) -> Result<Outcome, HeraldError> {
        Self::finish_of(world, snapshot, current).map(|(_, outcome)| outcome)
    }

    /// Main world `world` plays for, and how its match ends.
    fn finish_of(
        world: WorldId,
        snapshot: &RegionSnapshot,
        current: MatchId,
    ) -> Result<(WorldId, Outcome), HeraldError> {
        let standing = RankingResolver::require_standing(snapshot, current)?;
        let role = standing
            .role_of(world)
            .ok_or(HeraldError::NotParticipating {
                world,
                match_id: current,
            })?;
        let tier_count = RankingResolver::region_tier_count(snapshot, current.region);
        let outcome = Outcome::classify(
            RankingResolver::place_of(standing, role),
            current.tier,
            tier_count,
        );
        Ok((standing.main(role), outcome))
    }

    /// Predict the next matchup of `world`, currently playing in `current`.
    ///
    /// `reset` is stamped on the prediction as given; the engine never reads
    /// a clock.
    pub fn predict<N: NameLookup + ?Sized>(
        world: WorldId,
        snapshot: &RegionSnapshot,
        current: MatchId,
        reset: DateTime<Utc>,
        names: &N,
    ) -> Result<Prediction, HeraldError> {
        let (main, outcome) = Self::finish_of(world, snapshot, current)?;
        let region = current.region;
        let tier_count = RankingResolver::region_tier_count(snapshot, region);
        let next_tier = outcome
            .next_tier(current.tier)
            .ok_or(HeraldError::StandingNotFound(current))?;
        let next_role = outcome.next_role();

        let mains = RoleMap::try_from_fn(|seat| {
            if seat == next_role {
                return Ok(main);
            }
            match seat {
                Role::Green => Self::green_source(snapshot, region, next_tier),
                Role::Blue => RankingResolver::placed(snapshot, region, next_tier, Place::Second),
                Role::Red if outcome == Outcome::Floored => {
                    Self::green_source(snapshot, region, next_tier)
                }
                Role::Red => Self::red_source(snapshot, region, next_tier, tier_count),
            }
        })?;

        let lineup = mains.map(|_, main| Seat {
            main,
            linked: RankingResolver::linked_groups_of(snapshot, main),
        });

        let mut resolved = BTreeMap::new();
        for (_, seat) in lineup.iter() {
            for lineup_world in seat.worlds() {
                let name = names
                    .name_of(lineup_world)
                    .ok_or(HeraldError::NameNotFound(lineup_world))?;
                resolved.insert(lineup_world, name.to_string());
            }
        }

        Ok(Prediction {
            world,
            reset,
            region,
            tier: next_tier,
            role: next_role,
            lineup,
            names: resolved,
        })
    }

    /// Winner of the tier above `tier`; the top tier sources itself.
    fn green_source(snapshot: &RegionSnapshot, region: u8, tier: u8) -> Result<WorldId, HeraldError> {
        let source = if tier <= TOP_TIER { TOP_TIER } else { tier - 1 };
        RankingResolver::placed(snapshot, region, source, Place::First)
    }

    /// Loser of the tier below `tier`; the bottom tier sources itself.
    fn red_source(
        snapshot: &RegionSnapshot,
        region: u8,
        tier: u8,
        tier_count: u8,
    ) -> Result<WorldId, HeraldError> {
        let source = if tier >= tier_count { tier } else { tier + 1 };
        RankingResolver::placed(snapshot, region, source, Place::Third)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Standing;

    #[test]
    fn classify_covers_every_boundary() {
        assert_eq!(Outcome::classify(Place::First, 1, 4), Outcome::Crowned);
        assert_eq!(Outcome::classify(Place::First, 3, 4), Outcome::Promoted);
        assert_eq!(Outcome::classify(Place::Second, 1, 4), Outcome::Held);
        assert_eq!(Outcome::classify(Place::Second, 4, 4), Outcome::Held);
        assert_eq!(Outcome::classify(Place::Third, 4, 4), Outcome::Floored);
        assert_eq!(Outcome::classify(Place::Third, 2, 4), Outcome::Relegated);
    }

    #[test]
    fn single_tier_region_is_both_top_and_bottom() {
        assert_eq!(Outcome::classify(Place::First, 1, 1), Outcome::Crowned);
        assert_eq!(Outcome::classify(Place::Third, 1, 1), Outcome::Floored);
    }

    #[test]
    fn outcomes_move_at_most_one_tier() {
        assert_eq!(Outcome::Promoted.next_tier(3), Some(2));
        assert_eq!(Outcome::Relegated.next_tier(3), Some(4));
        assert_eq!(Outcome::Crowned.next_tier(1), Some(1));
        assert_eq!(Outcome::Floored.next_tier(4), Some(4));
        assert_eq!(Outcome::Held.next_tier(2), Some(2));
    }

    #[test]
    fn next_tier_never_leaves_the_ladder() {
        assert_eq!(Outcome::Promoted.next_tier(TOP_TIER), None);
        assert_eq!(Outcome::Promoted.next_tier(0), None);
        assert_eq!(Outcome::Relegated.next_tier(u8::MAX), None);
        assert_eq!(Outcome::Held.next_tier(u8::MAX), Some(u8::MAX));
    }

    #[test]
    fn outcome_of_linked_world_follows_its_main() {
        let standing = Standing::new(
            MatchId::new(1, 1),
            RoleMap::new(10, 30, 20),
            RoleMap::new(WorldId(1), WorldId(2), WorldId(3)),
            RoleMap::new(vec![WorldId(1)], vec![WorldId(2), WorldId(9)], vec![WorldId(3)]),
        )
        .expect("valid standing");
        let snapshot = RegionSnapshot::new(vec![standing]);

        assert_eq!(
            MatchupPredictor::outcome_of(WorldId(9), &snapshot, MatchId::new(1, 1)),
            Ok(Outcome::Crowned)
        );
        assert_eq!(
            MatchupPredictor::outcome_of(WorldId(3), &snapshot, MatchId::new(1, 1)),
            Ok(Outcome::Held)
        );
    }
}
