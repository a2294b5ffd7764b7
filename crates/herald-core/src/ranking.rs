//! # Ranking Module
//!
//! Read-only questions about a [`RegionSnapshot`]:
//! - how a tier's three roles rank by victory points
//! - which world finished first, second or third in a tier
//! - which worlds are linked to a main world
//! - how many tiers a region has
//!
//! ## Ties
//!
//! Victory points are real competitive points and ties do not occur in
//! practice. No tie-break rule is defined: equal scores keep the canonical
//! role order (green, blue, red) because the sort is stable.

use crate::{HeraldError, MatchId, RegionSnapshot, Role, Standing, WorldId};

/// Final position of a role within its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Place {
    First,
    Second,
    Third,
}

impl Place {
    /// Index into a ranking.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Place::First => 0,
            Place::Second => 1,
            Place::Third => 2,
        }
    }
}

/// Ranking and lookup operations over a snapshot.
///
/// All operations are pure: no side effects, inputs are never mutated.
pub struct RankingResolver;

impl RankingResolver {
    /// The standing's roles ordered by descending score.
    #[must_use]
    pub fn ranking_of(standing: &Standing) -> [Role; 3] {
        let mut ranking = Role::ALL;
        let scores = standing.scores();
        ranking.sort_by(|a, b| scores[*b].cmp(&scores[*a]));
        ranking
    }

    /// The place a role finished at.
    #[must_use]
    pub fn place_of(standing: &Standing, role: Role) -> Place {
        match Self::ranking_of(standing) {
            [first, _, _] if first == role => Place::First,
            [_, second, _] if second == role => Place::Second,
            _ => Place::Third,
        }
    }

    /// Exact lookup by match id. Absence is not an error here.
    #[must_use]
    pub fn find_standing(snapshot: &RegionSnapshot, match_id: MatchId) -> Option<&Standing> {
        snapshot.iter().find(|s| s.match_id() == match_id)
    }

    /// Like [`RankingResolver::find_standing`], but a missing standing is fatal.
    pub fn require_standing(
        snapshot: &RegionSnapshot,
        match_id: MatchId,
    ) -> Result<&Standing, HeraldError> {
        Self::find_standing(snapshot, match_id).ok_or(HeraldError::StandingNotFound(match_id))
    }

    /// Main world that finished at `place` in `region`'s tier `tier`.
    pub fn placed(
        snapshot: &RegionSnapshot,
        region: u8,
        tier: u8,
        place: Place,
    ) -> Result<WorldId, HeraldError> {
        let standing = Self::require_standing(snapshot, MatchId::new(region, tier))?;
        let role = Self::ranking_of(standing)[place.index()];
        Ok(standing.main(role))
    }

    /// Worlds linked to the main world `world`, `world` itself excluded.
    ///
    /// "Not a main world anywhere", "no links" and "sole member of its link
    /// set" all yield an empty list. Use [`RankingResolver::link_set_of`]
    /// when the first case must be told apart.
    #[must_use]
    pub fn linked_groups_of(snapshot: &RegionSnapshot, world: WorldId) -> Vec<WorldId> {
        Self::link_set_of(snapshot, world).unwrap_or_default()
    }

    /// Worlds linked to the main world `world`, or `None` if `world` is not a
    /// main world in any standing.
    #[must_use]
    pub fn link_set_of(snapshot: &RegionSnapshot, world: WorldId) -> Option<Vec<WorldId>> {
        snapshot.iter().find_map(|standing| {
            standing.role_of_main(world).map(|role| {
                standing
                    .links(role)
                    .iter()
                    .copied()
                    .filter(|linked| *linked != world)
                    .collect()
            })
        })
    }

    /// Number of tiers in `region`. The bottom tier has this number.
    ///
    /// Saturates at `u8::MAX`; a region never holds more tiers than a tier
    /// number can name.
    #[must_use]
    pub fn region_tier_count(snapshot: &RegionSnapshot, region: u8) -> u8 {
        let count = snapshot
            .iter()
            .filter(|s| s.match_id().region == region)
            .count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoleMap;

    fn standing(region: u8, tier: u8, scores: [i64; 3], mains: [u32; 3]) -> Standing {
        Standing::without_links(
            MatchId::new(region, tier),
            RoleMap::new(scores[0], scores[1], scores[2]),
            RoleMap::new(WorldId(mains[0]), WorldId(mains[1]), WorldId(mains[2])),
        )
        .expect("valid standing")
    }

    #[test]
    fn ranking_sorts_by_descending_score() {
        let s = standing(1, 1, [60, 90, 30], [4, 5, 6]);
        assert_eq!(
            RankingResolver::ranking_of(&s),
            [Role::Blue, Role::Green, Role::Red]
        );
    }

    #[test]
    fn ranking_ties_keep_canonical_order() {
        let s = standing(1, 1, [50, 50, 50], [1, 2, 3]);
        assert_eq!(RankingResolver::ranking_of(&s), Role::ALL);
    }

    #[test]
    fn place_of_matches_ranking() {
        let s = standing(1, 1, [10, 30, 20], [1, 2, 3]);
        assert_eq!(RankingResolver::place_of(&s, Role::Blue), Place::First);
        assert_eq!(RankingResolver::place_of(&s, Role::Red), Place::Second);
        assert_eq!(RankingResolver::place_of(&s, Role::Green), Place::Third);
    }

    #[test]
    fn find_standing_absent_is_none() {
        let snapshot = RegionSnapshot::new(vec![standing(1, 1, [3, 2, 1], [1, 2, 3])]);
        assert!(RankingResolver::find_standing(&snapshot, MatchId::new(1, 1)).is_some());
        assert!(RankingResolver::find_standing(&snapshot, MatchId::new(1, 2)).is_none());
        assert!(RankingResolver::find_standing(&snapshot, MatchId::new(2, 1)).is_none());
    }

    #[test]
    fn placed_requires_the_standing() {
        let snapshot = RegionSnapshot::new(vec![standing(1, 1, [3, 2, 1], [1, 2, 3])]);
        assert_eq!(
            RankingResolver::placed(&snapshot, 1, 1, Place::Third),
            Ok(WorldId(3))
        );
        assert_eq!(
            RankingResolver::placed(&snapshot, 1, 2, Place::First),
            Err(HeraldError::StandingNotFound(MatchId::new(1, 2)))
        );
    }

    #[test]
    fn linked_groups_exclude_the_main_world() {
        let s = Standing::new(
            MatchId::new(2, 1),
            RoleMap::new(1, 2, 3),
            RoleMap::new(WorldId(1), WorldId(2), WorldId(3)),
            RoleMap::new(
                vec![WorldId(1)],
                vec![WorldId(7), WorldId(2), WorldId(8)],
                vec![WorldId(3)],
            ),
        )
        .expect("valid standing");
        let snapshot = RegionSnapshot::new(vec![s]);

        assert_eq!(
            RankingResolver::linked_groups_of(&snapshot, WorldId(2)),
            vec![WorldId(7), WorldId(8)]
        );
        assert!(RankingResolver::linked_groups_of(&snapshot, WorldId(1)).is_empty());
    }

    #[test]
    fn linked_groups_collapse_unknown_and_unlinked() {
        // Both collapse to empty; link_set_of keeps them apart.
        let snapshot = RegionSnapshot::new(vec![standing(1, 1, [3, 2, 1], [1, 2, 3])]);

        assert!(RankingResolver::linked_groups_of(&snapshot, WorldId(1)).is_empty());
        assert!(RankingResolver::linked_groups_of(&snapshot, WorldId(99)).is_empty());

        assert_eq!(
            RankingResolver::link_set_of(&snapshot, WorldId(1)),
            Some(Vec::new())
        );
        assert_eq!(RankingResolver::link_set_of(&snapshot, WorldId(99)), None);
    }

    #[test]
    fn linked_world_is_not_a_main_world() {
        let s = Standing::new(
            MatchId::new(1, 1),
            RoleMap::new(1, 2, 3),
            RoleMap::new(WorldId(1), WorldId(2), WorldId(3)),
            RoleMap::new(vec![WorldId(1), WorldId(4)], vec![WorldId(2)], vec![WorldId(3)]),
        )
        .expect("valid standing");
        let snapshot = RegionSnapshot::new(vec![s]);

        assert_eq!(RankingResolver::link_set_of(&snapshot, WorldId(4)), None);
    }

    #[test]
    fn tier_count_is_per_region() {
        let snapshot = RegionSnapshot::new(vec![
            standing(1, 1, [3, 2, 1], [1, 2, 3]),
            standing(1, 2, [3, 2, 1], [4, 5, 6]),
            standing(2, 1, [3, 2, 1], [7, 8, 9]),
        ]);
        assert_eq!(RankingResolver::region_tier_count(&snapshot, 1), 2);
        assert_eq!(RankingResolver::region_tier_count(&snapshot, 2), 1);
        assert_eq!(RankingResolver::region_tier_count(&snapshot, 3), 0);
    }

    #[test]
    fn tier_count_saturates_instead_of_wrapping() {
        let standings = (0..300u32)
            .map(|i| {
                let tier = u8::try_from(i % 255).expect("fits") + 1;
                standing(1, tier, [3, 2, 1], [3 * i + 1, 3 * i + 2, 3 * i + 3])
            })
            .collect();
        let snapshot = RegionSnapshot::new(standings);
        assert_eq!(RankingResolver::region_tier_count(&snapshot, 1), u8::MAX);
    }
}
