//! # Property-Based Tests
//!
//! Ranking and prediction invariants over randomly scored regions.

use chrono::{DateTime, TimeZone, Utc};
use herald_core::{
    MatchId, MatchupPredictor, RankingResolver, RegionSnapshot, Role, RoleMap, Standing, WorldId,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// FIXTURES
// =============================================================================

/// Tier `t` has mains `10t`, `10t+1`, `10t+2`; green carries one linked world `500+t`.
fn region(scores: &[i64]) -> RegionSnapshot {
    let standings = scores
        .chunks(3)
        .zip(1u8..)
        .map(|(chunk, tier)| {
            let base = u32::from(tier) * 10;
            let mains = RoleMap::new(WorldId(base), WorldId(base + 1), WorldId(base + 2));
            let links = RoleMap::new(
                vec![WorldId(base), WorldId(500 + u32::from(tier))],
                vec![WorldId(base + 1)],
                vec![WorldId(base + 2)],
            );
            Standing::new(
                MatchId::new(1, tier),
                RoleMap::new(chunk[0], chunk[1], chunk[2]),
                mains,
                links,
            )
            .expect("valid standing")
        })
        .collect();
    RegionSnapshot::new(standings)
}

fn names_for(snapshot: &RegionSnapshot) -> BTreeMap<WorldId, String> {
    snapshot
        .world_ids()
        .into_iter()
        .map(|id| (id, format!("World {}", id.0)))
        .collect()
}

fn reset() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 6, 2, 0, 0)
        .single()
        .expect("valid reset")
}

/// Tier count, scores for every role, and the index of one main world.
fn scored_region() -> impl Strategy<Value = (usize, Vec<i64>, usize)> {
    (1usize..8).prop_flat_map(|tiers| {
        (
            Just(tiers),
            vec(0i64..500, tiers * 3),
            0..tiers * 3,
        )
    })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Ranking is a permutation of the roles with non-increasing scores.
    #[test]
    fn ranking_is_a_sorted_permutation(scores in vec(-1000i64..1000, 3)) {
        let standing = Standing::without_links(
            MatchId::new(2, 1),
            RoleMap::new(scores[0], scores[1], scores[2]),
            RoleMap::new(WorldId(1), WorldId(2), WorldId(3)),
        )
        .expect("valid standing");

        let ranking = RankingResolver::ranking_of(&standing);
        let distinct: BTreeSet<_> = ranking.iter().collect();
        prop_assert_eq!(distinct.len(), 3);

        let ranked: Vec<i64> = ranking.iter().map(|role| standing.scores()[*role]).collect();
        prop_assert!(ranked[0] >= ranked[1]);
        prop_assert!(ranked[1] >= ranked[2]);
    }

    /// Every predicted lineup holds three distinct main worlds, with the
    /// target in the role it was assigned.
    #[test]
    fn lineup_is_pairwise_distinct((tiers, scores, index) in scored_region()) {
        let snapshot = region(&scores);
        let tier = (index / 3 + 1) as u8;
        let world = WorldId(u32::from(tier) * 10 + (index % 3) as u32);

        let prediction = MatchupPredictor::predict(
            world,
            &snapshot,
            MatchId::new(1, tier),
            reset(),
            &names_for(&snapshot),
        )
        .expect("prediction");

        let mains = prediction.mains();
        prop_assert_ne!(mains.green, mains.blue);
        prop_assert_ne!(mains.blue, mains.red);
        prop_assert_ne!(mains.green, mains.red);
        prop_assert_eq!(mains[prediction.role], world);

        prop_assert!(prediction.tier >= 1);
        prop_assert!(usize::from(prediction.tier) <= tiers);
        prop_assert!(prediction.tier.abs_diff(tier) <= 1);
    }

    /// A linked world is predicted into the same seat as its main world.
    #[test]
    fn linked_world_follows_its_main((_tiers, scores, index) in scored_region()) {
        let snapshot = region(&scores);
        let tier = (index / 3 + 1) as u8;
        let main = WorldId(u32::from(tier) * 10);
        let linked = WorldId(500 + u32::from(tier));
        let names = names_for(&snapshot);

        let by_main =
            MatchupPredictor::predict(main, &snapshot, MatchId::new(1, tier), reset(), &names)
                .expect("prediction");
        let by_linked =
            MatchupPredictor::predict(linked, &snapshot, MatchId::new(1, tier), reset(), &names)
                .expect("prediction");

        prop_assert_eq!(by_main.tier, by_linked.tier);
        prop_assert_eq!(by_main.role, by_linked.role);
        prop_assert_eq!(&by_main.lineup, &by_linked.lineup);
        prop_assert_eq!(&by_linked.lineup[by_linked.role].linked, &vec![linked]);
    }

    /// Seats never list their own main world among the linked worlds.
    #[test]
    fn linked_groups_exclude_the_main((_tiers, scores, _index) in scored_region()) {
        let snapshot = region(&scores);
        for standing in snapshot.iter() {
            for role in Role::ALL {
                let main = standing.main(role);
                let linked = RankingResolver::linked_groups_of(&snapshot, main);
                prop_assert!(!linked.contains(&main));
            }
        }
    }

    /// Same snapshot and world produce the same prediction.
    #[test]
    fn prediction_is_deterministic((_tiers, scores, index) in scored_region()) {
        let snapshot = region(&scores);
        let tier = (index / 3 + 1) as u8;
        let world = WorldId(u32::from(tier) * 10 + (index % 3) as u32);
        let names = names_for(&snapshot);

        let first = MatchupPredictor::predict(world, &snapshot, MatchId::new(1, tier), reset(), &names);
        let second = MatchupPredictor::predict(world, &snapshot, MatchId::new(1, tier), reset(), &names);
        prop_assert_eq!(first, second);
    }
}
