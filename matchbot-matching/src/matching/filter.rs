//! Candidate discovery: gate every other profile against the requester, then rank.

use std::collections::{BTreeSet, HashSet};

use diesel::sqlite::SqliteConnection;
use diesel::QueryResult;

use crate::models::{Profile, UserId};
use crate::store::{interactions, profiles};

use super::scoring::{overlap, rank, ScoredCandidate};

/// Maximum age difference, inclusive.
pub const AGE_WINDOW_YEARS: u32 = 5;

const ANY: &str = "any";

/// `preference` accepts `gender` when it is "any" or names that gender (case-insensitive).
fn preference_accepts(preference: &str, gender: &str) -> bool {
    preference.eq_ignore_ascii_case(ANY) || preference.eq_ignore_ascii_case(gender)
}

/// Each side's preference must accept the other's gender.
fn preferences_compatible(requester: &Profile, candidate: &Profile) -> bool {
    preference_accepts(&requester.preference, &candidate.gender)
        && preference_accepts(&candidate.preference, &requester.gender)
}

/// Fails open when either age is unknown.
fn within_age_window(requester: &Profile, candidate: &Profile) -> bool {
    match (requester.age, candidate.age) {
        (Some(a), Some(b)) => a.abs_diff(b) <= AGE_WINDOW_YEARS,
        _ => true,
    }
}

/// An empty interest list on either side matches anything.
fn interests_compatible(requester: &BTreeSet<String>, candidate: &BTreeSet<String>) -> bool {
    requester.is_empty() || candidate.is_empty() || overlap(requester, candidate) > 0
}

/// Apply all gates to `pool` and return up to `limit` ranked survivors.
///
/// `acted_on` holds everyone the requester already liked or passed. The requester itself is
/// never returned, even if present in `pool`.
pub fn filter_candidates(
    requester: &Profile,
    pool: Vec<Profile>,
    acted_on: &HashSet<UserId>,
    limit: usize,
) -> Vec<ScoredCandidate> {
    let requester_interests = requester.interest_set();

    let mut survivors: Vec<ScoredCandidate> = pool
        .into_iter()
        .filter(|c| c.user_id != requester.user_id)
        .filter(|c| preferences_compatible(requester, c))
        .filter(|c| within_age_window(requester, c))
        .filter(|c| !acted_on.contains(&c.user_id))
        .filter_map(|c| {
            let interests = c.interest_set();
            if !interests_compatible(&requester_interests, &interests) {
                return None;
            }
            let score = overlap(&requester_interests, &interests);
            Some(ScoredCandidate { profile: c, score })
        })
        .collect();

    rank(&mut survivors);
    survivors.truncate(limit);
    survivors
}

/// Fresh candidate list for `user_id`, best first. Unregistered users get an empty list.
pub fn find_candidates(
    conn: &mut SqliteConnection,
    user_id: UserId,
    limit: usize,
) -> QueryResult<Vec<ScoredCandidate>> {
    let Some(requester) = profiles::get_profile(conn, user_id)? else {
        return Ok(vec![]);
    };

    let pool = profiles::list_profiles_except(conn, user_id)?;
    let acted_on = interactions::acted_on(conn, user_id)?;

    let candidates = filter_candidates(&requester, pool, &acted_on, limit);
    tracing::debug!(
        user_id,
        returned = candidates.len(),
        "candidates computed"
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{self, profile};

    fn ids(candidates: &[ScoredCandidate]) -> Vec<UserId> {
        candidates.iter().map(|c| c.profile.user_id).collect()
    }

    #[test]
    fn close_in_age_with_a_shared_interest_scores_one() {
        let requester = profile(1, Some(25), "Male", "Female", "music,chess");
        let pool = vec![
            profile(2, Some(29), "Female", "Any", "chess,art"),
            profile(3, Some(32), "Female", "Any", "music,chess"),
        ];

        let result = filter_candidates(&requester, pool, &HashSet::new(), 10);
        assert_eq!(ids(&result), vec![2]);
        assert_eq!(result[0].score, 1);
    }

    #[test]
    fn age_window_is_inclusive_at_five() {
        let requester = profile(1, Some(30), "Male", "Any", "");
        let pool = vec![
            profile(2, Some(35), "Female", "Any", ""),
            profile(3, Some(25), "Female", "Any", ""),
            profile(4, Some(36), "Female", "Any", ""),
            profile(5, Some(24), "Female", "Any", ""),
        ];

        let result = filter_candidates(&requester, pool, &HashSet::new(), 10);
        assert_eq!(ids(&result), vec![2, 3]);
    }

    #[test]
    fn unknown_age_fails_open() {
        let requester = profile(1, None, "Male", "Any", "");
        let pool = vec![profile(2, Some(80), "Female", "Any", "")];
        assert_eq!(ids(&filter_candidates(&requester, pool, &HashSet::new(), 10)), vec![2]);

        let requester = profile(1, Some(20), "Male", "Any", "");
        let pool = vec![profile(2, None, "Female", "Any", "")];
        assert_eq!(ids(&filter_candidates(&requester, pool, &HashSet::new(), 10)), vec![2]);
    }

    #[test]
    fn extreme_stored_ages_do_not_overflow() {
        let requester = profile(1, Some(i32::MAX), "Male", "Any", "");
        let pool = vec![
            profile(2, Some(i32::MIN), "Female", "Any", ""),
            profile(3, Some(i32::MAX - 5), "Female", "Any", ""),
        ];
        let result = filter_candidates(&requester, pool, &HashSet::new(), 10);
        assert_eq!(ids(&result), vec![3]);
    }

    #[test]
    fn preference_gate_checks_both_sides_case_insensitively() {
        let requester = profile(1, Some(25), "Male", "female", "");
        let pool = vec![
            profile(2, Some(25), "Female", "Male", ""),
            profile(3, Some(25), "Male", "Any", ""),
            profile(4, Some(25), "FEMALE", "Female", ""),
            profile(5, Some(25), "female", "ANY", ""),
        ];

        let result = filter_candidates(&requester, pool, &HashSet::new(), 10);
        assert_eq!(ids(&result), vec![2, 5]);
    }

    #[test]
    fn preference_gate_gives_the_same_answer_from_both_sides() {
        let a = profile(1, Some(25), "Female", "Male", "");
        let b = profile(2, Some(25), "Other", "Any", "");
        assert!(filter_candidates(&a, vec![b.clone()], &HashSet::new(), 10).is_empty());
        assert!(filter_candidates(&b, vec![a], &HashSet::new(), 10).is_empty());

        let c = profile(3, Some(25), "Male", "Female", "");
        let open = profile(4, Some(25), "Female", "Any", "");
        assert_eq!(ids(&filter_candidates(&c, vec![open.clone()], &HashSet::new(), 10)), vec![4]);
        assert_eq!(ids(&filter_candidates(&open, vec![c], &HashSet::new(), 10)), vec![3]);
    }

    #[test]
    fn interest_gate_requires_overlap_only_when_both_sides_have_interests() {
        let requester = profile(1, Some(25), "Male", "Any", "music, chess");
        let pool = vec![
            profile(2, Some(25), "Female", "Any", "art"),
            profile(3, Some(25), "Female", "Any", ""),
            profile(4, Some(25), "Female", "Any", "CHESS"),
        ];
        let result = filter_candidates(&requester, pool, &HashSet::new(), 10);
        assert_eq!(ids(&result), vec![4, 3]);
        assert_eq!(result[0].score, 1);
        assert_eq!(result[1].score, 0);

        let no_interests = profile(1, Some(25), "Male", "Any", "");
        let pool = vec![profile(2, Some(25), "Female", "Any", "art")];
        let result = filter_candidates(&no_interests, pool, &HashSet::new(), 10);
        assert_eq!(ids(&result), vec![2]);
        assert_eq!(result[0].score, 0);
    }

    #[test]
    fn excludes_self_and_prior_actions_and_respects_limit() {
        let requester = profile(1, Some(25), "Male", "Any", "");
        let pool = vec![
            requester.clone(),
            profile(2, Some(25), "Female", "Any", ""),
            profile(3, Some(25), "Female", "Any", ""),
            profile(4, Some(25), "Female", "Any", ""),
            profile(5, Some(25), "Female", "Any", ""),
        ];
        let acted_on = HashSet::from([3]);

        let result = filter_candidates(&requester, pool, &acted_on, 2);
        assert_eq!(ids(&result), vec![2, 4]);
    }

    #[test]
    fn find_candidates_reads_the_store() {
        let pool = test_support::pool();
        let mut conn = pool.get().unwrap();

        test_support::insert(&mut conn, &profile(1, Some(25), "Male", "Female", "music,chess"));
        test_support::insert(&mut conn, &profile(2, Some(26), "Female", "Any", "chess"));
        test_support::insert(&mut conn, &profile(3, Some(27), "Female", "Male", "music,chess"));
        test_support::insert(&mut conn, &profile(4, Some(24), "Female", "Any", "music"));
        test_support::insert(&mut conn, &profile(5, Some(25), "Male", "Any", "music"));

        interactions::record_pass(&mut conn, 1, 4).unwrap();
        // Someone else's like on the requester does not hide them.
        interactions::record_like(&mut conn, 2, 1).unwrap();

        let result = find_candidates(&mut conn, 1, 5).unwrap();
        assert_eq!(ids(&result), vec![3, 2]);
        assert_eq!(result[0].score, 2);

        interactions::record_like(&mut conn, 1, 3).unwrap();
        let result = find_candidates(&mut conn, 1, 1).unwrap();
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn unregistered_or_lonely_requesters_get_nothing() {
        let pool = test_support::pool();
        let mut conn = pool.get().unwrap();

        assert!(find_candidates(&mut conn, 1, 5).unwrap().is_empty());

        test_support::insert(&mut conn, &profile(1, Some(25), "Male", "Any", ""));
        assert!(find_candidates(&mut conn, 1, 5).unwrap().is_empty());
    }
}
