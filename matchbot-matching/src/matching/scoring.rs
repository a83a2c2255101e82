use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::Profile;

/// Split a comma-delimited interest list into trimmed, lowercased, deduplicated tokens.
pub fn normalize_interests(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Number of shared interests. Zero when either side has none.
pub fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> usize {
    a.intersection(b).count()
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub profile: Profile,
    pub score: usize,
}

/// Highest score first. The sort is stable, so equal scores keep scan order.
pub fn rank(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by_key(|c| Reverse(c.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::profile;

    #[test]
    fn interests_are_trimmed_lowercased_and_deduplicated() {
        let set = normalize_interests(" Music,chess ,, MUSIC,  ");
        assert_eq!(set, BTreeSet::from(["chess".to_string(), "music".to_string()]));
        assert!(normalize_interests("").is_empty());
        assert!(normalize_interests(" , ,").is_empty());
    }

    #[test]
    fn overlap_counts_common_tokens() {
        let a = normalize_interests("music,chess,hiking");
        let b = normalize_interests("Chess, art, HIKING");
        assert_eq!(overlap(&a, &b), 2);
        assert_eq!(overlap(&a, &BTreeSet::new()), 0);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let mut scored: Vec<ScoredCandidate> = [(1, 0), (2, 2), (3, 1), (4, 2), (5, 0)]
            .into_iter()
            .map(|(id, score)| ScoredCandidate {
                profile: profile(id, Some(25), "Female", "Any", ""),
                score,
            })
            .collect();

        rank(&mut scored);

        let order: Vec<i64> = scored.iter().map(|c| c.profile.user_id).collect();
        assert_eq!(order, vec![2, 4, 3, 1, 5]);
    }
}
