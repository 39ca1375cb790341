//! Property tests for the two alignment algorithms.
//!
//! 1. The exact search finds a shortest script (checked against an LCS table).
//! 2. Replaying an exact script turns the live sequence into the target.
//! 3. The distance bound is honoured both ways.
//! 4. The approximate aligner always returns a valid script whose matched
//!    pairs agree on tag and key.

use graft::{Edit, EditScript, Signature, approximate_alignment, diff_slices};
use proptest::prelude::*;

fn short_seq() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..4, 0..=8)
}

fn signatures() -> impl Strategy<Value = Vec<(u8, Option<u8>)>> {
    proptest::collection::vec((0u8..3, proptest::option::of(0u8..8)), 0..=24)
}

fn lcs_len(a: &[u8], b: &[u8]) -> usize {
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            table[i][j] = if a[i] == b[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }
    table[0][0]
}

fn replay(script: &EditScript, live: &[u8], target: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(target.len());
    let (mut old, mut new) = (0, 0);
    for edit in script.iter() {
        match edit {
            Edit::Insert => {
                out.push(target[new]);
                new += 1;
            }
            Edit::Delete => old += 1,
            Edit::Update => {
                out.push(live[old]);
                old += 1;
                new += 1;
            }
        }
    }
    out
}

fn as_signatures(items: &[(u8, Option<u8>)]) -> Vec<Signature<'_, u8, u8>> {
    items
        .iter()
        .map(|(tag, key)| Signature {
            tag,
            key: key.as_ref(),
        })
        .collect()
}

proptest! {
    #[test]
    fn exact_script_is_shortest(live in short_seq(), target in short_seq()) {
        let script = diff_slices(&live, &target, 50).unwrap();
        prop_assert!(script.is_valid_for(live.len(), target.len()));
        prop_assert_eq!(script.count(Edit::Update), lcs_len(&live, &target));
        for (i, j) in script.matches() {
            prop_assert_eq!(live[i], target[j]);
        }
    }

    #[test]
    fn exact_script_replays_to_target(live in short_seq(), target in short_seq()) {
        let script = diff_slices(&live, &target, 50).unwrap();
        prop_assert_eq!(replay(&script, &live, &target), target);
    }

    #[test]
    fn distance_bound_is_honoured(live in short_seq(), target in short_seq(), bound in 0usize..8) {
        let optimal = live.len() + target.len() - 2 * lcs_len(&live, &target);
        match diff_slices(&live, &target, bound) {
            Ok(script) => {
                prop_assert!(optimal <= bound);
                prop_assert_eq!(script.distance(), optimal);
            }
            Err(exceeded) => {
                prop_assert!(optimal > bound);
                prop_assert_eq!(exceeded.bound, bound);
            }
        }
    }

    #[test]
    fn approximate_script_is_valid(live in signatures(), target in signatures()) {
        let live_sigs = as_signatures(&live);
        let target_sigs = as_signatures(&target);
        let script = approximate_alignment(&live_sigs, &target_sigs);

        prop_assert!(script.is_valid_for(live.len(), target.len()));
        for (i, j) in script.matches() {
            prop_assert_eq!(live[i], target[j], "pair ({}, {}) disagrees", i, j);
        }
    }
}
