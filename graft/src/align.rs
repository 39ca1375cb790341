//! Approximate keyed alignment, used when the exact search is too expensive.
//!
//! Every target element gets at most one tentative partner in the live
//! sequence:
//! - a keyed element pairs with the live element carrying the same key,
//! - an unkeyed element pairs with the next unclaimed unkeyed live element of
//!   the same tag, first come first served.
//!
//! Tentative pairs may cross. The longest run of pairs whose live indices
//! increase with the target index (found by patience sorting) becomes the set
//! of kept elements; everything else is deleted or inserted. The result is
//! always a valid script but not necessarily a shortest one.

use core::fmt;
use core::hash::Hash;
use std::collections::VecDeque;

use rapidhash::RapidHashMap as HashMap;

use crate::debug;
use crate::script::{Edit, EditScript};

/// What the aligner knows about an element: its tag and optional key.
pub struct Signature<'a, T: ?Sized, K: ?Sized> {
    /// The element's tag.
    pub tag: &'a T,
    /// The element's key, if any.
    pub key: Option<&'a K>,
}

impl<T: ?Sized, K: ?Sized> Clone for Signature<'_, T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized, K: ?Sized> Copy for Signature<'_, T, K> {}

impl<T: ?Sized + fmt::Debug, K: ?Sized + fmt::Debug> fmt::Debug for Signature<'_, T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            Some(key) => write!(f, "{:?}#{:?}", self.tag, key),
            None => write!(f, "{:?}", self.tag),
        }
    }
}

impl<'a, T: ?Sized, K: ?Sized> Signature<'a, T, K> {
    /// An unkeyed signature.
    pub fn new(tag: &'a T) -> Self {
        Self { tag, key: None }
    }

    /// A keyed signature.
    pub fn keyed(tag: &'a T, key: &'a K) -> Self {
        Self {
            tag,
            key: Some(key),
        }
    }
}

/// A tentative match between live element `old` and target element `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    old: usize,
    new: usize,
}

/// Align `live` with `target` without searching for a shortest script.
///
/// Runs in O((n + m) log n) and always returns a script that is valid for
/// `(live.len(), target.len())`.
pub fn approximate_alignment<T, K>(
    live: &[Signature<'_, T, K>],
    target: &[Signature<'_, T, K>],
) -> EditScript
where
    T: ?Sized + Eq + Hash,
    K: ?Sized + Eq + Hash,
{
    let candidates = collect_candidates(live, target);
    let anchors = longest_increasing_run(&candidates);
    debug!(
        live = live.len(),
        target = target.len(),
        candidates = candidates.len(),
        anchors = anchors.len(),
        "approximate alignment"
    );
    emit_script(live.len(), target.len(), &anchors)
}

/// Pair target elements with live elements, in target order.
fn collect_candidates<T, K>(
    live: &[Signature<'_, T, K>],
    target: &[Signature<'_, T, K>],
) -> Vec<Candidate>
where
    T: ?Sized + Eq + Hash,
    K: ?Sized + Eq + Hash,
{
    let mut keyed: HashMap<&K, usize> = HashMap::default();
    let mut unkeyed: HashMap<&T, VecDeque<usize>> = HashMap::default();

    for (old, sig) in live.iter().enumerate() {
        match sig.key {
            // Keys are unique among siblings; the first one wins if not.
            Some(key) => {
                keyed.entry(key).or_insert(old);
            }
            None => unkeyed.entry(sig.tag).or_default().push_back(old),
        }
    }

    let mut candidates = Vec::with_capacity(target.len().min(live.len()));
    for (new, sig) in target.iter().enumerate() {
        let old = match sig.key {
            Some(key) => keyed.remove(&key).filter(|&old| live[old].tag == sig.tag),
            None => unkeyed.get_mut(&sig.tag).and_then(VecDeque::pop_front),
        };
        if let Some(old) = old {
            candidates.push(Candidate { old, new });
        }
    }
    candidates
}

/// Longest subsequence of `candidates` whose `old` indices strictly increase.
///
/// Patience sorting: `piles[len]` is the candidate that ends the best run of
/// length `len + 1` with the smallest `old`; each candidate finds its pile by
/// binary search and links back to the top of the pile before it.
fn longest_increasing_run(candidates: &[Candidate]) -> Vec<Candidate> {
    let mut piles: Vec<usize> = Vec::new();
    let mut back_links: Vec<Option<usize>> = Vec::with_capacity(candidates.len());

    for (idx, candidate) in candidates.iter().enumerate() {
        let pile = piles.partition_point(|&top| candidates[top].old < candidate.old);
        back_links.push(pile.checked_sub(1).map(|prev| piles[prev]));
        if pile == piles.len() {
            piles.push(idx);
        } else {
            piles[pile] = idx;
        }
    }

    let mut run = Vec::with_capacity(piles.len());
    let mut cursor = piles.last().copied();
    while let Some(idx) = cursor {
        run.push(candidates[idx]);
        cursor = back_links[idx];
    }
    run.reverse();
    run
}

/// Turn the kept pairs into a full script. Between two anchors, the live gap
/// is deleted before the target gap is inserted.
fn emit_script(n: usize, m: usize, anchors: &[Candidate]) -> EditScript {
    let mut script = EditScript::with_capacity(n + m - anchors.len());
    let mut old = 0;
    let mut new = 0;

    for anchor in anchors {
        script.push_n(Edit::Delete, anchor.old - old);
        script.push_n(Edit::Insert, anchor.new - new);
        script.push(Edit::Update);
        old = anchor.old + 1;
        new = anchor.new + 1;
    }

    script.push_n(Edit::Delete, n - old);
    script.push_n(Edit::Insert, m - new);
    script
}
