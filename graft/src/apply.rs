//! Applying an edit script to a live child list.
//!
//! The script is positional: it talks about elements of the *original* live
//! and target sequences. The applier walks it left to right and translates
//! every position into an index of the sequence as it stands after the
//! mutations made so far.

use rapidhash::RapidHashMap as HashMap;

use crate::script::{Edit, EditScript};
use crate::tree::{LiveTree, NodeSync, TreeMut};
use crate::walk::{Morph, Reconciler};
use crate::{debug, trace};

/// How far the applier has got through a script.
///
/// `old` and `new` count consumed live and target elements. Every delete
/// shifts the not-yet-visited live elements one slot left and every insert
/// one slot right, so original live element `old` currently sits at
/// `old + inserted - deleted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchCursor {
    /// Live elements consumed (deleted or updated).
    pub old: usize,
    /// Target elements consumed (inserted or updated).
    pub new: usize,
    /// Inserts applied so far.
    pub inserted: usize,
    /// Deletes applied so far.
    pub deleted: usize,
}

impl PatchCursor {
    /// Index, in the mutated sequence, of the next unvisited live element.
    /// This is also where the next insert goes.
    #[inline]
    pub fn position(&self) -> usize {
        self.old + self.inserted - self.deleted
    }

    /// Net change in sequence length so far.
    #[inline]
    pub fn shift(&self) -> isize {
        self.inserted as isize - self.deleted as isize
    }

    /// Advance past one op.
    #[inline]
    pub fn step(&mut self, edit: Edit) {
        match edit {
            Edit::Insert => {
                self.new += 1;
                self.inserted += 1;
            }
            Edit::Delete => {
                self.old += 1;
                self.deleted += 1;
            }
            Edit::Update => {
                self.old += 1;
                self.new += 1;
            }
        }
    }
}

/// Keyed live children that are deleted in one place and inserted again in
/// another, indexed both ways.
#[derive(Debug, Default)]
struct KeyedMoves {
    /// For each target index, the live index it takes its node from.
    source_of: Vec<Option<usize>>,
    /// For each live index, whether it is moved rather than deleted.
    is_moved: Vec<bool>,
    count: usize,
}

impl KeyedMoves {
    fn source(&self, new: usize) -> Option<usize> {
        self.source_of.get(new).copied().flatten()
    }

    fn moved(&self, old: usize) -> bool {
        self.is_moved.get(old).copied().unwrap_or(false)
    }
}

/// Pair every deleted keyed live node with an inserted, compatible target
/// node carrying the same key.
fn plan_moves<H: LiveTree>(
    host: &H,
    live: &[H::Node],
    target: &[H::Node],
    script: &EditScript,
) -> KeyedMoves {
    let mut deleted: HashMap<&H::Key, usize> = HashMap::default();
    let mut inserted = Vec::new();
    let mut cursor = PatchCursor::default();

    for edit in script.iter() {
        match edit {
            Edit::Delete => {
                if let Some(key) = host.key(live[cursor.old]) {
                    deleted.insert(key, cursor.old);
                }
            }
            Edit::Insert => inserted.push(cursor.new),
            Edit::Update => {}
        }
        cursor.step(edit);
    }

    let mut moves = KeyedMoves::default();
    if deleted.is_empty() {
        return moves;
    }
    moves.source_of = vec![None; target.len()];
    moves.is_moved = vec![false; live.len()];

    for new in inserted {
        if let Some(key) = host.key(target[new])
            && let Some(old) = deleted.remove(&key)
            && host.compatible(live[old], target[new])
        {
            moves.source_of[new] = Some(old);
            moves.is_moved[old] = true;
            moves.count += 1;
        }
    }
    moves
}

impl<H> Reconciler<'_, H>
where
    H: TreeMut + NodeSync,
{
    /// Apply `script`, which aligns `live` (the current children of `parent`)
    /// with `target`.
    pub(crate) fn apply_script(
        &mut self,
        parent: H::Node,
        live: &[H::Node],
        target: &[H::Node],
        script: &EditScript,
    ) {
        debug_assert!(script.is_valid_for(live.len(), target.len()));

        let moves = if self.config.keyed_moves {
            plan_moves(&*self.host, live, target, script)
        } else {
            KeyedMoves::default()
        };

        if moves.count == 0 && script.count(Edit::Update) == 0 {
            // Nothing survives: drop the whole list at once.
            debug!(?parent, removed = live.len(), added = target.len(), "replace all children");
            self.host.clear_children(parent);
            for &node in target {
                self.host.insert_before(parent, node, None);
            }
            self.stats.cleared += 1;
            self.stats.deleted += live.len();
            self.stats.inserted += target.len();
            return;
        }

        // The children of `parent` as they stand after each op.
        let mut current: Vec<H::Node> = live.to_vec();
        // Live nodes already taken out of `parent`, either deleted or moved.
        let mut detached = vec![false; live.len()];
        let mut cursor = PatchCursor::default();

        for edit in script.iter() {
            let at = cursor.position();
            match edit {
                Edit::Delete => {
                    let node = live[cursor.old];
                    if !detached[cursor.old] {
                        debug_assert_eq!(current.get(at), Some(&node));
                        trace!(?parent, ?node, at, "delete");
                        self.host.remove_child(parent, node);
                        current.remove(at);
                        detached[cursor.old] = true;
                    }
                    if !moves.moved(cursor.old) {
                        self.stats.deleted += 1;
                    }
                }
                Edit::Insert => {
                    let wanted = target[cursor.new];
                    let node = match moves.source(cursor.new) {
                        Some(old) => {
                            let node = live[old];
                            if !detached[old] {
                                // Still attached, further along than `at`.
                                if let Some(from) = current[at..].iter().position(|&n| n == node) {
                                    current.remove(at + from);
                                }
                                self.host.remove_child(parent, node);
                                detached[old] = true;
                            }
                            trace!(?parent, ?node, at, "move keyed child");
                            self.stats.moved += 1;
                            self.walk_pair(wanted, node).node()
                        }
                        None => {
                            trace!(?parent, node = ?wanted, at, "insert");
                            self.stats.inserted += 1;
                            wanted
                        }
                    };
                    let reference = current.get(at).copied();
                    self.host.insert_before(parent, node, reference);
                    current.insert(at, node);
                }
                Edit::Update => {
                    let node = live[cursor.old];
                    debug_assert_eq!(current.get(at), Some(&node));
                    if let Morph::Replaced(new) = self.walk_pair(target[cursor.new], node) {
                        trace!(?parent, ?node, ?new, at, "replace");
                        self.host.replace_child(parent, new, node);
                        current[at] = new;
                        self.stats.replaced += 1;
                    }
                }
            }
            cursor.step(edit);
        }
    }
}


#[cfg(test)]
mod random_lists {
    use super::*;
    use crate::test_tree::TestTree;
    use crate::walk::ReconcileConfig;
    use proptest::prelude::*;

    type Item = (u8, Option<u8>);

    /// Up to 13 children drawn from two tags and ten keys; a repeated key is
    /// dropped so keys stay unique among siblings.
    fn item_list() -> impl Strategy<Value = Vec<Item>> {
        proptest::collection::vec((0u8..2, proptest::option::of(0u8..10)), 0..14).prop_map(
            |mut items| {
                let mut seen = [false; 10];
                for (_, key) in &mut items {
                    if let Some(k) = *key {
                        if seen[k as usize] {
                            *key = None;
                        } else {
                            seen[k as usize] = true;
                        }
                    }
                }
                items
            },
        )
    }

    fn notation(items: &[Item]) -> String {
        let children: Vec<String> = items
            .iter()
            .map(|(tag, key)| match key {
                Some(key) => format!("t{tag}#k{key}"),
                None => format!("t{tag}"),
            })
            .collect();
        format!("r({})", children.join(" "))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        // Small bounds push most lists through the approximate aligner, so
        // both strategies and the move planner get exercised. The applier's
        // own position checks are debug assertions and fire here too.
        #[test]
        fn test_random_child_lists_reconcile(
            live_items in item_list(),
            target_items in item_list(),
            max_edit_distance in 0usize..6,
            keyed_moves in any::<bool>(),
            trim_common_affixes in any::<bool>(),
        ) {
            let mut tree = TestTree::new();
            let live = tree.parse(&notation(&live_items));
            let target = tree.parse(&notation(&target_items));
            let expected = tree.render(target);
            let before = tree.child_vec(live);

            let config = ReconcileConfig {
                max_edit_distance,
                trim_common_affixes,
                keyed_moves,
            };
            let morph = Reconciler::with_config(&mut tree, config).reconcile(live, target);
            prop_assert_eq!(morph, Ok(Morph::Kept(live)));
            prop_assert_eq!(tree.render(live), expected);

            if keyed_moves {
                let after = tree.child_vec(live);
                for (new, (tag, key)) in target_items.iter().enumerate() {
                    let Some(key) = key else { continue };
                    let same = live_items
                        .iter()
                        .position(|(t, k)| t == tag && k.as_ref() == Some(key));
                    if let Some(old) = same {
                        prop_assert_eq!(
                            after[new],
                            before[old],
                            "key {} at target index {} was recreated",
                            key,
                            new
                        );
                    }
                }
            }
        }
    }
}
