//! Child-list diffing: pick an alignment for two sibling sequences.
//!
//! This is a pure step. It reads the host tree to compare nodes but never
//! mutates it; the reconciler applies the resulting script separately.

use smallvec::SmallVec;

use crate::align::{Signature, approximate_alignment};
use crate::myers::shortest_edit_script;
use crate::script::{Edit, EditScript};
use crate::tree::LiveTree;
use crate::walk::ReconcileConfig;
use crate::{debug, trace};

/// Which algorithm produced a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Shortest edit script from the exact search.
    Exact,
    /// Keyed patience alignment, used after the exact search gave up.
    Approximate,
}

/// The alignment of two child lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDiff {
    /// Ops covering both full sequences.
    pub script: EditScript,
    /// How the middle section (between the trimmed prefix and suffix) was
    /// aligned.
    pub strategy: Strategy,
    /// Length of the compatible prefix and suffix kept without searching.
    pub trimmed: (usize, usize),
}

/// Align the live children `live` with the target children `target`.
///
/// Leading and trailing runs of compatible pairs are kept as-is (when
/// [`ReconcileConfig::trim_common_affixes`] is set); the rest goes through
/// the exact search, falling back to the approximate aligner once the edit
/// distance passes [`ReconcileConfig::max_edit_distance`].
pub fn diff_children<H: LiveTree>(
    host: &H,
    live: &[H::Node],
    target: &[H::Node],
    config: &ReconcileConfig,
) -> ChildDiff {
    let (prefix, suffix) = if config.trim_common_affixes {
        common_affixes(host, live, target)
    } else {
        (0, 0)
    };

    let live_mid = &live[prefix..live.len() - suffix];
    let target_mid = &target[prefix..target.len() - suffix];
    trace!(
        prefix,
        suffix,
        live = live_mid.len(),
        target = target_mid.len(),
        "diffing middle section"
    );

    let (middle, strategy) = match shortest_edit_script(
        live_mid.len(),
        target_mid.len(),
        config.max_edit_distance,
        |i, j| host.compatible(live_mid[i], target_mid[j]),
    ) {
        Ok(script) => (script, Strategy::Exact),
        Err(_exceeded) => {
            debug!(exceeded = %_exceeded, "falling back to approximate alignment");
            let live_sigs = signatures(host, live_mid);
            let target_sigs = signatures(host, target_mid);
            (
                approximate_alignment(&live_sigs, &target_sigs),
                Strategy::Approximate,
            )
        }
    };

    let mut script = EditScript::with_capacity(prefix + middle.len() + suffix);
    script.push_n(Edit::Update, prefix);
    script.extend_from(&middle);
    script.push_n(Edit::Update, suffix);

    debug!(
        live = live.len(),
        target = target.len(),
        ?strategy,
        distance = script.distance(),
        "child diff"
    );

    ChildDiff {
        script,
        strategy,
        trimmed: (prefix, suffix),
    }
}

/// Lengths of the longest compatible prefix and, in what is left, the
/// longest compatible suffix.
pub fn common_affixes<H: LiveTree>(host: &H, live: &[H::Node], target: &[H::Node]) -> (usize, usize) {
    let prefix = live
        .iter()
        .zip(target)
        .take_while(|&(&l, &t)| host.compatible(l, t))
        .count();

    let suffix = live[prefix..]
        .iter()
        .rev()
        .zip(target[prefix..].iter().rev())
        .take_while(|&(&l, &t)| host.compatible(l, t))
        .count();

    (prefix, suffix)
}

fn signatures<'h, H: LiveTree>(
    host: &'h H,
    nodes: &[H::Node],
) -> SmallVec<[Signature<'h, H::Tag, H::Key>; 16]> {
    nodes
        .iter()
        .map(|&node| Signature {
            tag: host.tag(node),
            key: host.key(node),
        })
        .collect()
}
