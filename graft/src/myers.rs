//! Exact shortest edit scripts (Myers, "An O(ND) Difference Algorithm and
//! Its Variations", 1986).
//!
//! The search expands one edit distance `d` at a time and keeps, per diagonal
//! `k = x - y`, the furthest `x` reachable with exactly `d` non-matching edits.
//! Each round follows runs of matching elements ("snakes") greedily. The
//! frontier of every round is recorded so the script can be recovered by
//! walking the rounds backwards.
//!
//! Time and space are O((n + m) · d), so the search gives up once `d` passes
//! a caller-supplied bound and reports [`DistanceExceeded`] instead.

use core::fmt;

use crate::script::{Edit, EditScript};
use crate::{debug, trace};

/// The exact search was abandoned because the edit distance is larger than
/// the configured bound.
///
/// This is an expected outcome, not a failure: callers fall back to
/// [`approximate_alignment`](crate::align::approximate_alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceExceeded {
    /// The bound that was exceeded.
    pub bound: usize,
}

impl fmt::Display for DistanceExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edit distance exceeds {}", self.bound)
    }
}

/// Furthest-reaching `x` per diagonal, stored zero-based with an explicit bias
/// so diagonal `k` lives at index `k + bias`.
#[derive(Debug, Clone)]
struct Frontier {
    bias: isize,
    furthest: Vec<isize>,
}

impl Frontier {
    /// A frontier able to address diagonals `-reach..=reach`.
    fn new(reach: usize) -> Self {
        Self {
            bias: reach as isize,
            furthest: vec![0; 2 * reach + 1],
        }
    }

    #[inline(always)]
    fn get(&self, k: isize) -> isize {
        self.furthest[(k + self.bias) as usize]
    }

    #[inline(always)]
    fn set(&mut self, k: isize, x: isize) {
        self.furthest[(k + self.bias) as usize] = x;
    }

    /// Whether round `d` reaches diagonal `k` by moving down (an insert)
    /// from `k + 1` rather than right (a delete) from `k - 1`.
    #[inline(always)]
    fn comes_from_above(&self, k: isize, d: isize) -> bool {
        k == -d || (k != d && self.get(k - 1) < self.get(k + 1))
    }
}

/// Compute a shortest edit script between a live sequence of length `n` and a
/// target sequence of length `m`.
///
/// `eq(i, j)` decides whether live element `i` may be kept for target element
/// `j`. It must be side-effect free. Scripts with more than `max_distance`
/// inserts plus deletes are not searched for.
pub fn shortest_edit_script<F>(
    n: usize,
    m: usize,
    max_distance: usize,
    mut eq: F,
) -> Result<EditScript, DistanceExceeded>
where
    F: FnMut(usize, usize) -> bool,
{
    let rounds = forward(n, m, max_distance, &mut eq)?;
    let script = backtrack(n, m, &rounds);
    debug!(
        n,
        m,
        distance = rounds.len() - 1,
        script = %script,
        "shortest edit script"
    );
    Ok(script)
}

/// [`shortest_edit_script`] over two slices compared with `==`.
pub fn diff_slices<T: PartialEq>(
    live: &[T],
    target: &[T],
    max_distance: usize,
) -> Result<EditScript, DistanceExceeded> {
    shortest_edit_script(live.len(), target.len(), max_distance, |i, j| {
        live[i] == target[j]
    })
}

/// Run the forward search, returning the frontier as it stood at the start of
/// every round up to and including the one that reached `(n, m)`.
fn forward<F>(
    n: usize,
    m: usize,
    max_distance: usize,
    eq: &mut F,
) -> Result<Vec<Frontier>, DistanceExceeded>
where
    F: FnMut(usize, usize) -> bool,
{
    let max = n + m;
    // Round `d` reads diagonals up to `d + 1`, and no round past
    // `max_distance` is ever run.
    let reach = max.min(max_distance) + 1;
    let mut frontier = Frontier::new(reach);
    let mut rounds = Vec::new();

    let (n, m) = (n as isize, m as isize);

    for d in 0..=max as isize {
        rounds.push(frontier.clone());
        if d as usize > max_distance {
            debug!(n, m, bound = max_distance, "edit distance bound exceeded");
            return Err(DistanceExceeded {
                bound: max_distance,
            });
        }

        let mut k = -d;
        while k <= d {
            let mut x = if frontier.comes_from_above(k, d) {
                frontier.get(k + 1)
            } else {
                frontier.get(k - 1) + 1
            };
            let mut y = x - k;

            while x < n && y < m && eq(x as usize, y as usize) {
                x += 1;
                y += 1;
            }

            frontier.set(k, x);
            trace!(d, k, x, y, "frontier");

            if x >= n && y >= m {
                return Ok(rounds);
            }
            k += 2;
        }
    }

    // Round `n + m` always reaches the end; this only covers the loop shape.
    Ok(rounds)
}

/// Recover the script from the recorded rounds, starting at `(n, m)`.
fn backtrack(n: usize, m: usize, rounds: &[Frontier]) -> EditScript {
    let mut x = n as isize;
    let mut y = m as isize;
    let mut ops = Vec::with_capacity(n + m);

    for (d, frontier) in rounds.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;

        let prev_k = if frontier.comes_from_above(k, d) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = frontier.get(prev_k);
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            ops.push(Edit::Update);
            x -= 1;
            y -= 1;
        }

        if d > 0 {
            ops.push(if x == prev_x {
                Edit::Insert
            } else {
                Edit::Delete
            });
        }

        x = prev_x;
        y = prev_y;
    }

    ops.reverse();
    EditScript(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn script(s: &str) -> EditScript {
        s.chars()
            .map(|c| match c {
                'I' => Edit::Insert,
                'D' => Edit::Delete,
                'U' => Edit::Update,
                other => panic!("bad op {other}"),
            })
            .collect()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_delete_in_the_middle() {
        let ops = diff_slices(&chars("ABC"), &chars("AC"), 50).unwrap();
        assert_eq!(ops, script("UDU"));
    }

    #[test]
    fn test_insert_in_the_middle() {
        let ops = diff_slices(&chars("AC"), &chars("ABC"), 50).unwrap();
        assert_eq!(ops, script("UIU"));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(diff_slices::<char>(&[], &[], 50).unwrap(), script(""));
        assert_eq!(diff_slices(&[], &chars("XY"), 50).unwrap(), script("II"));
        assert_eq!(diff_slices(&chars("XY"), &[], 50).unwrap(), script("DD"));
    }

    #[test]
    fn test_identical_sequences_have_distance_zero() {
        let ops = diff_slices(&chars("ABCDEF"), &chars("ABCDEF"), 0).unwrap();
        assert_eq!(ops, script("UUUUUU"));
    }

    #[test]
    fn test_classic_example_distance() {
        // The example from Myers' paper: D = 5.
        let ops = diff_slices(&chars("ABCABBA"), &chars("CBABAC"), 50).unwrap();
        assert_eq!(ops.distance(), 5);
        assert!(ops.is_valid_for(7, 6));
    }

    #[test]
    fn test_bound_is_inclusive() {
        // Six fully distinct elements on each side need twelve edits.
        let a = chars("abcdef");
        let b = chars("ABCDEF");
        assert!(diff_slices(&a, &b, 12).is_ok());
        assert_eq!(
            diff_slices(&a, &b, 11),
            Err(DistanceExceeded { bound: 11 })
        );
    }

    #[test]
    fn test_sixty_distinct_elements_overrun_default_bound() {
        let a: Vec<u32> = (0..60).collect();
        let b: Vec<u32> = (100..160).collect();
        assert_eq!(
            diff_slices(&a, &b, 50),
            Err(DistanceExceeded { bound: 50 })
        );
    }

    #[test]
    fn test_large_inputs_with_small_distance_stay_exact() {
        let a: Vec<u32> = (0..500).collect();
        let mut b = a.clone();
        b.remove(250);
        b.insert(10, 9999);
        let ops = diff_slices(&a, &b, 50).unwrap();
        assert_eq!(ops.distance(), 2);
        assert!(ops.is_valid_for(500, 500));
    }
}
