//! Positional edit scripts shared by both alignment algorithms.

use core::fmt;

use facet::Facet;

/// One step of an edit script.
///
/// Scripts are positional: each op consumes the next unconsumed element of
/// the live sequence, the target sequence, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum Edit {
    /// The next target element has no live counterpart and is inserted.
    Insert,
    /// The next live element has no target counterpart and is removed.
    Delete,
    /// The next live and target elements are a matched pair.
    Update,
}

impl Edit {
    /// Single-letter form used by [`EditScript`]'s `Display`.
    pub fn letter(self) -> char {
        match self {
            Edit::Insert => 'I',
            Edit::Delete => 'D',
            Edit::Update => 'U',
        }
    }
}

/// An ordered sequence of [`Edit`]s aligning a live sequence with a target
/// sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Facet)]
#[facet(transparent)]
pub struct EditScript(pub Vec<Edit>);

impl EditScript {
    /// Create an empty script.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty script with room for `capacity` ops.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Append an op.
    #[inline]
    pub fn push(&mut self, edit: Edit) {
        self.0.push(edit);
    }

    /// Append `count` copies of an op.
    pub fn push_n(&mut self, edit: Edit, count: usize) {
        self.0.extend(core::iter::repeat_n(edit, count));
    }

    /// Append every op of another script.
    pub fn extend_from(&mut self, other: &EditScript) {
        self.0.extend_from_slice(&other.0);
    }

    /// The ops, in application order.
    pub fn ops(&self) -> &[Edit] {
        &self.0
    }

    /// Iterate over the ops.
    pub fn iter(&self) -> impl Iterator<Item = Edit> + '_ {
        self.0.iter().copied()
    }

    /// Number of ops.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script has no ops.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of ops of the given kind.
    pub fn count(&self, edit: Edit) -> usize {
        self.0.iter().filter(|&&e| e == edit).count()
    }

    /// Number of non-matching ops (inserts plus deletes).
    pub fn distance(&self) -> usize {
        self.0.iter().filter(|&&e| e != Edit::Update).count()
    }

    /// Number of live elements the script consumes.
    pub fn live_len(&self) -> usize {
        self.0.iter().filter(|&&e| e != Edit::Insert).count()
    }

    /// Number of target elements the script consumes.
    pub fn target_len(&self) -> usize {
        self.0.iter().filter(|&&e| e != Edit::Delete).count()
    }

    /// Whether the script exactly covers a live sequence of length `live`
    /// and a target sequence of length `target`.
    pub fn is_valid_for(&self, live: usize, target: usize) -> bool {
        self.live_len() == live && self.target_len() == target
    }

    /// Index pairs `(live, target)` of every [`Edit::Update`].
    pub fn matches(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let mut old = 0;
        let mut new = 0;
        self.0.iter().filter_map(move |edit| match edit {
            Edit::Insert => {
                new += 1;
                None
            }
            Edit::Delete => {
                old += 1;
                None
            }
            Edit::Update => {
                let pair = (old, new);
                old += 1;
                new += 1;
                Some(pair)
            }
        })
    }
}

impl From<Vec<Edit>> for EditScript {
    fn from(ops: Vec<Edit>) -> Self {
        Self(ops)
    }
}

impl FromIterator<Edit> for EditScript {
    fn from_iter<I: IntoIterator<Item = Edit>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for EditScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edit in &self.0 {
            write!(f, "{}", edit.letter())?;
        }
        Ok(())
    }
}
