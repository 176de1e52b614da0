//! A registry mapping dense integer positions to user-chosen variable
//! labels, with a zero-cost fast path for the common case where every label
//! simply equals its position.
//!
//! This crate provides one central type, [`LabelRegistry`], plus the small
//! vocabulary around it: the [`Label`] value type, the [`Error`] type and
//! the [`RelabelPlanner`] strategy interface used by bulk renames.
//!
//! ---
//!
//! In order to use this crate, you have to include it into your
//! `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! label-registry = "0.1"
//! ```
//!
//! A quick taste:
//!
//! ```
//! use label_registry::LabelRegistry;
//!
//! // Variables labeled by their own position: nothing is allocated.
//! let mut reg = LabelRegistry::with_range(3);
//! assert!(reg.is_range());
//! assert_eq!(reg.index_of(1), Ok(1));
//!
//! // The first divergent label upgrades to an explicit dictionary.
//! reg.push("x").unwrap();
//! assert!(!reg.is_range());
//! assert_eq!(reg.index_of("x"), Ok(3));
//! assert_eq!(reg.index_of(0), Ok(0));
//! ```

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

use std::{fmt, iter::FromIterator, ops::Range};

use hashbrown::HashMap;

pub use crate::{
    error::Error,
    iter::Iter,
    label::{FloatLabel, Label},
    relabel::{RelabelPlanner, TwoPhasePlanner},
};

use crate::repr::Repr;

mod error;
mod iter;
mod label;
mod relabel;
mod repr;



/// A bijective mapping between the dense positions `0..n` and a set of
/// unique, caller-chosen labels.
///
/// # Why?
///
/// Array-backed structures (rows and columns of a quadratic model,
/// adjacency lists, solution vectors) address their per-variable data by a
/// dense integer position. Users address variables by whatever label is
/// meaningful to them: an integer, a string, occasionally a float. This
/// type is the translation layer in between, and other containers embed it
/// as their variable index.
///
/// Almost always, though, nobody relabels anything and the variables are
/// just `0..n`. A registry starts in **range mode** for exactly this case:
/// as long as every label equals its position, the registry stores nothing
/// but the count, and lookup in either direction is a bounds check. The
/// first label that diverges from its position upgrades the registry to
/// **mapped mode**, where two hash maps record *only* the divergent
/// positions; a position absent from the maps still falls back to its
/// identity label. Mutations transition between the modes transparently,
/// and [`collapse_to_range`][LabelRegistry::collapse_to_range] resets the
/// divergence explicitly.
///
/// # Labels
///
/// Every method taking a label accepts `impl Into<Label>`, and conversion
/// is where numeric normalization happens: integer-valued floats become
/// integer labels, so `reg.contains(3.0)` and `reg.contains(3)` agree. See
/// [`Label`].
///
/// # Growth discipline
///
/// A registry grows only at the high end ([`push`][LabelRegistry::push])
/// and shrinks only from the high end ([`pop`][LabelRegistry::pop]); there
/// is no arbitrary deletion. Renames ([`relabel`][LabelRegistry::relabel])
/// change labels but never positions or the count.
#[derive(Clone)]
pub struct LabelRegistry {
    pub(crate) repr: Repr,
}

impl LabelRegistry {
    /// Creates an empty registry, in range mode.
    pub fn new() -> Self {
        Self { repr: Repr::new() }
    }

    /// Creates a registry with the `n` variables `0..n`, in range mode.
    ///
    /// This is O(1) and allocates nothing, no matter how large `n` is.
    pub fn with_range(n: usize) -> Self {
        Self {
            repr: Repr::with_len(n),
        }
    }

    /// Creates a registry from an ordered sequence of labels.
    ///
    /// Seeding is permissive: a label equal to an earlier one is ignored,
    /// and later labels still get the next position. Equivalent to the
    /// `FromIterator` impl.
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        labels.into_iter().collect()
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.repr.len()
    }

    /// Returns `true` if the registry holds no variables.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` while every label equals its position.
    ///
    /// In this mode the registry stores nothing beyond the count.
    pub fn is_range(&self) -> bool {
        self.repr.is_range()
    }

    /// Returns whether `label` currently denotes a live variable.
    ///
    /// ```
    /// use label_registry::LabelRegistry;
    ///
    /// let reg: LabelRegistry = vec![5, 100].into_iter().collect();
    /// assert!(reg.contains(5));
    /// assert!(reg.contains(5.0));
    /// assert!(!reg.contains(5.5));
    /// assert!(!reg.contains(0));
    /// ```
    pub fn contains(&self, label: impl Into<Label>) -> bool {
        self.repr.contains(&label.into())
    }

    /// Returns how many variables carry `label`: `1` or `0`, since labels
    /// are unique.
    pub fn count(&self, label: impl Into<Label>) -> usize {
        self.contains(label) as usize
    }

    /// Returns the label at `position`.
    ///
    /// Negative positions count from the end, like sequence indexing in
    /// scripting languages: `-1` is the highest position. Positions outside
    /// `[-len, len)` fail with [`Error::OutOfRange`].
    pub fn label_at(&self, position: i64) -> Result<Label, Error> {
        let len = self.len();
        let idx = if position < 0 {
            position + len as i64
        } else {
            position
        };
        if idx < 0 || idx >= len as i64 {
            return Err(Error::OutOfRange { position, len });
        }
        Ok(self.repr.label_for(idx as usize))
    }

    /// Returns the position of the variable labeled `label`, or
    /// [`Error::UnknownVariable`] if there is none.
    pub fn index_of(&self, label: impl Into<Label>) -> Result<usize, Error> {
        let label = label.into();
        match self.repr.position_of(&label) {
            Some(idx) => Ok(idx),
            None => Err(Error::UnknownVariable(label)),
        }
    }

    /// Returns the position of `label`, first appending it as a new
    /// variable if it is not present yet.
    pub fn index_of_or_insert(&mut self, label: impl Into<Label>) -> usize {
        let label = label.into();
        match self.repr.position_of(&label) {
            Some(idx) => idx,
            None => self.repr.push_unchecked(label),
        }
    }

    /// Appends a new variable labeled `label` at the next position and
    /// returns the label.
    ///
    /// A label equal to the next position keeps the registry in range mode;
    /// any other label records an explicit entry. Fails with
    /// [`Error::DuplicateLabel`] if `label` is already live, leaving the
    /// registry unchanged.
    pub fn push(&mut self, label: impl Into<Label>) -> Result<Label, Error> {
        let label = label.into();
        if self.repr.contains(&label) {
            return Err(Error::DuplicateLabel(label));
        }
        self.repr.push_unchecked(label.clone());
        Ok(label)
    }

    /// Like [`push`][LabelRegistry::push], but a duplicate label is a no-op
    /// instead of an error. Returns the label either way.
    pub fn push_permissive(&mut self, label: impl Into<Label>) -> Label {
        let label = label.into();
        if !self.repr.contains(&label) {
            self.repr.push_unchecked(label.clone());
        }
        label
    }

    /// Appends a new variable with an automatically chosen label and
    /// returns that label.
    ///
    /// The natural choice is the new position itself, which keeps range
    /// mode intact. When that integer is already taken as a label
    /// elsewhere, the smallest unused non-negative integer is used instead.
    /// That fallback is a linear scan from `0`; auto-labeling is not a hot
    /// path, but registries with a very large number of explicit integer
    /// labels will feel it.
    ///
    /// ```
    /// use label_registry::{Label, LabelRegistry};
    ///
    /// let mut reg: LabelRegistry = vec![Label::from(5), "x".into(), 2.into()]
    ///     .into_iter()
    ///     .collect();
    /// // Position 3 is next and the label 3 is free.
    /// assert_eq!(reg.push_fresh(), Label::from(3));
    /// assert_eq!(reg.index_of(3), Ok(3));
    /// ```
    pub fn push_fresh(&mut self) -> Label {
        let next = Label::Int(self.len() as i64);
        let label = if !self.repr.contains(&next) {
            next
        } else {
            let mut candidate = 0i64;
            loop {
                let c = Label::Int(candidate);
                if !self.repr.contains(&c) {
                    break c;
                }
                candidate += 1;
            }
        };
        self.repr.push_unchecked(label.clone());
        label
    }

    /// Appends one variable per label, in order, failing on the first
    /// duplicate.
    ///
    /// There is no rollback: appends before the failing one are kept. For
    /// the skip-duplicates behavior, use the `Extend` impl instead.
    pub fn try_extend<I>(&mut self, labels: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        for label in labels {
            self.push(label)?;
        }
        Ok(())
    }

    /// Removes the variable at the highest position and returns its label.
    ///
    /// Only the highest position can ever be removed; this is a stack
    /// discipline, not arbitrary deletion. Fails with
    /// [`Error::EmptyRegistry`] when there is nothing to pop.
    pub fn pop(&mut self) -> Result<Label, Error> {
        self.repr.pop().ok_or(Error::EmptyRegistry)
    }

    /// Applies a bulk rename described by `mapping`, using the default
    /// [`TwoPhasePlanner`].
    ///
    /// Pairs mapping a label to itself, and pairs whose old label is not
    /// live, are ignored. The positions of renamed variables do not change.
    /// Fails with [`Error::DuplicateLabel`] when the mapping's net effect
    /// would leave two variables with the same label; the registry is
    /// unchanged in that case.
    ///
    /// ```
    /// use label_registry::LabelRegistry;
    ///
    /// let mut reg: LabelRegistry = vec!["a", "b"].into_iter().collect();
    /// reg.relabel(vec![("a", "b"), ("b", "a")]).unwrap();
    /// assert_eq!(reg.index_of("b"), Ok(0));
    /// assert_eq!(reg.index_of("a"), Ok(1));
    /// ```
    pub fn relabel<I, A, B>(&mut self, mapping: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<Label>,
        B: Into<Label>,
    {
        self.relabel_with(mapping, &TwoPhasePlanner)
    }

    /// Applies a bulk rename with an injected [`RelabelPlanner`].
    ///
    /// The registry never decomposes a mapping itself: the planner returns
    /// an ordered sequence of sub-mappings, each safe to apply pair by
    /// pair, and the registry applies them in order.
    pub fn relabel_with<I, A, B, P>(&mut self, mapping: I, planner: &P) -> Result<(), Error>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<Label>,
        B: Into<Label>,
        P: RelabelPlanner + ?Sized,
    {
        let mapping: HashMap<Label, Label> = mapping
            .into_iter()
            .map(|(old, new)| (old.into(), new.into()))
            .collect();
        let stages = planner.plan(&mapping, self)?;
        for stage in &stages {
            for (old, new) in stage {
                self.repr.rename(old, new);
            }
        }
        self.repr.demote_if_identity();
        Ok(())
    }

    /// Resets every label to its position and returns the divergence that
    /// was in effect: a map from position to the explicit label it carried.
    ///
    /// Afterwards the registry is in range mode, as if freshly created by
    /// [`with_range`][LabelRegistry::with_range]. The returned map is empty
    /// exactly when the registry was in range mode already, which makes it
    /// a convenient probe in tests for "no divergence ever happened".
    ///
    /// ```
    /// use label_registry::{Label, LabelRegistry};
    ///
    /// let mut reg = LabelRegistry::with_range(2);
    /// reg.push("x").unwrap();
    ///
    /// let divergence = reg.collapse_to_range();
    /// assert_eq!(divergence[&2], Label::from("x"));
    /// assert!(reg.is_range());
    /// assert_eq!(reg.label_at(2), Ok(Label::from(2)));
    /// ```
    pub fn collapse_to_range(&mut self) -> HashMap<usize, Label> {
        self.repr.collapse()
    }

    /// Returns an iterator over the labels, in position order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Returns the range of live positions, `0..len`.
    pub fn positions(&self) -> Range<usize> {
        0..self.len()
    }
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LabelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LabelRegistry ")?;
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Registries are equal when they map the same positions to the same
/// labels; the representation mode does not matter.
impl PartialEq for LabelRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for LabelRegistry {}

impl<L: Into<Label>> FromIterator<L> for LabelRegistry {
    fn from_iter<I: IntoIterator<Item = L>>(labels: I) -> Self {
        let mut registry = Self::new();
        registry.extend(labels);
        registry
    }
}

/// Permissive bulk append: duplicates are skipped. For the failing variant
/// see [`LabelRegistry::try_extend`].
impl<L: Into<Label>> Extend<L> for LabelRegistry {
    fn extend<I: IntoIterator<Item = L>>(&mut self, labels: I) {
        for label in labels {
            self.push_permissive(label);
        }
    }
}

impl From<Range<usize>> for LabelRegistry {
    fn from(range: Range<usize>) -> Self {
        if range.start == 0 {
            Self::with_range(range.end)
        } else {
            range.collect()
        }
    }
}

impl<'a> IntoIterator for &'a LabelRegistry {
    type Item = Label;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
