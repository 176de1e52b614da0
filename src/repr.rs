//! The tagged dual representation behind the registry.
//!
//! A registry is either in *range mode* (`Range`), where every label equals
//! its position and nothing is stored beyond the count, or in *mapped mode*
//! (`Mapped`), where the two partial maps record exactly the positions whose
//! label diverges from the position itself. A position absent from
//! `index_to_label` is implicitly labeled by its own integer value (the
//! identity fallback).
//!
//! # Invariants
//!
//! - Bijection: every live position has exactly one label and every live
//!   label exactly one position.
//! - Consistency: `index_to_label[i] == l` ⟺ `label_to_index[l] == i`, for
//!   every explicit entry. The two maps always have equal size.
//! - `Mapped` never has empty maps: a mutation that removes the last
//!   explicit entry must collapse the value back to `Range`. Methods that
//!   leave a transient empty `Mapped` state restore the invariant via
//!   [`Repr::demote_if_identity`] before returning to the facade.

use hashbrown::HashMap;

use crate::Label;


#[derive(Clone, Debug)]
pub(crate) enum Repr {
    /// Every label equals its position. No allocation.
    Range { len: usize },

    /// At least one label diverges from its position.
    Mapped {
        len: usize,
        index_to_label: HashMap<usize, Label>,
        label_to_index: HashMap<Label, usize>,
    },
}

impl Repr {
    pub(crate) fn new() -> Self {
        Repr::Range { len: 0 }
    }

    pub(crate) fn with_len(len: usize) -> Self {
        Repr::Range { len }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Repr::Range { len } => *len,
            Repr::Mapped { len, .. } => *len,
        }
    }

    pub(crate) fn is_range(&self) -> bool {
        match self {
            Repr::Range { .. } => true,
            Repr::Mapped { .. } => false,
        }
    }

    /// The label of position `idx`. Caller guarantees `idx < self.len()`.
    pub(crate) fn label_for(&self, idx: usize) -> Label {
        match self {
            Repr::Range { .. } => Label::Int(idx as i64),
            Repr::Mapped { index_to_label, .. } => match index_to_label.get(&idx) {
                Some(label) => label.clone(),
                None => Label::Int(idx as i64),
            },
        }
    }

    /// The position of `label`, or `None` if it is not live.
    ///
    /// An integer label `i` is live either through an explicit entry or
    /// implicitly, when `i` is a valid position that no explicit entry
    /// shadows.
    pub(crate) fn position_of(&self, label: &Label) -> Option<usize> {
        match self {
            Repr::Range { len } => match *label {
                Label::Int(i) if i >= 0 && (i as usize) < *len => Some(i as usize),
                _ => None,
            },
            Repr::Mapped {
                len,
                index_to_label,
                label_to_index,
            } => {
                if let Some(&idx) = label_to_index.get(label) {
                    return Some(idx);
                }
                match *label {
                    Label::Int(i)
                        if i >= 0
                            && (i as usize) < *len
                            && !index_to_label.contains_key(&(i as usize)) =>
                    {
                        Some(i as usize)
                    }
                    _ => None,
                }
            }
        }
    }

    pub(crate) fn contains(&self, label: &Label) -> bool {
        self.position_of(label).is_some()
    }

    /// Assigns `label` to the next position and returns that position.
    /// Caller guarantees `label` is not already live.
    ///
    /// A label equal to its position is never recorded explicitly, so
    /// pushing `Int(len)` extends range mode (or leaves an implicit slot in
    /// mapped mode) without touching the maps.
    pub(crate) fn push_unchecked(&mut self, label: Label) -> usize {
        debug_assert!(!self.contains(&label));

        let idx = self.len();
        if label != Label::Int(idx as i64) {
            self.promote();
        }
        match self {
            Repr::Range { len } => *len += 1,
            Repr::Mapped {
                len,
                index_to_label,
                label_to_index,
            } => {
                if label != Label::Int(idx as i64) {
                    index_to_label.insert(idx, label.clone());
                    label_to_index.insert(label, idx);
                }
                *len += 1;
            }
        }
        idx
    }

    /// Removes the highest position and returns its label, or `None` when
    /// empty.
    pub(crate) fn pop(&mut self) -> Option<Label> {
        let label = match self {
            Repr::Range { len } => {
                if *len == 0 {
                    return None;
                }
                *len -= 1;
                Label::Int(*len as i64)
            }
            Repr::Mapped {
                len,
                index_to_label,
                label_to_index,
            } => {
                if *len == 0 {
                    return None;
                }
                *len -= 1;
                match index_to_label.remove(len) {
                    Some(label) => {
                        label_to_index.remove(&label);
                        label
                    }
                    None => Label::Int(*len as i64),
                }
            }
        };
        self.demote_if_identity();
        Some(label)
    }

    /// Renames `old` to `new` following the per-pair rule: the reverse entry
    /// for `old` is removed first, then the new pair is recorded, except
    /// that a rename onto the position itself deletes the forward entry and
    /// restores the identity fallback for that slot.
    ///
    /// Pairs whose `old` is not live, and pairs with `old == new`, are
    /// skipped. The caller is responsible for applying only plans that never
    /// make `new` coexist with another holder, and for calling
    /// [`Repr::demote_if_identity`] once the full mapping has been applied.
    pub(crate) fn rename(&mut self, old: &Label, new: &Label) {
        if old == new || !self.contains(old) {
            return;
        }
        self.promote();
        match self {
            Repr::Range { .. } => unreachable!("rename on an unpromoted registry"),
            Repr::Mapped {
                len,
                index_to_label,
                label_to_index,
            } => {
                let idx = match label_to_index.remove(old) {
                    Some(idx) => idx,
                    None => match *old {
                        // Live but not explicit: `old` labels its own
                        // position.
                        Label::Int(i) => i as usize,
                        _ => unreachable!("non-integer label live without an explicit entry"),
                    },
                };
                debug_assert!(idx < *len);

                if *new == Label::Int(idx as i64) {
                    index_to_label.remove(&idx);
                } else {
                    index_to_label.insert(idx, new.clone());
                    let prev = label_to_index.insert(new.clone(), idx);
                    debug_assert!(prev.is_none(), "relabel plan reused a live label");
                }
            }
        }
    }

    /// Hands back the full record of divergence and resets to range mode.
    pub(crate) fn collapse(&mut self) -> HashMap<usize, Label> {
        let len = self.len();
        match std::mem::replace(self, Repr::Range { len }) {
            Repr::Range { .. } => HashMap::new(),
            Repr::Mapped { index_to_label, .. } => index_to_label,
        }
    }

    /// Switches to `Mapped` with empty maps. No-op when already mapped.
    fn promote(&mut self) {
        if let Repr::Range { len } = *self {
            *self = Repr::Mapped {
                len,
                index_to_label: HashMap::new(),
                label_to_index: HashMap::new(),
            };
        }
    }

    /// Collapses back to `Range` when no explicit entry remains.
    pub(crate) fn demote_if_identity(&mut self) {
        let len = self.len();
        if let Repr::Mapped { label_to_index, .. } = self {
            if label_to_index.is_empty() {
                *self = Repr::Range { len };
            }
        }
    }
}
