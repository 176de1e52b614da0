//! Safe relabel planning.
//!
//! Applying an arbitrary rename mapping pair by pair can create transient
//! duplicates: a swap `{a: b, b: a}` or a chain `{a: b, b: c}` renames onto
//! a label that is still live. The registry therefore never applies a raw
//! mapping. It hands the mapping to a [`RelabelPlanner`], which decomposes
//! it into an ordered sequence of sub-mappings that are each safe to apply
//! directly, and applies those in order.
//!
//! The planning problem is combinatorial (cycle breaking) and deliberately
//! kept out of the registry itself. [`TwoPhasePlanner`] is the default
//! strategy; callers with special requirements can inject their own through
//! [`LabelRegistry::relabel_with`].
//!
//! [`LabelRegistry::relabel_with`]: crate::LabelRegistry::relabel_with

use hashbrown::{HashMap, HashSet};

use crate::{Error, Label, LabelRegistry};


/// Strategy that decomposes a rename mapping into safely-applicable stages.
///
/// # Contract
///
/// Applying the returned sub-mappings strictly in order, each one fully,
/// using the registry's per-pair rename rule, must reproduce exactly the net
/// effect of `mapping` on the registry's current variables, and no
/// intermediate pair application may make a label live while another
/// variable still holds it.
///
/// A plan violating the contract corrupts the bijection; the registry only
/// guards against that with debug assertions.
pub trait RelabelPlanner {
    /// Plans the application of `mapping` against the live variables of
    /// `registry`.
    ///
    /// Returns a duplicate-label error when the mapping cannot be applied
    /// at all, i.e. when its net effect would leave two variables with the
    /// same label.
    fn plan(
        &self,
        mapping: &HashMap<Label, Label>,
        registry: &LabelRegistry,
    ) -> Result<Vec<HashMap<Label, Label>>, Error>;
}

/// The default planner: at most two stages, with temporary labels.
///
/// Entries whose target is not currently live are applied directly in the
/// first stage. Entries whose target is live (necessarily held by another
/// variable that the mapping also renames) are first moved to a fresh
/// temporary integer label, and the temporaries are moved onto their final
/// targets in the second stage, by which point every conflicting holder has
/// been renamed away. Temporaries are the smallest unused non-negative
/// integers, skipping everything live and every target of the mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPhasePlanner;

impl RelabelPlanner for TwoPhasePlanner {
    fn plan(
        &self,
        mapping: &HashMap<Label, Label>,
        registry: &LabelRegistry,
    ) -> Result<Vec<HashMap<Label, Label>>, Error> {
        // Entries that actually move something: `old` must be live and the
        // pair must not be a self-rename.
        let entries: Vec<(&Label, &Label)> = mapping
            .iter()
            .filter(|(old, new)| old != new && registry.contains((*old).clone()))
            .collect();

        let mut targets = HashSet::with_capacity(entries.len());
        for (_, new) in &entries {
            if !targets.insert((*new).clone()) {
                return Err(Error::DuplicateLabel((*new).clone()));
            }
        }

        let moving: HashSet<&Label> = entries.iter().map(|(old, _)| *old).collect();
        for (_, new) in &entries {
            // A live target is only acceptable when its holder is itself
            // renamed by this mapping.
            if registry.contains((*new).clone()) && !moving.contains(new) {
                return Err(Error::DuplicateLabel((*new).clone()));
            }
        }

        let mut first = HashMap::with_capacity(entries.len());
        let mut second = HashMap::new();
        let mut candidate = 0i64;
        for (old, new) in entries {
            if registry.contains(new.clone()) {
                let temp = loop {
                    let c = Label::Int(candidate);
                    candidate += 1;
                    if !registry.contains(c.clone()) && !targets.contains(&c) {
                        break c;
                    }
                };
                first.insert(old.clone(), temp.clone());
                second.insert(temp, new.clone());
            } else {
                first.insert(old.clone(), new.clone());
            }
        }

        let mut stages = Vec::with_capacity(2);
        if !first.is_empty() {
            stages.push(first);
        }
        if !second.is_empty() {
            stages.push(second);
        }
        Ok(stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(labels: &[&str]) -> LabelRegistry {
        labels.iter().copied().collect()
    }

    fn plan(mapping: &[(&str, &str)], reg: &LabelRegistry) -> Vec<HashMap<Label, Label>> {
        let mapping: HashMap<Label, Label> = mapping
            .iter()
            .map(|&(a, b)| (Label::from(a), Label::from(b)))
            .collect();
        TwoPhasePlanner.plan(&mapping, reg).unwrap()
    }

    #[test]
    fn disjoint_targets_need_one_stage() {
        let reg = registry(&["a", "b"]);
        let stages = plan(&[("a", "x"), ("b", "y")], &reg);
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].len(), 2);
        assert_eq!(stages[0][&Label::from("a")], Label::from("x"));
        assert_eq!(stages[0][&Label::from("b")], Label::from("y"));
    }

    #[test]
    fn swap_needs_two_stages() {
        let reg = registry(&["a", "b"]);
        let stages = plan(&[("a", "b"), ("b", "a")], &reg);
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].len(), 2);
        assert_eq!(stages[1].len(), 2);

        // Every first-stage target is a fresh temporary, and the second
        // stage moves exactly those temporaries onto the final labels.
        for (old, temp) in &stages[0] {
            assert!(!reg.contains(temp.clone()), "{:?} -> {:?} not fresh", old, temp);
            assert!(stages[1].contains_key(temp));
        }
        let finals: HashSet<&Label> = stages[1].values().collect();
        assert!(finals.contains(&Label::from("a")));
        assert!(finals.contains(&Label::from("b")));
    }

    #[test]
    fn chain_defers_only_conflicts() {
        let reg = registry(&["a", "b", "c"]);
        let stages = plan(&[("a", "b"), ("b", "c"), ("c", "d")], &reg);
        assert_eq!(stages.len(), 2);
        // "c" -> "d" is conflict-free and stays in the first stage.
        assert_eq!(stages[0][&Label::from("c")], Label::from("d"));
        assert_eq!(stages[1].len(), 2);
    }

    #[test]
    fn self_renames_and_dead_labels_drop_out() {
        let reg = registry(&["a", "b"]);
        let stages = plan(&[("a", "a"), ("ghost", "x")], &reg);
        assert!(stages.is_empty());
    }

    #[test]
    fn occupied_target_is_rejected() {
        let reg = registry(&["a", "b"]);
        let mapping: HashMap<Label, Label> =
            [(Label::from("a"), Label::from("b"))].iter().cloned().collect();
        assert_eq!(
            TwoPhasePlanner.plan(&mapping, &reg),
            Err(Error::DuplicateLabel(Label::from("b")))
        );
    }

    #[test]
    fn colliding_targets_are_rejected() {
        let reg = registry(&["a", "b"]);
        let mapping: HashMap<Label, Label> = [
            (Label::from("a"), Label::from("x")),
            (Label::from("b"), Label::from("x")),
        ]
        .iter()
        .cloned()
        .collect();
        assert_eq!(
            TwoPhasePlanner.plan(&mapping, &reg),
            Err(Error::DuplicateLabel(Label::from("x")))
        );
    }

    #[test]
    fn temporaries_skip_shadowed_integers_in_targets() {
        // Positions 0 and 1 are shadowed by string labels, so the integers
        // 0 and 1 are free. 0 is also a target, so the first temporary must
        // skip it.
        let reg = registry(&["a", "b"]);
        let mapping: HashMap<Label, Label> = [
            (Label::from("a"), Label::from("b")),
            (Label::from("b"), Label::from(0)),
        ]
        .iter()
        .cloned()
        .collect();
        let stages = TwoPhasePlanner.plan(&mapping, &reg).unwrap();
        assert_eq!(stages.len(), 2);
        let temp = &stages[0][&Label::from("a")];
        assert_ne!(*temp, Label::from(0));
        assert!(!reg.contains(temp.clone()));
    }
}
