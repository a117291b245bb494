//! The forward-chaining agenda: an ordered pending-rule container.
//!
//! The agenda is an explicit list plus a scan order, not a language stack or
//! queue: the initial sort establishes priority, the discipline only decides
//! which end of the sequence a scan starts from. Nothing is ever re-ordered
//! within a saturation pass; firing removes the rule in place.

use crate::rule::RuleId;

use super::{IndexMode, Structure};

/// Ordered pending-rule container with selectable pop discipline.
#[derive(Debug, Clone)]
pub struct Agenda {
    /// The insertion sequence: ascending ids for `min`, descending for `max`.
    items: Vec<RuleId>,
    structure: Structure,
}

impl Agenda {
    /// Build the agenda from the full rule-id list, sorted by `index_mode`.
    pub fn new(mut ids: Vec<RuleId>, structure: Structure, index_mode: IndexMode) -> Self {
        match index_mode {
            IndexMode::Min => ids.sort_unstable(),
            IndexMode::Max => ids.sort_unstable_by(|a, b| b.cmp(a)),
        }
        Self {
            items: ids,
            structure,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate the pending ids in pop order, with their positions in the
    /// underlying sequence. A stack pops the most recently inserted end
    /// (the back); a queue pops the front.
    pub fn scan(&self) -> Box<dyn Iterator<Item = (usize, RuleId)> + '_> {
        match self.structure {
            Structure::Stack => Box::new(self.items.iter().copied().enumerate().rev()),
            Structure::Queue => Box::new(self.items.iter().copied().enumerate()),
        }
    }

    /// Remove the rule at `position` (as yielded by [`Agenda::scan`]).
    pub fn remove(&mut self, position: usize) -> RuleId {
        self.items.remove(position)
    }

    /// The pending ids in pop order, for trace snapshots.
    pub fn snapshot(&self) -> Vec<RuleId> {
        self.scan().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<RuleId> {
        raw.iter().map(|&n| RuleId::new(n).unwrap()).collect()
    }

    #[test]
    fn queue_min_pops_ascending() {
        let agenda = Agenda::new(ids(&[3, 1, 2]), Structure::Queue, IndexMode::Min);
        assert_eq!(agenda.snapshot(), ids(&[1, 2, 3]));
    }

    #[test]
    fn queue_max_pops_descending() {
        let agenda = Agenda::new(ids(&[3, 1, 2]), Structure::Queue, IndexMode::Max);
        assert_eq!(agenda.snapshot(), ids(&[3, 2, 1]));
    }

    #[test]
    fn stack_pops_from_the_back_of_the_sorted_sequence() {
        let agenda = Agenda::new(ids(&[3, 1, 2]), Structure::Stack, IndexMode::Min);
        assert_eq!(agenda.snapshot(), ids(&[3, 2, 1]));

        let agenda = Agenda::new(ids(&[3, 1, 2]), Structure::Stack, IndexMode::Max);
        assert_eq!(agenda.snapshot(), ids(&[1, 2, 3]));
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut agenda = Agenda::new(ids(&[1, 2, 3]), Structure::Queue, IndexMode::Min);
        let (pos, id) = agenda.scan().nth(1).unwrap();
        assert_eq!(id, RuleId::new(2).unwrap());
        agenda.remove(pos);
        assert_eq!(agenda.snapshot(), ids(&[1, 3]));
        assert_eq!(agenda.len(), 2);
    }
}
