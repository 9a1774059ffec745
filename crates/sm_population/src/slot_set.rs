use std::ops::Deref;

/// A set of slot indices supporting O(1) insertion, removal and
/// positional access, so that a uniformly random member can be drawn
/// without scanning the population array.
///
/// The order of members is arbitrary and changes on removal.
#[derive(Debug, Clone, Default)]
pub struct SlotSet {
    members: Vec<usize>,
    position: Vec<Option<usize>>,
}

impl SlotSet {
    /// An empty set for slot indices in `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            position: vec![None; capacity],
        }
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.position[slot].is_some()
    }

    /// Returns false if the slot was already a member.
    pub fn insert(&mut self, slot: usize) -> bool {
        if self.position[slot].is_some() {
            return false;
        }
        self.position[slot] = Some(self.members.len());
        self.members.push(slot);
        true
    }

    /// Returns false if the slot was not a member.
    pub fn remove(&mut self, slot: usize) -> bool {
        let Some(p) = self.position[slot].take() else {
            return false;
        };
        self.members.swap_remove(p);
        if let Some(&moved) = self.members.get(p) {
            self.position[moved] = Some(p);
        }
        true
    }
}

impl Deref for SlotSet {
    type Target = [usize];
    fn deref(&self) -> &Self::Target {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_set_insert_remove() {
        let mut set = SlotSet::with_capacity(6);
        assert!(set.insert(4));
        assert!(set.insert(1));
        assert!(set.insert(5));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 3);

        assert!(set.remove(4));
        assert!(!set.remove(4));
        assert!(!set.contains(4));
        assert!(set.contains(1));
        assert!(set.contains(5));

        let mut members = set.to_vec();
        members.sort();
        assert_eq!(members, vec![1, 5]);
    }

    #[test]
    fn test_slot_set_positions_stay_consistent() {
        let mut set = SlotSet::with_capacity(10);
        for s in 0..10 {
            set.insert(s);
        }
        for s in [0, 9, 3, 4, 7] {
            assert!(set.remove(s));
        }
        for (p, &slot) in set.iter().enumerate() {
            assert_eq!(set.position[slot], Some(p));
        }
        assert_eq!(set.len(), 5);
    }
}
