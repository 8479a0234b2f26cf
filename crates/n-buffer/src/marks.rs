//! Named marks, one optional point per printable ASCII character.

use crate::position::Point;

const SLOTS: usize = 95;

/// Marks set with `m{char}` and read by `'{char}` / `` `{char} ``.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marks {
    slots: [Option<Point>; SLOTS],
}

impl Default for Marks {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot index for a printable ASCII char, `None` for anything else.
#[inline]
fn slot(id: char) -> Option<usize> {
    if (' '..='~').contains(&id) {
        Some(id as usize - ' ' as usize)
    } else {
        None
    }
}

impl Marks {
    /// No marks set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [None; SLOTS],
        }
    }

    /// Where mark `id` is, `None` when unset or not a mark name.
    #[must_use]
    pub fn get(&self, id: char) -> Option<Point> {
        slot(id).and_then(|i| self.slots[i])
    }

    /// Set a mark. Returns `false` if `id` is not a printable ASCII char.
    pub fn set(&mut self, id: char, pt: Point) -> bool {
        slot(id).is_some_and(|i| {
            self.slots[i] = Some(pt);
            true
        })
    }

    /// Unset mark `id`.
    pub fn clear(&mut self, id: char) {
        if let Some(i) = slot(id) {
            self.slots[i] = None;
        }
    }

    /// Every set mark in char order.
    pub fn iter(&self) -> impl Iterator<Item = (char, Point)> + '_ {
        self.slots
            .iter()
            .zip(' '..='~')
            .filter_map(|(pt, id)| pt.map(|pt| (id, pt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unset_mark_is_none() {
        assert_eq!(Marks::new().get('a'), None);
    }

    #[test]
    fn set_and_get() {
        let mut m = Marks::new();
        assert!(m.set('a', Point::new(3, 4)));
        assert_eq!(m.get('a'), Some(Point::new(3, 4)));
        assert_eq!(m.get('b'), None);
    }

    #[test]
    fn non_printable_rejected() {
        let mut m = Marks::new();
        assert!(!m.set('\n', Point::ZERO));
        assert!(!m.set('é', Point::ZERO));
        assert_eq!(m.get('\n'), None);
    }

    #[test]
    fn clear_removes_mark() {
        let mut m = Marks::new();
        m.set('z', Point::new(1, 1));
        m.clear('z');
        assert_eq!(m.get('z'), None);
    }

    #[test]
    fn iter_lists_in_char_order() {
        let mut m = Marks::new();
        m.set('b', Point::new(2, 0));
        m.set('a', Point::new(1, 0));
        let all: Vec<_> = m.iter().collect();
        assert_eq!(all, vec![('a', Point::new(1, 0)), ('b', Point::new(2, 0))]);
    }
}
