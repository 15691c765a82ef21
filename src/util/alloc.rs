//! Values with observable lifetimes, for testing that containers construct and destroy exactly
//! what they should.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZeroSizedType;

/// Increments the shared counter every time an instance is dropped.
#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<Cell<usize>>);

impl CountedDrop {
    pub fn new(counter: &Rc<Cell<usize>>) -> CountedDrop {
        CountedDrop(Rc::clone(counter))
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

/// A value that panics when cloned once the shared budget of clones has run out. Every instance
/// also counts its drops, so that tests can check that partially constructed containers are
/// cleaned up.
#[derive(Debug)]
pub struct CloneBomb {
    pub clones_left: Rc<Cell<usize>>,
    pub drops: CountedDrop,
}

impl CloneBomb {
    pub fn new(clones_left: usize, drops: &Rc<Cell<usize>>) -> CloneBomb {
        CloneBomb {
            clones_left: Rc::new(Cell::new(clones_left)),
            drops: CountedDrop::new(drops),
        }
    }
}

impl Clone for CloneBomb {
    fn clone(&self) -> Self {
        match self.clones_left.get() {
            0 => panic!("CloneBomb exploded"),
            left => self.clones_left.set(left - 1),
        }

        CloneBomb {
            clones_left: Rc::clone(&self.clones_left),
            drops: self.drops.clone(),
        }
    }
}
