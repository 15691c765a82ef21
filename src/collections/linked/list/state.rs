use derive_more::IsVariant;

/// Where a [`Cursor`](super::Cursor) is, as seen from outside. `R` is the reference that the
/// Cursor hands out to its element: `&T` from [`state`](super::Cursor::state) and `&mut T` from
/// [`state_mut`](super::Cursor::state_mut).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum State<R> {
    /// The list is empty. The Cursor is still at one of the ghosts, but they are indistinguishable.
    Empty,
    /// The 'ghost' before the front of the list.
    Head,
    /// The 'ghost' after the back of the list.
    Tail,
    Node(R),
}

impl<R> State<R> {
    /// Returns the element reference, if the Cursor is on a node.
    pub fn node(self) -> Option<R> {
        match self {
            State::Node(element) => Some(element),
            State::Empty | State::Head | State::Tail => None,
        }
    }
}
