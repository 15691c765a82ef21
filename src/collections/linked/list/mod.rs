mod cursor;
mod doubly_linked_list;
mod iter;
mod length;
mod node;
mod state;
mod tests;

pub use cursor::*;
pub use doubly_linked_list::*;
pub use iter::*;
pub(crate) use length::*;
pub(crate) use node::*;
pub use state::*;
