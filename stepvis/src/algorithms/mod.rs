//! Reference producers.
//!
//! Each one covers a different control-flow shape the engine has to
//! support: plain stepping ([`BubbleSort`]), a dialog whose answer shapes
//! the rest of the run ([`NewArray`], [`HashInsert`]), validation failures,
//! and a search that may end without a result ([`HashFind`]).

mod array;
mod bubble_sort;
mod hash_table;

pub use array::{ArrayModel, MAX_ARRAY_SIZE, NewArray};
pub use bubble_sort::BubbleSort;
pub use hash_table::{HashFind, HashInsert, HashTable, MAX_KEY};
