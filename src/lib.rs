//! An ordered set over any totally ordered element type, backed by a skip
//! list whose links also record how many elements they skip. On top of the
//! usual `insert`/`remove`/`contains` and `floor`/`ceiling` searches this
//! gives `get_by_rank` in logarithmic expected time, and `rebuild` turns the
//! randomized structure into a perfectly balanced one.
//!
//! ```
//! use indexed_skiplist::SkipList;
//!
//! let mut list = SkipList::with_seed(7);
//! for key in &[9, 1, 7, 3, 5] {
//!     list.insert(*key);
//! }
//!
//! assert_eq!(list.get_by_rank(2), Some(&5));
//! assert_eq!(list.floor(&4), Some(&3));
//! assert_eq!(list.ceiling(&4), Some(&5));
//!
//! list.rebuild();
//! assert_eq!(list.iter().cloned().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9]);
//! ```

mod error;
mod height_control;
mod iter;
mod node;
mod skiplist;

pub use error::Error;
pub use height_control::{GeometricalGenerator, HashCoinGenerator, HeightControl, MAX_HEIGHT};
pub use iter::{IntoIter, Iter};
pub use skiplist::SkipList;
