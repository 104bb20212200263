#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;

/// Hash strategies for mapping keys to home slots.
///
/// The table accepts any [`KeyHasher`], including plain functions and
/// closures. The byte-sum and DJB2 reference strategies are provided here.
pub mod hash;

pub mod table;

pub use error::TableError;
pub use hash::KeyHasher;
pub use table::LinearTable;
pub use table::NOT_FOUND;
pub use table::Slot;
