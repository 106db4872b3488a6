//! Element type abstractions shared by readers and writers

pub mod element;

pub use element::{widen_into, StorageElement};
