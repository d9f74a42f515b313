//! Game implementations.

pub mod memory;
