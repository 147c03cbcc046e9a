//! Parser module — recursive-descent signature parsing and source scanning.

pub mod scanner;
pub mod signature;
