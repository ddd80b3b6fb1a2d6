//! Features built on top of the core catalog.

pub mod export;
pub mod stats;
