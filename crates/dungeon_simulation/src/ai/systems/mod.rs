//! AI systems

pub mod behavior;

#[cfg(test)]
mod tick_tests;

// Re-export all systems
pub use behavior::*;
