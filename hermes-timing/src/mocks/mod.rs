//! Mocked entities (useful for tests mostly).

pub mod target;

pub use target::MockTarget;
