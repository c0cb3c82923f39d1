//! Route definitions.

pub mod health;
pub mod protected;
pub mod register;
