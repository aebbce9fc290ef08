//! lockgate_sim
//!
//! Drives an `AuthGate` from a line-oriented script with a simulated authenticator and
//! a curtain that only logs. Useful for exploring lifecycle races by hand.

pub mod config;
pub mod script;
pub mod sim;
