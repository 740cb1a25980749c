//! Smoke Break - Telegram bot that coordinates ad-hoc smoke breaks.
//!
//! One participant proposes a break, everyone available is invited, answers
//! are collected and fanned out, and the break closes on its own after a
//! while. At most one break is open at any time.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
