//! Core services coordinating peer review of scientific works at an
//! exhibition: one-shot evaluator distribution under conflict-of-interest
//! and load-balancing constraints, score recording, and progress/podium
//! aggregation.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
