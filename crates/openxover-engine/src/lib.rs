//! OpenXover engine — passive crossover / equalizer network simulation.
//!
//! AC analysis of a ladder of passive filter stages terminated by a fixed
//! load resistance. Pure math with no UI or audio framework dependencies.

// Topology catalog and per-family component formulas
pub mod bell;
pub mod catalog;
pub mod highpass;
pub mod lowpass;
pub mod shelf;

// Network model and solver
pub mod chain;
pub mod impedance;
pub mod stage;

// Response analysis
pub mod baseline;
pub mod engine;
pub mod error;
pub mod sweep;
pub mod units;
