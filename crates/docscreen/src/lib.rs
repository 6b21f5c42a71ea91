//! Machine readable travel document screening: ICAO Doc 9303 MRZ validation,
//! visual-zone cross-checks, and severity-weighted tamper risk scoring.

pub mod config;
pub mod error;
pub mod screening;
pub mod telemetry;
