//! Shared configuration, errors and constants for the calendar filter.

pub mod config;
pub mod constants;
pub mod error;
