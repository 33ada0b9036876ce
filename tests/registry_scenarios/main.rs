//! Registry Scenario Tests
//!
//! End-to-end behavior through the public facade:
//! - The four reference scenarios (ownership, enumeration, pause, freeze)
//! - Authorization and flag properties
//! - Input validation
//! - Disk-backed reopen

mod common;

mod end_to_end;
mod persistence;
mod properties;
mod validation;
