//! Integration tests for the EVPPI pipeline
//!
//! Tests are organized by topic:
//! - `sampling` - Monte Carlo driver: determinism, row alignment, cancellation, errors
//! - `estimation` - EVPPI on synthetic models with known answers
//! - `pollution_model` - End-to-end runs of the PM2.5 burden model
//! - `builder_dsl` - Builder DSL for fluent configuration

mod estimation;
