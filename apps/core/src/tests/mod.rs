//! Test Module
//!
//! Cross-module test suite for the smartbot backend.
//!
//! ## Test Categories
//! - `brain_tests`: classification, extraction, evaluation and solver behaviour
//! - `actor_tests`: supervisor and Wikipedia actor behaviour, including panics and timeouts
//! - `integration_tests`: full question-to-answer workflows and answer invariants
//! - `config_tests`: configuration loading from the process environment

pub mod brain_tests;
