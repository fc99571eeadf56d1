//! Integration tests for chronon timing behavior.

mod common;
mod config_test;
mod duration_test;
mod rate_test;
