//! Tests for the compiled binary in headless mode.

pub mod headless_test;
