//! End-to-end tests over a local HTTP range server.

pub mod common;
pub mod connection_test;
pub mod page_test;
pub mod range_test;
