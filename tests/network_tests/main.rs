//! Network test suite

mod server_tests;
