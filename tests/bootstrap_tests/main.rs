//! Bootstrap test suite
