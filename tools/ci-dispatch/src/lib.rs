//! Dispatcher for the remote compiler test suite.
//!
//! The dispatcher takes a list of mode flags and test identifiers, optionally uploads the freshly
//! built compiler into the test container, and then asks the remote test script to run each test in
//! turn, echoing whatever the script printed.

pub mod args;
pub mod collaborator;
pub mod config;
pub mod dispatcher;
pub mod payload;
pub mod target;
