//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that drives the runtime against mock
//! adapters.  No network, speaker or sensor device required.

mod advice_flow_tests;
mod mock_ports;
mod session_flow_tests;
