//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the control service
//! against mock adapters.  All tests run on the host with no relay board
//! or segmentation backend required.

mod service_tests;
