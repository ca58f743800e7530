#![allow(dead_code)]

pub mod logging;
pub mod stub;

pub use logging::init_test_logging;
pub use stub::{StubBehavior, StubService};
