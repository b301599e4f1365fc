//! Serial runner for rspec suites that tick a Bevy world.

use rspec::report::Report;
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};
use std::sync::Arc;

/// Runs `suite` on one thread, in declaration order, so examples observe the
/// frames earlier examples advanced.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let report = Runner::new(config, vec![Arc::new(Logger::new(std::io::stdout()))]).run(suite);
    assert!(report.is_success(), "rspec suite reported failures");
}
