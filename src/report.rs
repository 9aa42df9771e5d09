//! Lines printed by the benchmark driver.

use std::time::Duration;

pub fn algorithm_line(name: &str, workers: usize) -> String {
    format!(
        "Algorithm: {} with {} worker{}.",
        name,
        workers,
        if workers != 1 { "s" } else { "" }
    )
}

pub fn elapsed_line(name: &str, elapsed: Duration) -> String {
    format!(
        "Time elapsed for {}: {} seconds and {} microseconds.",
        name,
        elapsed.as_secs(),
        elapsed.subsec_micros()
    )
}

pub fn verification_line(name: &str, passed: bool) -> String {
    format!(
        "Verification for {}: {}.",
        name,
        if passed { "success" } else { "failure" }
    )
}
