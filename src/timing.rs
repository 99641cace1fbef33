//! Execution timing for insight queries

use std::time::Instant;

/// Run `f`, logging when it starts and how long it took
pub fn timed<T, F>(function: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    tracing::info!(function, "STARTED");

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    tracing::info!(
        function,
        elapsed_secs = elapsed.as_secs_f64(),
        "FINISHED in {:.6} seconds",
        elapsed.as_secs_f64()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_returns_result() {
        assert_eq!(timed("answer", || 42), 42);
        let failed: Result<(), &str> = timed("fails", || Err("boom"));
        assert_eq!(failed, Err("boom"));
    }
}
