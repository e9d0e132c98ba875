use chrono::Utc;

use crate::error::Result;

/// Current wall-clock time in microseconds: seconds * 1e6 + sub-second
/// microseconds.
pub fn current_us() -> f64 {
    let now = Utc::now();
    1e6 * now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros())
}

/// Calls `f` `count` times and returns the elapsed wall-clock microseconds.
///
/// The first error from `f` stops the loop. A wall clock that steps
/// backwards during the loop yields `0.0`, never a negative duration.
pub fn time_repeated<F>(count: usize, mut f: F) -> Result<f64>
where
    F: FnMut() -> Result<()>,
{
    let start = current_us();
    repeat(count, &mut f)?;
    let end = current_us();
    Ok((end - start).max(0.0))
}

/// Calls `f` `count` times without timing it.
pub fn repeat<F>(count: usize, mut f: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    for _ in 0..count {
        f()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::validation_error;

    #[test]
    fn test_current_us_is_epoch_micros() {
        let before = Utc::now().timestamp_micros() as f64;
        let sample = current_us();
        let after = Utc::now().timestamp_micros() as f64;
        assert!(sample >= before && sample <= after);
    }

    #[test]
    fn test_time_repeated_counts_calls() {
        let mut calls = 0;
        let elapsed = time_repeated(5, || {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(calls, 5);
        assert!(elapsed >= 0.0);
    }

    #[test]
    fn test_time_repeated_measures_sleep() {
        let elapsed = time_repeated(2, || {
            std::thread::sleep(std::time::Duration::from_millis(5));
            Ok(())
        })
        .unwrap();
        assert!(elapsed >= 10_000.0, "elapsed {elapsed}us");
    }

    #[test]
    fn test_error_stops_loop() {
        let mut calls = 0;
        let result = repeat(10, || {
            calls += 1;
            if calls == 3 {
                Err(validation_error("boom"))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }
}
