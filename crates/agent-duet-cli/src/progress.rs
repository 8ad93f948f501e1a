//! Spinner shown while waiting on completion round-trips.

#[cfg(feature = "progress")]
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Duration;

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    let out = f();
    bar.finish_and_clear();
    out
}

#[cfg(not(feature = "progress"))]
pub fn with_spinner<T>(_message: &str, f: impl FnOnce() -> T) -> T {
    f()
}
