use crate::state::BUSY_LABEL;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar shown while a refresh is busy; one tick per ticker.
pub fn refresh_pb(length: u64) -> ProgressBar {
    let pb = ProgressBar::new(length);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [ {bar:40} ] {pos}/{len} {msg} {spinner}")
            .expect("progress bar template is valid")
            .progress_chars("#|-"),
    );
    pb.set_message(BUSY_LABEL);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Indeterminate spinner for when the ticker count is not known up front.
pub fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} [{elapsed_precise}]")
            .expect("spinner template is valid"),
    );
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
