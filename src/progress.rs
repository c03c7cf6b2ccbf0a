use std::sync::Arc;

use dtc_lib::ProgressCallback;

/// Progress messages go to stderr, and only in verbose mode.
pub fn stderr_progress(verbose: bool) -> Option<ProgressCallback> {
    if verbose {
        Some(Arc::new(|msg: &str| eprintln!("{msg}")))
    } else {
        None
    }
}
