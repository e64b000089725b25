/// Messages sent from the scan thread to the UI over a crossbeam channel.
///
/// The tree itself is shared through the `LiveTree`; these messages carry
/// only counters and status.
use std::time::Duration;

#[derive(Debug)]
pub enum ScanProgress {
    /// Periodic running totals.
    Update {
        files_found: u64,
        dirs_found: u64,
        current_path: String,
    },
    /// A non-fatal problem with one entry (e.g. permission denied).
    Error { path: String, message: String },
    /// The walk finished and the tree has been aggregated.
    Complete {
        duration: Duration,
        error_count: u64,
    },
    /// The scan stopped early at the user's request. The live tree holds
    /// whatever was found so far.
    Cancelled,
    /// The root could not be scanned at all.
    Failed { message: String },
}

impl ScanProgress {
    /// `true` for messages after which the scan thread sends nothing more.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Complete { .. } | Self::Cancelled | Self::Failed { .. }
        )
    }
}
