use std::process::ExitCode;

/// Process exit status of a `tscat` run.
///
/// - `Success` (0): every catalog was handled, at most warnings were reported
/// - `Failure` (1): a catalog has errors, or could not be updated or pruned
/// - `Error` (2): the run itself failed (bad config, unreadable input)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Catalog-level errors; nothing was written.
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
