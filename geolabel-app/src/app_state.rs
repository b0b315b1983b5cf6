/// Where the labelling window is in its lifecycle.
///
/// Used to pick what the central panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionPhase {
    /// Waiting for the map image from the fetch worker.
    Loading,
    /// Session live: the operator can move the marker and commit.
    Labelling,
    /// No session could be started; carries the reason for display.
    Failed(String),
    /// A label was written; the window is closing.
    Committed,
}

