use flow_core::SnapshotError;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Graph replacement attempted while a gesture was active.
    #[error("cannot replace the graph while {0} is in progress")]
    Busy(&'static str),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
