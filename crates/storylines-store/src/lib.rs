//! StoryLines: Snapshot persistence on the local file system.

mod file_snapshot_store;

pub use file_snapshot_store::FileSnapshotStore;
