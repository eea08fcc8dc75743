//! Domain Value Objects
//!
//! Immutable value types shared across the asset graph.

mod asset_id;
mod environment;
mod on_disk;
mod target;

pub use asset_id::AssetId;
pub use environment::Environment;
pub use on_disk::OnDiskFiles;
pub use target::Target;
