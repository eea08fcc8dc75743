use uuid::Uuid;

use crate::domain::entities::{Content, State};
use crate::domain::ports::{Asset, Generated, Parents};
use crate::domain::value_objects::{AssetId, OnDiskFiles};
use crate::error::AssetResult;

use super::INSTALL_CONFIG_FILENAME;

/// Random cluster UUID, kept in memory until the install config embeds it
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterId;

impl Asset for ClusterId {
    fn name(&self) -> &str {
        "Cluster ID"
    }

    fn dependencies(&self) -> Vec<AssetId> {
        Vec::new()
    }

    fn generate(&self, _parents: &Parents, on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        if on_disk.contains(INSTALL_CONFIG_FILENAME) {
            return Ok(Generated::Skipped);
        }

        let id = Uuid::new_v4().to_string();
        Ok(Generated::State(
            State::new().with_content(Content::in_memory(id)),
        ))
    }
}
