//! Run command handler.

use anyhow::Result;
use glance_core::config::Config;

pub async fn run(config: Config) -> Result<()> {
    glance_session::run(config).await
}
