pub mod history;
pub mod member;
pub mod next;
pub mod ooo;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use rota_core::config::RotaConfig;
use rota_core::store::RedbStore;
use rota_core::team::Team;

/// Open the team described by the config file. Used by every command that
/// talks to the store directly instead of going through the server.
pub(crate) fn open_team(config_path: &Path) -> anyhow::Result<(RotaConfig, Team)> {
    let cfg = RotaConfig::load(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    let store = Arc::new(
        RedbStore::open(&cfg.db_path)
            .with_context(|| format!("failed to open store {}", cfg.db_path.display()))?,
    );
    let team = Team::new(cfg.team_name.clone(), store);
    Ok((cfg, team))
}
