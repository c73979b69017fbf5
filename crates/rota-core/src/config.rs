//! Service configuration.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RotaError};
use crate::holidays;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotaConfig {
    /// Team name; also the key namespace in the store.
    pub team_name: String,

    /// Local time of day (`HH:MM`) the daily pick proposal fires.
    #[serde(default = "default_pick_time")]
    pub pick_time: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL used to build confirm links in notifications.
    #[serde(default)]
    pub ingress_url: Option<String>,

    /// Slack incoming webhook. Absent means announcements are logged only.
    #[serde(default)]
    pub slack_webhook_url: Option<String>,

    #[serde(default)]
    pub slack_channel: Option<String>,

    #[serde(default)]
    pub slack_username: Option<String>,

    #[serde(default = "default_region")]
    pub holiday_region: String,

    /// Seven-day teams: keep picking on weekends.
    #[serde(default)]
    pub weekend_cover: bool,
}

fn default_pick_time() -> String {
    "09:00".to_string()
}

fn default_port() -> u16 {
    9090
}

fn default_db_path() -> PathBuf {
    PathBuf::from("rota.redb")
}

fn default_region() -> String {
    holidays::DEFAULT_REGION.to_string()
}

impl RotaConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: RotaConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Parsed `pick_time`.
    pub fn pick_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.pick_time, "%H:%M")
            .map_err(|_| RotaError::DateParse(self.pick_time.clone()))
    }
}
