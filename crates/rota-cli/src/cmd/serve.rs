use std::path::Path;
use std::sync::Arc;

use rota_core::holidays::HolidayCalendar;
use rota_core::notify::{Notifier, NoopNotifier, SlackNotifier};
use rota_server::AppState;

pub fn run(config_path: &Path) -> anyhow::Result<()> {
    let (cfg, team) = super::open_team(config_path)?;
    let pick_time = cfg.pick_time()?;

    let notifier: Arc<dyn Notifier> = match &cfg.slack_webhook_url {
        Some(url) => Arc::new(SlackNotifier::new(
            url.clone(),
            cfg.slack_channel.clone(),
            cfg.slack_username.clone(),
        )),
        None => Arc::new(NoopNotifier),
    };

    // Blocking fetch, so before the runtime starts.
    let mut calendar = HolidayCalendar::load(&cfg.holiday_region);
    if cfg.weekend_cover {
        calendar = calendar.with_weekend_cover();
    }

    let ingress_url = cfg
        .ingress_url
        .clone()
        .unwrap_or_else(|| format!("http://localhost:{}", cfg.port));
    let state = AppState::new(team, notifier, calendar, ingress_url);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(rota_server::serve(state, cfg.port, pick_time))
}
