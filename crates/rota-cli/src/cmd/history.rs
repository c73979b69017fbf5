use std::path::Path;

use rota_core::date;
use rota_core::team::MemberHistory;

use crate::output::{print_json, print_table};

pub fn run(config: &Path, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (_, team) = super::open_team(config)?;

    let history = match name {
        Some(member) => vec![team.history_of(member)?],
        None => team.team_history()?,
    };

    if json {
        print_json(&history)?;
    } else {
        print_table(
            &["NAME", "ACCRUED", "LAST PICKED"],
            history.iter().map(row).collect(),
        );
    }
    Ok(())
}

fn row(history: &MemberHistory) -> Vec<String> {
    vec![
        history.name.clone(),
        history.accrued.to_string(),
        history
            .latest_picked
            .map(date::format_day)
            .unwrap_or_else(|| "never".to_string()),
    ]
}
