//! Recurring pick proposal.
//!
//! One tokio task sleeps until the configured time of day, proposes the
//! next pick, and announces it with a confirm link per member in fairness
//! order. A failed tick is logged and the loop carries on — the scheduler
//! never dies because one run went wrong.

use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use rota_core::date;
use rota_core::picker::NextPick;
use rota_core::team::MemberHistory;

use crate::state::AppState;

pub fn spawn(state: AppState, at: NaiveTime) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let delay = next_fire_delay(Local::now().naive_local(), at);
            tracing::info!(seconds = delay.as_secs(), "next pick proposal scheduled");
            tokio::time::sleep(delay).await;

            if let Err(err) = tick(&state).await {
                tracing::error!(%err, "pick proposal failed, continuing to next run");
            }
        }
    })
}

/// Time until the next occurrence of `at`: later today, or tomorrow when
/// `at` has already passed.
fn next_fire_delay(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let today_fire = now.date().and_time(at);
    let fire = if now < today_fire {
        today_fire
    } else {
        today_fire + chrono::Duration::days(1)
    };
    (fire - now).to_std().unwrap_or(Duration::ZERO)
}

async fn tick(state: &AppState) -> anyhow::Result<()> {
    if let Some(reason) = state.calendar.today_non_working() {
        tracing::info!(%reason, "skipping pick proposal on a non-working day");
        return Ok(());
    }

    let team = state.team.clone();
    let (pick, ordered) = tokio::task::spawn_blocking(move || {
        let pick = team.select_next()?;
        let ordered = team.ordered_history()?;
        Ok::<_, rota_core::RotaError>((pick, ordered))
    })
    .await??;

    let message = match pick {
        NextPick::Member(name) => proposal_message(&state.ingress_url, &name, &ordered),
        NextPick::NoHistory => {
            tracing::warn!("team has no recorded history, nothing to propose");
            return Ok(());
        }
        NextPick::NoneEligible => {
            "Nobody is eligible to be picked today. Use an override link to assign someone."
                .to_string()
        }
    };

    let notifier = state.notifier.clone();
    tokio::task::spawn_blocking(move || notifier.send(&message)).await??;
    Ok(())
}

fn proposal_message(ingress: &str, pick: &str, ordered: &[MemberHistory]) -> String {
    let today = date::format_day(date::today());
    let mut message = format!(
        "The person picked for today is: {pick}.\n\
         To confirm, all you have to do is to click: {ingress}/rota/confirm/{pick}/{today}\n\n\
         To select a different person, click the below ordered link:\n"
    );
    for (index, member) in ordered.iter().enumerate() {
        message.push_str(&format!(
            "{}. {ingress}/rota/confirm/{}/{today}\n",
            index + 1,
            member.name
        ));
    }
    message
}
