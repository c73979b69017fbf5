//! Fairness ranking and next-pick selection.
//!
//! Plain lowest-accrued-count ordering would repeat the same person on
//! consecutive runs once picked. The cooldown term — twice the number of
//! days since the schedule last ran — forces a breather between repeats
//! while the ranking still converges to fairness over time.

use crate::date;
use crate::error::Result;
use crate::team::{MemberHistory, Team};

/// Outcome of a selection run. Nobody qualifying is an answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPick {
    Member(String),
    /// The team has no recorded history at all.
    NoHistory,
    /// Every candidate is inside the cooldown window or out of office.
    NoneEligible,
}

impl NextPick {
    pub fn member(&self) -> Option<&str> {
        match self {
            NextPick::Member(name) => Some(name),
            _ => None,
        }
    }
}

impl Team {
    /// Team history sorted ascending by accrued count. The sort is stable,
    /// so equal counts keep membership order — this is the fairness ranking.
    pub fn ordered_history(&self) -> Result<Vec<MemberHistory>> {
        let mut history = self.team_history()?;
        history.sort_by_key(|h| h.accrued);
        Ok(history)
    }

    /// Minimum days required since a member's last pick before they are
    /// eligible again: twice the days since the last trigger run, so at
    /// least two other people rotate through before a repeat. Zero when no
    /// trigger has been recorded. A trigger date after today is refused —
    /// a skewed clock must not corrupt the fairness window.
    pub fn cooldown_days(&self) -> Result<i64> {
        match self.read_day(&self.keys().latest_trigger())? {
            Some(last_run) => Ok(2 * date::days_between(last_run, date::today())?),
            None => Ok(0),
        }
    }

    /// Pick the next person: walk the fairness ranking and return the first
    /// member past the cooldown and not out of office. Read-only.
    pub fn select_next(&self) -> Result<NextPick> {
        let ordered = self.ordered_history()?;
        if ordered.is_empty() {
            return Ok(NextPick::NoHistory);
        }

        let today = date::today();
        let cooldown = self.cooldown_days()?;
        tracing::info!(cooldown, "minimum days between repeat picks");

        for candidate in ordered {
            let last_picked = candidate.latest_picked.unwrap_or_else(date::long_ago);
            let days_since = date::days_between(last_picked, today)?;
            if days_since <= cooldown {
                continue;
            }
            if self.is_available(&candidate.name)? {
                return Ok(NextPick::Member(candidate.name));
            }
        }
        Ok(NextPick::NoneEligible)
    }
}
