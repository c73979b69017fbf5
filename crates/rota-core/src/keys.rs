//! Store key scheme.
//!
//! Every key is namespaced by the team name. The layout is load-bearing:
//! existing deployments carry data under these exact strings, so changes
//! here are data migrations.

use chrono::NaiveDate;

use crate::date;

#[derive(Debug, Clone)]
pub struct Keys {
    root: String,
}

impl Keys {
    pub fn new(root_prefix: impl Into<String>) -> Self {
        Self {
            root: root_prefix.into(),
        }
    }

    /// Member list for the team.
    pub fn team(&self) -> String {
        format!("{}::team_members", self.root)
    }

    /// Accrued pick counter for one member.
    pub fn accrued_counter(&self, member: &str) -> String {
        format!("{}::member::{}", self.root, member)
    }

    /// Who was picked on a given day.
    pub fn pick_on_day(&self, day: NaiveDate) -> String {
        format!("{}::{}", self.root, date::format_day(day))
    }

    /// Most recent day a member was confirmed.
    pub fn latest_day(&self, member: &str) -> String {
        format!("{}::latest-day::{}", self.root, member)
    }

    /// Last day the recurring trigger ran.
    pub fn latest_trigger(&self) -> String {
        format!("{}::latest-cron", self.root)
    }

    /// Out-of-office window bounds for one member: `(from, to)` keys.
    pub fn out_of_office(&self, member: &str) -> (String, String) {
        let base = format!("{}::out_of_office::{}", self.root, member);
        (format!("{base}::from_date"), format!("{base}::to_date"))
    }
}
