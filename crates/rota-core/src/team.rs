//! Team membership, accrual history, and the commit operations.
//!
//! A `Team` owns no state of its own: everything lives in the injected
//! [`HistoryStore`], and every logical update goes through `put_all` so a
//! reader never observes a half-applied commit.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date;
use crate::error::{Result, RotaError};
use crate::keys::Keys;
use crate::store::HistoryStore;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One member's participation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberHistory {
    pub name: String,
    /// Times this member has been confirmed for the duty.
    pub accrued: u16,
    /// Last day this member was confirmed; `None` when never picked.
    #[serde(with = "date::serde_opt_day")]
    pub latest_picked: Option<NaiveDate>,
}

/// Inclusive absence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutOfOffice {
    #[serde(with = "date::serde_day")]
    pub from: NaiveDate,
    #[serde(with = "date::serde_day")]
    pub to: NaiveDate,
}

impl OutOfOffice {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }
}

/// A member's window, as returned by the team-wide listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberOutOfOffice {
    pub name: String,
    #[serde(flatten)]
    pub window: OutOfOffice,
}

/// Member list as persisted under the team key.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TeamMembers {
    members: Vec<String>,
}

// ---------------------------------------------------------------------------
// Counter encoding
// ---------------------------------------------------------------------------

// Accrual counters are 2-byte big-endian u16 on the wire. Existing store
// data uses this width; widening it is a data migration.

fn encode_counter(value: u16) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

fn decode_counter(key: &str, raw: &[u8]) -> Result<u16> {
    let bytes: [u8; 2] = raw
        .try_into()
        .map_err(|_| RotaError::CorruptCounter(key.to_string()))?;
    Ok(u16::from_be_bytes(bytes))
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// The rotation engine for one team. The team name doubles as the key
/// namespace prefix.
pub struct Team {
    name: String,
    keys: Keys,
    store: Arc<dyn HistoryStore>,
}

impl Team {
    pub fn new(name: impl Into<String>, store: Arc<dyn HistoryStore>) -> Self {
        let name = name.into();
        let keys = Keys::new(name.clone());
        Self { name, keys, store }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Current member list in insertion order. Empty when the team key has
    /// never been written.
    pub fn list_members(&self) -> Result<Vec<String>> {
        match self.store.get(&self.keys.team())? {
            Some(raw) => {
                let parsed: TeamMembers = serde_yaml::from_slice(&raw)?;
                Ok(parsed.members)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Append a member. A name already present is a no-op; its accrued
    /// count is left alone. A newcomer's counter starts at the lowest count
    /// currently held by any member, so they neither jump the queue nor
    /// absorb every pick after joining.
    pub fn add_member(&self, name: &str) -> Result<()> {
        let mut members = self.list_members()?;
        if members.iter().any(|m| m == name) {
            tracing::info!(member = name, "already a member");
            return Ok(());
        }

        let floor = self.lowest_accrued(&members)?;
        members.push(name.to_string());
        let data = serde_yaml::to_string(&TeamMembers { members })?;

        let batch = BTreeMap::from([
            (self.keys.team(), data.into_bytes()),
            (self.keys.accrued_counter(name), encode_counter(floor)),
        ]);
        self.store.put_all(batch)
    }

    /// Remove a member from the list. Absent names are a no-op. History
    /// keys are left behind as orphans.
    pub fn remove_member(&self, name: &str) -> Result<()> {
        let mut members = self.list_members()?;
        members.retain(|m| m != name);
        let data = serde_yaml::to_string(&TeamMembers { members })?;
        self.store.put(&self.keys.team(), data.as_bytes())
    }

    fn lowest_accrued(&self, members: &[String]) -> Result<u16> {
        let mut floor = None;
        for member in members {
            let count = self.read_counter(&self.keys.accrued_counter(member))?;
            floor = Some(floor.map_or(count, |f: u16| f.min(count)));
        }
        Ok(floor.unwrap_or(0))
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// One member's record. Unrecorded members read as zero picks, never
    /// picked.
    pub fn history_of(&self, member: &str) -> Result<MemberHistory> {
        let accrued = self.read_counter(&self.keys.accrued_counter(member))?;
        let latest_picked = self.read_day(&self.keys.latest_day(member))?;
        Ok(MemberHistory {
            name: member.to_string(),
            accrued,
            latest_picked,
        })
    }

    /// Every current member's record, in membership order.
    pub fn team_history(&self) -> Result<Vec<MemberHistory>> {
        self.list_members()?
            .iter()
            .map(|m| self.history_of(m))
            .collect()
    }

    /// Who was picked on `day`, if anyone.
    pub fn pick_on_day(&self, day: NaiveDate) -> Result<Option<String>> {
        match self.store.get(&self.keys.pick_on_day(day))? {
            Some(raw) => String::from_utf8(raw)
                .map(Some)
                .map_err(|e| RotaError::Store(e.to_string())),
            None => Ok(None),
        }
    }

    // -----------------------------------------------------------------------
    // Commit / override
    // -----------------------------------------------------------------------

    /// Confirm `member` for today. Fails when the day is already taken,
    /// naming whoever holds it; otherwise counter bump, latest-picked day,
    /// the day's pick, and the trigger date land as one batch.
    pub fn commit_pick(&self, member: &str) -> Result<()> {
        let today = date::today();
        if let Some(current) = self.pick_on_day(today)? {
            return Err(RotaError::AlreadyAssigned(current));
        }

        let count = self.read_counter(&self.keys.accrued_counter(member))?;
        let day = date::format_day(today);

        let batch = BTreeMap::from([
            (
                self.keys.accrued_counter(member),
                encode_counter(count.saturating_add(1)),
            ),
            (self.keys.latest_day(member), day.clone().into_bytes()),
            (self.keys.pick_on_day(today), member.as_bytes().to_vec()),
            (self.keys.latest_trigger(), day.into_bytes()),
        ]);
        self.store.put_all(batch)
    }

    /// Replace today's pick with `member`, re-adjusting both counters.
    /// Delegates to [`Team::commit_pick`] when the day is still unset.
    pub fn override_pick(&self, member: &str) -> Result<()> {
        let today = date::today();
        let previous = match self.pick_on_day(today)? {
            Some(p) => p,
            None => return self.commit_pick(member),
        };

        let previous_count = self.read_counter(&self.keys.accrued_counter(&previous))?;
        let member_count = self.read_counter(&self.keys.accrued_counter(member))?;
        let day = date::format_day(today);

        let mut batch = BTreeMap::new();
        batch.insert(
            self.keys.accrued_counter(&previous),
            encode_counter(previous_count.saturating_sub(1)),
        );
        // The bumped member's true prior pick date would require a scan over
        // every daily key; reset to the long-ago fallback instead.
        batch.insert(
            self.keys.latest_day(&previous),
            date::format_day(date::long_ago()).into_bytes(),
        );
        batch.insert(
            self.keys.accrued_counter(member),
            encode_counter(member_count.saturating_add(1)),
        );
        batch.insert(self.keys.latest_day(member), day.clone().into_bytes());
        batch.insert(self.keys.pick_on_day(today), member.as_bytes().to_vec());
        batch.insert(self.keys.latest_trigger(), day.into_bytes());
        self.store.put_all(batch)
    }

    // -----------------------------------------------------------------------
    // Out of office
    // -----------------------------------------------------------------------

    /// Persist an absence window, overwriting any prior one. Range
    /// validation belongs to the caller-facing layer.
    pub fn set_out_of_office(&self, member: &str, from: NaiveDate, to: NaiveDate) -> Result<()> {
        let (from_key, to_key) = self.keys.out_of_office(member);
        let batch = BTreeMap::from([
            (from_key, date::format_day(from).into_bytes()),
            (to_key, date::format_day(to).into_bytes()),
        ]);
        self.store.put_all(batch)
    }

    /// A member's recorded window. `None` when no complete window exists.
    pub fn get_out_of_office(&self, member: &str) -> Result<Option<OutOfOffice>> {
        let (from_key, to_key) = self.keys.out_of_office(member);
        let from = self.store.get(&from_key)?;
        let to = self.store.get(&to_key)?;
        match (from, to) {
            (Some(from), Some(to)) => {
                let from = self.parse_stored_day(&from_key, from)?;
                let to = self.parse_stored_day(&to_key, to)?;
                Ok(Some(OutOfOffice { from, to }))
            }
            (None, None) => Ok(None),
            _ => {
                tracing::debug!(member, "incomplete out of office record");
                Ok(None)
            }
        }
    }

    /// Every member with a recorded window, in membership order.
    pub fn team_out_of_office(&self) -> Result<Vec<MemberOutOfOffice>> {
        let mut records = Vec::new();
        for member in self.list_members()? {
            if let Some(window) = self.get_out_of_office(&member)? {
                records.push(MemberOutOfOffice {
                    name: member,
                    window,
                });
            }
        }
        Ok(records)
    }

    /// A member with no recorded window is available; otherwise they are
    /// unavailable exactly while today falls inside the inclusive window.
    pub fn is_available(&self, member: &str) -> Result<bool> {
        self.available_on(member, date::today())
    }

    fn available_on(&self, member: &str, day: NaiveDate) -> Result<bool> {
        match self.get_out_of_office(member)? {
            Some(window) => Ok(!window.contains(day)),
            None => Ok(true),
        }
    }

    // -----------------------------------------------------------------------
    // Store plumbing
    // -----------------------------------------------------------------------

    pub(crate) fn read_counter(&self, key: &str) -> Result<u16> {
        match self.store.get(key)? {
            Some(raw) => decode_counter(key, &raw),
            None => Ok(0),
        }
    }

    pub(crate) fn read_day(&self, key: &str) -> Result<Option<NaiveDate>> {
        match self.store.get(key)? {
            Some(raw) => self.parse_stored_day(key, raw).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn keys(&self) -> &Keys {
        &self.keys
    }

    fn parse_stored_day(&self, key: &str, raw: Vec<u8>) -> Result<NaiveDate> {
        let text = String::from_utf8(raw).map_err(|_| RotaError::DateParse(key.to_string()))?;
        date::parse_day(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use chrono::Duration;

    fn test_team() -> (Arc<MemStore>, Team) {
        let store = Arc::new(MemStore::default());
        let team = Team::new("test_team", store.clone());
        (store, team)
    }

    fn seeded_team(members: &[&str]) -> (Arc<MemStore>, Team) {
        let (store, team) = test_team();
        for member in members {
            team.add_member(member).unwrap();
        }
        (store, team)
    }

    #[test]
    fn list_is_empty_when_team_never_written() {
        let (_, team) = test_team();
        assert_eq!(team.list_members().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let (_, team) = seeded_team(&["person1", "person2", "third person"]);
        assert_eq!(
            team.list_members().unwrap(),
            vec!["person1", "person2", "third person"]
        );
    }

    #[test]
    fn add_existing_member_is_a_noop() {
        let (_, team) = seeded_team(&["person1", "person2"]);
        team.add_member("person2").unwrap();
        assert_eq!(team.list_members().unwrap(), vec!["person1", "person2"]);
    }

    #[test]
    fn add_existing_member_preserves_accrued_count() {
        let (store, team) = seeded_team(&["person1"]);
        let keys = Keys::new("test_team");
        store
            .put(&keys.accrued_counter("person1"), &7u16.to_be_bytes())
            .unwrap();

        team.add_member("person1").unwrap();
        assert_eq!(team.history_of("person1").unwrap().accrued, 7);
    }

    #[test]
    fn first_member_counter_starts_at_zero() {
        let (_, team) = seeded_team(&["person1"]);
        assert_eq!(team.history_of("person1").unwrap().accrued, 0);
    }

    #[test]
    fn newcomer_counter_starts_at_lowest_existing_count() {
        let (store, team) = seeded_team(&["person1", "person2"]);
        let keys = Keys::new("test_team");
        store
            .put(&keys.accrued_counter("person1"), &9u16.to_be_bytes())
            .unwrap();
        store
            .put(&keys.accrued_counter("person2"), &4u16.to_be_bytes())
            .unwrap();

        team.add_member("newcomer").unwrap();
        assert_eq!(team.history_of("newcomer").unwrap().accrued, 4);
    }

    #[test]
    fn remove_existing_member_shrinks_list() {
        let (_, team) = seeded_team(&["person1", "person2", "third person"]);
        team.remove_member("third person").unwrap();
        assert_eq!(team.list_members().unwrap(), vec!["person1", "person2"]);
    }

    #[test]
    fn remove_absent_member_is_a_noop() {
        let (_, team) = seeded_team(&["person1", "person2"]);
        team.remove_member("nobody").unwrap();
        assert_eq!(team.list_members().unwrap(), vec!["person1", "person2"]);
    }

    #[test]
    fn history_of_unrecorded_member_is_zeroed() {
        let (_, team) = test_team();
        let history = team.history_of("ghost").unwrap();
        assert_eq!(
            history,
            MemberHistory {
                name: "ghost".to_string(),
                accrued: 0,
                latest_picked: None,
            }
        );
    }

    #[test]
    fn team_history_follows_membership_order() {
        let (_, team) = seeded_team(&["b", "a"]);
        let names: Vec<String> = team
            .team_history()
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn commit_pick_updates_all_records() {
        let (store, team) = seeded_team(&["person1"]);
        let keys = Keys::new("test_team");
        store
            .put(&keys.accrued_counter("person1"), &7u16.to_be_bytes())
            .unwrap();

        team.commit_pick("person1").unwrap();

        let today = date::today();
        let history = team.history_of("person1").unwrap();
        assert_eq!(history.accrued, 8);
        assert_eq!(history.latest_picked, Some(today));
        assert_eq!(team.pick_on_day(today).unwrap().as_deref(), Some("person1"));
        assert_eq!(
            store.get(&keys.latest_trigger()).unwrap(),
            Some(date::format_day(today).into_bytes())
        );
    }

    #[test]
    fn commit_pick_fails_when_day_already_assigned() {
        let (_, team) = seeded_team(&["person1", "person2"]);
        team.commit_pick("person1").unwrap();

        let err = team.commit_pick("person2").unwrap_err();
        match err {
            RotaError::AlreadyAssigned(name) => assert_eq!(name, "person1"),
            other => panic!("expected AlreadyAssigned, got {other:?}"),
        }
        // No state moved for the loser.
        assert_eq!(team.history_of("person2").unwrap().accrued, 0);
        assert_eq!(team.history_of("person1").unwrap().accrued, 1);
    }

    #[test]
    fn commit_pick_saturates_at_counter_ceiling() {
        let (store, team) = seeded_team(&["person1"]);
        let keys = Keys::new("test_team");
        store
            .put(&keys.accrued_counter("person1"), &u16::MAX.to_be_bytes())
            .unwrap();

        team.commit_pick("person1").unwrap();
        assert_eq!(team.history_of("person1").unwrap().accrued, u16::MAX);
    }

    #[test]
    fn override_on_unset_day_behaves_like_commit() {
        let (_, team) = seeded_team(&["person1"]);
        team.override_pick("person1").unwrap();

        let history = team.history_of("person1").unwrap();
        assert_eq!(history.accrued, 1);
        assert_eq!(history.latest_picked, Some(date::today()));
        assert_eq!(
            team.pick_on_day(date::today()).unwrap().as_deref(),
            Some("person1")
        );
    }

    #[test]
    fn override_swaps_counters_and_daily_pick() {
        let (_, team) = seeded_team(&["person1", "person2"]);
        team.commit_pick("person1").unwrap();
        team.override_pick("person2").unwrap();

        assert_eq!(team.history_of("person1").unwrap().accrued, 0);
        assert_eq!(team.history_of("person2").unwrap().accrued, 1);
        assert_eq!(
            team.pick_on_day(date::today()).unwrap().as_deref(),
            Some("person2")
        );
    }

    #[test]
    fn override_resets_previous_latest_pick_to_fallback() {
        let (_, team) = seeded_team(&["person1", "person2"]);
        team.commit_pick("person1").unwrap();
        team.override_pick("person2").unwrap();

        assert_eq!(
            team.history_of("person1").unwrap().latest_picked,
            Some(date::long_ago())
        );
    }

    #[test]
    fn override_floors_previous_counter_at_zero() {
        let (store, team) = seeded_team(&["person1", "person2"]);
        team.commit_pick("person1").unwrap();
        // Force the sitting member's counter to zero before the override.
        let keys = Keys::new("test_team");
        store
            .put(&keys.accrued_counter("person1"), &0u16.to_be_bytes())
            .unwrap();

        team.override_pick("person2").unwrap();
        assert_eq!(team.history_of("person1").unwrap().accrued, 0);
    }

    #[test]
    fn available_when_no_window_recorded() {
        let (_, team) = seeded_team(&["person1"]);
        assert!(team.is_available("person1").unwrap());
    }

    #[test]
    fn unavailable_inside_window_inclusive_of_bounds() {
        let (_, team) = seeded_team(&["person1"]);
        let today = date::today();
        team.set_out_of_office("person1", today, today).unwrap();
        assert!(!team.is_available("person1").unwrap());
    }

    #[test]
    fn available_once_window_has_passed() {
        let (_, team) = seeded_team(&["person1"]);
        let today = date::today();
        team.set_out_of_office("person1", today - Duration::days(5), today - Duration::days(1))
            .unwrap();
        assert!(team.is_available("person1").unwrap());
    }

    #[test]
    fn set_out_of_office_overwrites_prior_window() {
        let (_, team) = seeded_team(&["person1"]);
        let today = date::today();
        team.set_out_of_office("person1", today, today + Duration::days(1))
            .unwrap();
        team.set_out_of_office(
            "person1",
            today + Duration::days(10),
            today + Duration::days(12),
        )
        .unwrap();

        let window = team.get_out_of_office("person1").unwrap().unwrap();
        assert_eq!(window.from, today + Duration::days(10));
        assert!(team.is_available("person1").unwrap());
    }

    #[test]
    fn team_out_of_office_lists_only_members_with_windows() {
        let (_, team) = seeded_team(&["person1", "person2"]);
        let today = date::today();
        team.set_out_of_office("person2", today, today + Duration::days(2))
            .unwrap();

        let records = team.team_out_of_office().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "person2");
        assert_eq!(records[0].window.to, today + Duration::days(2));
    }

    #[test]
    fn corrupt_counter_is_an_error_not_a_default() {
        let (store, team) = seeded_team(&["person1"]);
        let keys = Keys::new("test_team");
        store.put(&keys.accrued_counter("person1"), &[1]).unwrap();

        assert!(matches!(
            team.history_of("person1"),
            Err(RotaError::CorruptCounter(_))
        ));
    }
}
