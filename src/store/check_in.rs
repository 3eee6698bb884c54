use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::store::local::LocalStorage;
use crate::store::schema::CHECK_IN_KEY;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub date: NaiveDate,
}

/// Daily check-ins, at most one record per calendar date.
pub struct CheckIns {
    storage: LocalStorage,
}

impl CheckIns {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn records(&self) -> Vec<CheckInRecord> {
        self.storage.get_or_default(CHECK_IN_KEY)
    }

    pub fn write(&self, records: &[CheckInRecord]) -> Result<()> {
        self.storage.set(CHECK_IN_KEY, records)
    }

    pub fn has_checked_in(&self, date: NaiveDate) -> bool {
        self.records().iter().any(|r| r.date == date)
    }

    /// Record a check-in for `date`. Returns false if one already exists.
    pub fn check_in(&self, date: NaiveDate) -> Result<bool> {
        let mut records = self.records();
        if records.iter().any(|r| r.date == date) {
            return Ok(false);
        }
        records.push(CheckInRecord { date });
        self.write(&records)?;
        log::info!("checked in for {date}");
        Ok(true)
    }

    pub fn week_status(&self, date: NaiveDate) -> [bool; 7] {
        week_status(&self.records(), date)
    }

    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        current_streak(&self.records(), today)
    }

    pub fn total_days(&self) -> usize {
        self.records().len()
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Check-in flags for Monday..Sunday of the week containing `date`.
pub fn week_status(records: &[CheckInRecord], date: NaiveDate) -> [bool; 7] {
    let monday = week_start(date);
    let mut status = [false; 7];
    for record in records {
        let offset = record.date.signed_duration_since(monday).num_days();
        if (0..7).contains(&offset) {
            status[offset as usize] = true;
        }
    }
    status
}

/// Consecutive checked-in days ending today, or ending yesterday when today
/// has no check-in yet.
pub fn current_streak(records: &[CheckInRecord], today: NaiveDate) -> u32 {
    let has = |d: NaiveDate| records.iter().any(|r| r.date == d);
    let mut day = if has(today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak = 0;
    while has(day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_check_ins() -> (TempDir, CheckIns) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, CheckIns::new(storage))
    }

    #[test]
    fn checking_in_twice_keeps_one_record() {
        let (_dir, check_ins) = make_check_ins();
        let day = date("2024-05-06");
        assert!(check_ins.check_in(day).unwrap());
        assert!(!check_ins.check_in(day).unwrap());
        assert_eq!(check_ins.records(), vec![CheckInRecord { date: day }]);
        assert!(check_ins.has_checked_in(day));
    }

    #[test]
    fn monday_and_friday_week_status() {
        // 2024-05-06 is a Monday
        let records = vec![
            CheckInRecord { date: date("2024-05-06") },
            CheckInRecord { date: date("2024-05-10") },
            CheckInRecord { date: date("2024-05-13") },
        ];
        assert_eq!(
            week_status(&records, date("2024-05-08")),
            [true, false, false, false, true, false, false]
        );
        assert_eq!(
            week_status(&records, date("2024-05-12")),
            [true, false, false, false, true, false, false]
        );
    }

    #[test]
    fn stored_as_date_strings() {
        let (_dir, check_ins) = make_check_ins();
        check_ins.check_in(date("2024-01-31")).unwrap();
        let raw: serde_json::Value = check_ins.storage.get(CHECK_IN_KEY).unwrap();
        assert_eq!(raw, serde_json::json!([{"date": "2024-01-31"}]));
    }

    #[test]
    fn streak_counts_back_from_today_or_yesterday() {
        let records: Vec<CheckInRecord> = ["2024-05-03", "2024-05-04", "2024-05-05", "2024-05-01"]
            .iter()
            .map(|d| CheckInRecord { date: date(d) })
            .collect();
        assert_eq!(current_streak(&records, date("2024-05-05")), 3);
        assert_eq!(current_streak(&records, date("2024-05-06")), 3);
        assert_eq!(current_streak(&records, date("2024-05-07")), 0);
        assert_eq!(current_streak(&[], date("2024-05-07")), 0);
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let (dir, check_ins) = make_check_ins();
        std::fs::write(dir.path().join("vocabulary_check_in.json"), "[{\"date\": 5}]").unwrap();
        assert!(check_ins.records().is_empty());
        assert_eq!(check_ins.total_days(), 0);
    }
}
