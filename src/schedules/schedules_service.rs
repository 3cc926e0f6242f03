use chrono::{NaiveDate, Utc};
use log::debug;
use num_traits::Zero;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::Result;
use crate::obligations::ObligationRepositoryTrait;
use crate::schedules::schedules_errors::ScheduleError;
use crate::schedules::schedules_model::{
    NewScheduleEntry, ScheduleEntry, ScheduleEntryView, ScheduleStats, ScheduleStatus,
};
use crate::schedules::schedules_traits::{ScheduleRepositoryTrait, ScheduleServiceTrait};

pub struct ScheduleService {
    schedule_repo: Arc<dyn ScheduleRepositoryTrait>,
    obligation_repo: Arc<dyn ObligationRepositoryTrait>,
}

impl ScheduleService {
    pub fn new(
        schedule_repo: Arc<dyn ScheduleRepositoryTrait>,
        obligation_repo: Arc<dyn ObligationRepositoryTrait>,
    ) -> Self {
        ScheduleService {
            schedule_repo,
            obligation_repo,
        }
    }
}

impl ScheduleServiceTrait for ScheduleService {
    fn create_entry(&self, new_entry: NewScheduleEntry) -> Result<ScheduleEntry> {
        new_entry.validate()?;

        // The owning obligation must exist and not be soft-deleted
        self.obligation_repo.get_obligation(&new_entry.obligation_id)?;

        self.schedule_repo.insert_entry(&new_entry)
    }

    fn list_schedule(&self, year: i32, month: u32) -> Result<Vec<ScheduleEntryView>> {
        let today = Utc::now().date_naive();

        let entries = self.schedule_repo.get_entries_by_month(year, month)?;
        Ok(entries
            .into_iter()
            .map(|entry| entry.to_view(today))
            .collect())
    }

    fn get_schedule_stats(&self, year: i32, month: u32) -> Result<ScheduleStats> {
        let today = Utc::now().date_naive();

        let entries = self.schedule_repo.get_entries_by_month(year, month)?;
        let overdue_count = self.schedule_repo.count_overdue_entries(today)?;

        let mut by_day: HashMap<String, Decimal> = HashMap::new();
        let mut total_scheduled = Decimal::zero();
        let mut entry_count = 0;

        for entry in &entries {
            // A superseded entry's amount lives on in its replacement
            if ScheduleStatus::from_str(&entry.status) == Ok(ScheduleStatus::Superseded) {
                continue;
            }
            let amount = entry.scheduled_amount_decimal();
            *by_day
                .entry(entry.scheduled_date.to_string())
                .or_insert(Decimal::zero()) += amount;
            total_scheduled += amount;
            entry_count += 1;
        }

        Ok(ScheduleStats {
            year,
            month,
            by_day,
            total_scheduled,
            entry_count,
            overdue_count,
        })
    }

    fn reschedule_entry(
        &self,
        entry_id: &str,
        new_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<ScheduleEntry> {
        let original = self.schedule_repo.get_entry(entry_id)?;

        match ScheduleStatus::from_str(&original.status) {
            Ok(ScheduleStatus::Pending) => {}
            _ => {
                return Err(ScheduleError::InvalidData(format!(
                    "Only pending entries can be rescheduled; {} is {}",
                    entry_id, original.status
                ))
                .into());
            }
        }

        debug!(
            "Rescheduling entry {} from {} to {}",
            entry_id, original.scheduled_date, new_date
        );

        let replacement = NewScheduleEntry {
            id: None,
            obligation_id: original.obligation_id.clone(),
            scheduled_date: new_date,
            scheduled_amount: original.scheduled_amount.clone(),
            notes,
        };

        self.schedule_repo.supersede_entry(entry_id, &replacement)
    }

    fn complete_entry(&self, entry_id: &str) -> Result<ScheduleEntry> {
        self.schedule_repo.complete_entry(entry_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::obligations::{Obligation, ObligationUpdate};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(id: &str, date: NaiveDate, amount: &str, status: &str) -> ScheduleEntry {
        let now = Utc::now().naive_utc();
        ScheduleEntry {
            id: id.to_string(),
            obligation_id: "ob-1".to_string(),
            scheduled_date: date,
            scheduled_amount: amount.to_string(),
            status: status.to_string(),
            superseded_by: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[derive(Default)]
    struct MockScheduleRepository {
        entries: Vec<ScheduleEntry>,
        overdue: i64,
        superseded: Mutex<Vec<(String, NaiveDate)>>,
    }

    impl ScheduleRepositoryTrait for MockScheduleRepository {
        fn insert_entry(&self, new_entry: &NewScheduleEntry) -> Result<ScheduleEntry> {
            Ok(entry(
                "generated",
                new_entry.scheduled_date,
                &new_entry.scheduled_amount,
                "PENDING",
            ))
        }

        fn get_entry(&self, entry_id: &str) -> Result<ScheduleEntry> {
            self.entries
                .iter()
                .find(|e| e.id == entry_id)
                .cloned()
                .ok_or_else(|| {
                    ScheduleError::NotFound(format!("Schedule entry {} not found", entry_id))
                        .into()
                })
        }

        fn get_entries_by_month(&self, _year: i32, _month: u32) -> Result<Vec<ScheduleEntry>> {
            Ok(self.entries.clone())
        }

        fn get_entries_by_obligation(&self, _obligation_id: &str) -> Result<Vec<ScheduleEntry>> {
            Ok(self.entries.clone())
        }

        fn get_pending_entries(&self) -> Result<Vec<ScheduleEntry>> {
            Ok(self
                .entries
                .iter()
                .filter(|e| e.status == "PENDING")
                .cloned()
                .collect())
        }

        fn count_overdue_entries(&self, _today: NaiveDate) -> Result<i64> {
            Ok(self.overdue)
        }

        fn supersede_entry(
            &self,
            entry_id: &str,
            replacement: &NewScheduleEntry,
        ) -> Result<ScheduleEntry> {
            self.superseded
                .lock()
                .unwrap()
                .push((entry_id.to_string(), replacement.scheduled_date));
            Ok(entry(
                "replacement",
                replacement.scheduled_date,
                &replacement.scheduled_amount,
                "PENDING",
            ))
        }

        fn complete_entry(&self, entry_id: &str) -> Result<ScheduleEntry> {
            self.get_entry(entry_id)
        }
    }

    struct MockObligationRepository;

    impl ObligationRepositoryTrait for MockObligationRepository {
        fn get_obligation(&self, _obligation_id: &str) -> Result<Obligation> {
            let now = Utc::now().naive_utc();
            Ok(Obligation {
                id: "ob-1".to_string(),
                name: "Lease".to_string(),
                total_amount: "100000".to_string(),
                paid_amount: "0".to_string(),
                status: "PENDING".to_string(),
                payment_type: "SINGLE".to_string(),
                start_date: d(2026, 1, 1),
                due_date: None,
                end_date: None,
                period_no: None,
                period_count: None,
                project_id: None,
                category_id: None,
                is_deleted: false,
                created_at: now,
                updated_at: now,
            })
        }

        fn get_obligations(&self) -> Result<Vec<Obligation>> {
            Ok(Vec::new())
        }

        fn insert_obligations(&self, _rows: Vec<Obligation>) -> Result<Vec<Obligation>> {
            unimplemented!("not exercised by schedule tests")
        }

        fn update_obligation(
            &self,
            _obligation_id: &str,
            _update: &ObligationUpdate,
            _new_status: Option<String>,
            _expected_paid: Option<String>,
        ) -> Result<Obligation> {
            unimplemented!("not exercised by schedule tests")
        }

        fn soft_delete_obligation(&self, _obligation_id: &str) -> Result<usize> {
            unimplemented!("not exercised by schedule tests")
        }
    }

    fn service(repo: Arc<MockScheduleRepository>) -> ScheduleService {
        ScheduleService::new(repo, Arc::new(MockObligationRepository))
    }

    #[test]
    fn test_stats_sum_per_day_and_in_total_excluding_superseded() {
        let repo = Arc::new(MockScheduleRepository {
            entries: vec![
                entry("e1", d(2026, 7, 5), "10000", "PENDING"),
                entry("e2", d(2026, 7, 5), "2500", "COMPLETED"),
                entry("e3", d(2026, 7, 20), "7000", "PENDING"),
                entry("e4", d(2026, 7, 20), "9999", "SUPERSEDED"),
            ],
            overdue: 3,
            ..Default::default()
        });

        let stats = service(repo).get_schedule_stats(2026, 7).unwrap();

        assert_eq!(stats.total_scheduled, dec!(19500));
        assert_eq!(stats.entry_count, 3);
        assert_eq!(stats.by_day.get("2026-07-05"), Some(&dec!(12500)));
        assert_eq!(stats.by_day.get("2026-07-20"), Some(&dec!(7000)));
        assert_eq!(stats.overdue_count, 3);
    }

    #[test]
    fn test_reschedule_supersedes_the_pending_original() {
        let repo = Arc::new(MockScheduleRepository {
            entries: vec![entry("e1", d(2026, 7, 5), "10000", "PENDING")],
            ..Default::default()
        });

        let replacement = service(repo.clone())
            .reschedule_entry("e1", d(2026, 8, 5), Some("pushed a month".to_string()))
            .unwrap();

        assert_eq!(replacement.scheduled_date, d(2026, 8, 5));
        assert_eq!(replacement.scheduled_amount, "10000");
        assert_eq!(
            *repo.superseded.lock().unwrap(),
            vec![("e1".to_string(), d(2026, 8, 5))]
        );
    }

    #[test]
    fn test_reschedule_rejects_non_pending_entries() {
        for status in ["COMPLETED", "SUPERSEDED"] {
            let repo = Arc::new(MockScheduleRepository {
                entries: vec![entry("e1", d(2026, 7, 5), "10000", status)],
                ..Default::default()
            });

            let result = service(repo.clone()).reschedule_entry("e1", d(2026, 8, 5), None);
            assert!(
                matches!(result, Err(Error::Schedule(ScheduleError::InvalidData(_)))),
                "{} entry must not be reschedulable",
                status
            );
            assert!(repo.superseded.lock().unwrap().is_empty());
        }
    }

    #[test]
    fn test_create_entry_requires_positive_amount() {
        let repo = Arc::new(MockScheduleRepository::default());
        let result = service(repo).create_entry(NewScheduleEntry {
            id: None,
            obligation_id: "ob-1".to_string(),
            scheduled_date: d(2026, 7, 5),
            scheduled_amount: "0".to_string(),
            notes: None,
        });

        assert!(matches!(
            result,
            Err(Error::Schedule(ScheduleError::InvalidData(_)))
        ));
    }
}
