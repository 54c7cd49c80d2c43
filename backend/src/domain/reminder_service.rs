use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::dates;
use crate::domain::errors::DomainError;
use crate::storage::DbConnection;
use shared::Reminder;

/// How far ahead a birthday counts as "upcoming".
const REMINDER_WINDOW_DAYS: i64 = 30;

/// Builds the upcoming-birthday projection. Read-only, recomputed from
/// stored state on every call.
#[derive(Clone)]
pub struct ReminderService {
    db: DbConnection,
}

impl ReminderService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// One entry per kid whose birthday falls within the next 30 days,
    /// soonest first. Ties keep roster order.
    pub async fn build_reminders(&self, today: NaiveDate) -> Result<Vec<Reminder>, DomainError> {
        let kids = self.db.list_kids().await?;

        let mut reminders: Vec<Reminder> = kids
            .iter()
            .filter_map(|kid| {
                let Some(birthday) = dates::parse_date(&kid.birthday) else {
                    warn!("Skipping kid {} with unparseable birthday: {}", kid.id, kid.birthday);
                    return None;
                };
                Some(Reminder {
                    kid_id: kid.id.clone(),
                    kid_name: kid.name.clone(),
                    birthday: kid.birthday.clone(),
                    days_until: dates::days_until_birthday(birthday, today),
                    age: dates::calculate_age(birthday, today),
                })
            })
            .filter(|r| r.days_until <= REMINDER_WINDOW_DAYS)
            .collect();

        // sort_by_key is stable, so equal countdowns keep roster order
        reminders.sort_by_key(|r| r.days_until);

        info!("Built {} reminders", reminders.len());

        Ok(reminders)
    }
}
