use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::dates;
use crate::domain::errors::DomainError;
use crate::storage::DbConnection;
use shared::{ChecklistEntry, ChecklistResponse, Gift, Occasion, ToggleChristmasResponse};

/// Name given to a Christmas gift created by the toggle before a real one
/// is picked.
const PLACEHOLDER_GIFT_NAME: &str = "To be decided";

/// Builds the per-year Christmas checklist and owns the toggle, the one
/// compound mutation in the system.
#[derive(Clone)]
pub struct ChecklistService {
    db: DbConnection,
}

impl ChecklistService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// One entry per kid in roster order, with the kid's Christmas gift for
    /// the year if one is recorded.
    pub async fn build_checklist(
        &self,
        year: i32,
        today: NaiveDate,
    ) -> Result<ChecklistResponse, DomainError> {
        let kids = self.db.list_kids().await?;

        let mut entries = Vec::with_capacity(kids.len());
        for kid in &kids {
            let age = match dates::parse_date(&kid.birthday) {
                Some(birthday) => dates::calculate_age(birthday, today),
                None => {
                    warn!("Kid {} has unparseable birthday: {}", kid.id, kid.birthday);
                    0
                }
            };
            let gift = self.db.find_christmas_gift(&kid.id, year).await?;
            entries.push(ChecklistEntry {
                kid_id: kid.id.clone(),
                kid_name: kid.name.clone(),
                age,
                has_gift: gift.is_some(),
                gift,
            });
        }

        let completed_count = entries.iter().filter(|e| e.has_gift).count();
        let total_count = entries.len();

        info!("Built {} checklist: {}/{} done", year, completed_count, total_count);

        Ok(ChecklistResponse {
            year,
            entries,
            completed_count,
            total_count,
        })
    }

    /// Toggle the Christmas gift for a kid and year: delete it if present,
    /// otherwise record a placeholder. The read and the write run as one
    /// storage transaction.
    pub async fn toggle_christmas_gift(
        &self,
        kid_id: &str,
        year: i32,
    ) -> Result<ToggleChristmasResponse, DomainError> {
        info!("Toggling christmas gift: kid_id={}, year={}", kid_id, year);

        if self.db.get_kid(kid_id).await?.is_none() {
            return Err(DomainError::not_found(format!("Kid not found: {}", kid_id)));
        }

        let placeholder = Gift {
            id: Uuid::new_v4().to_string(),
            kid_id: kid_id.to_string(),
            gift_name: PLACEHOLDER_GIFT_NAME.to_string(),
            occasion: Occasion::Christmas,
            year,
            date_given: Some(String::new()),
            photo: None,
            created_at: Utc::now().to_rfc3339(),
        };

        let created = self.db.toggle_christmas_gift(kid_id, year, &placeholder).await?;

        Ok(ToggleChristmasResponse {
            has_gift: created.is_some(),
            gift: created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GiftService, KidService};
    use shared::{CreateGiftRequest, CreateKidRequest};

    async fn setup_test() -> (KidService, GiftService, ChecklistService) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        (
            KidService::new(db.clone()),
            GiftService::new(db.clone()),
            ChecklistService::new(db),
        )
    }

    async fn create_kid(kids: &KidService, name: &str, birthday: &str) -> String {
        kids.create_kid(CreateKidRequest {
            name: name.to_string(),
            birthday: birthday.to_string(),
            photo: None,
            interests: None,
        })
        .await
        .expect("Failed to create kid")
        .id
    }

    fn date(s: &str) -> NaiveDate {
        dates::parse_date(s).expect("valid test date")
    }

    #[tokio::test]
    async fn test_checklist_counts_and_roster_order() {
        let (kids, gifts, checklist) = setup_test().await;

        let ava = create_kid(&kids, "Ava", "2016-01-10").await;
        let max = create_kid(&kids, "Max", "2014-05-02").await;

        gifts
            .create_gift(CreateGiftRequest {
                kid_id: max.clone(),
                gift_name: "Sled".to_string(),
                occasion: Occasion::Christmas,
                year: 2024,
                date_given: None,
                photo: None,
            })
            .await
            .expect("Failed to create gift");

        let response = checklist
            .build_checklist(2024, date("2024-12-01"))
            .await
            .expect("Failed to build checklist");

        assert_eq!(response.year, 2024);
        assert_eq!(response.total_count, 2);
        assert_eq!(response.completed_count, 1);
        assert_eq!(response.entries[0].kid_id, ava);
        assert!(!response.entries[0].has_gift);
        assert_eq!(response.entries[1].kid_id, max);
        assert!(response.entries[1].has_gift);
        assert_eq!(
            response.entries[1].gift.as_ref().map(|g| g.gift_name.as_str()),
            Some("Sled")
        );
    }

    #[tokio::test]
    async fn test_checklist_ignores_other_years_and_occasions() {
        let (kids, gifts, checklist) = setup_test().await;

        let ava = create_kid(&kids, "Ava", "2016-01-10").await;

        gifts
            .create_gift(CreateGiftRequest {
                kid_id: ava.clone(),
                gift_name: "Puzzle".to_string(),
                occasion: Occasion::Christmas,
                year: 2023,
                date_given: None,
                photo: None,
            })
            .await
            .expect("Failed to create gift");
        gifts
            .create_gift(CreateGiftRequest {
                kid_id: ava,
                gift_name: "Bicycle".to_string(),
                occasion: Occasion::Birthday,
                year: 2024,
                date_given: None,
                photo: None,
            })
            .await
            .expect("Failed to create gift");

        let response = checklist
            .build_checklist(2024, date("2024-12-01"))
            .await
            .expect("Failed to build checklist");
        assert_eq!(response.completed_count, 0);
    }

    #[tokio::test]
    async fn test_toggle_creates_then_deletes_placeholder() {
        let (kids, gifts, checklist) = setup_test().await;

        let ava = create_kid(&kids, "Ava", "2016-01-10").await;

        let first = checklist
            .toggle_christmas_gift(&ava, 2024)
            .await
            .expect("Failed to toggle");
        assert!(first.has_gift);
        let gift = first.gift.expect("Toggle should create a gift");
        assert_eq!(gift.gift_name, "To be decided");
        assert_eq!(gift.occasion, Occasion::Christmas);
        assert_eq!(gift.date_given.as_deref(), Some(""));

        let second = checklist
            .toggle_christmas_gift(&ava, 2024)
            .await
            .expect("Failed to toggle");
        assert!(!second.has_gift);
        assert!(second.gift.is_none());

        // the second toggle removed the gift entirely
        let remaining = gifts.list_gifts_for_kid(&ava).await.expect("Failed to list gifts");
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_unknown_kid() {
        let (_kids, _gifts, checklist) = setup_test().await;

        let result = checklist.toggle_christmas_gift("missing", 2024).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ava_end_to_end() {
        let (kids, _gifts, checklist) = setup_test().await;

        let ava = create_kid(&kids, "Ava", "2016-01-10").await;

        let before = checklist
            .build_checklist(2024, date("2024-12-01"))
            .await
            .expect("Failed to build checklist");
        assert_eq!(before.total_count, 1);
        assert_eq!(before.completed_count, 0);
        assert_eq!(before.entries[0].kid_name, "Ava");
        assert!(!before.entries[0].has_gift);

        checklist
            .toggle_christmas_gift(&ava, 2024)
            .await
            .expect("Failed to toggle");

        let after = checklist
            .build_checklist(2024, date("2024-12-01"))
            .await
            .expect("Failed to build checklist");
        assert_eq!(after.completed_count, 1);
        assert!(after.entries[0].has_gift);
    }
}
