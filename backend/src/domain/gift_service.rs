use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::storage::DbConnection;
use shared::{CreateGiftRequest, Gift, UpdateGiftRequest};

/// User-entered gift years must fall in this range.
const YEAR_MIN: i32 = 2000;
const YEAR_MAX: i32 = 2200;

/// Service for managing the gift log.
#[derive(Clone)]
pub struct GiftService {
    db: DbConnection,
}

impl GiftService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Record a new gift for an existing kid.
    pub async fn create_gift(&self, request: CreateGiftRequest) -> Result<Gift, DomainError> {
        info!(
            "Creating gift: kid_id={}, name={}, occasion={}, year={}",
            request.kid_id, request.gift_name, request.occasion, request.year
        );

        validate_gift_name(&request.gift_name)?;
        validate_year(request.year)?;

        if self.db.get_kid(&request.kid_id).await?.is_none() {
            return Err(DomainError::validation(format!(
                "Gift references nonexistent kid: {}",
                request.kid_id
            )));
        }

        let gift = Gift {
            id: Uuid::new_v4().to_string(),
            kid_id: request.kid_id,
            gift_name: request.gift_name.trim().to_string(),
            occasion: request.occasion,
            year: request.year,
            date_given: request.date_given,
            photo: request.photo,
            created_at: Utc::now().to_rfc3339(),
        };

        self.db.store_gift(&gift).await?;

        info!("Created gift: {} with ID: {}", gift.gift_name, gift.id);

        Ok(gift)
    }

    /// Get a gift by ID.
    pub async fn get_gift(&self, gift_id: &str) -> Result<Option<Gift>, DomainError> {
        let gift = self.db.get_gift(gift_id).await?;

        if gift.is_none() {
            warn!("Gift not found: {}", gift_id);
        }

        Ok(gift)
    }

    /// List every gift in insertion order.
    pub async fn list_gifts(&self) -> Result<Vec<Gift>, DomainError> {
        let gifts = self.db.list_gifts().await?;

        info!("Found {} gifts", gifts.len());

        Ok(gifts)
    }

    /// List a kid's gifts, newest year first; same-year gifts keep their
    /// insertion order.
    pub async fn list_gifts_for_kid(&self, kid_id: &str) -> Result<Vec<Gift>, DomainError> {
        let gifts = self.db.list_gifts_for_kid(kid_id).await?;

        info!("Found {} gifts for kid {}", gifts.len(), kid_id);

        Ok(gifts)
    }

    /// Merge the provided fields into an existing gift. Fields left out of
    /// the request keep their stored values; `kid_id` cannot change. The
    /// merge is a single storage statement, so concurrent updates to the
    /// same gift cannot lose each other's fields.
    pub async fn update_gift(
        &self,
        gift_id: &str,
        request: UpdateGiftRequest,
    ) -> Result<Gift, DomainError> {
        info!("Updating gift: {}", gift_id);

        if let Some(ref gift_name) = request.gift_name {
            validate_gift_name(gift_name)?;
        }
        if let Some(year) = request.year {
            validate_year(year)?;
        }

        let mut request = request;
        if let Some(ref mut gift_name) = request.gift_name {
            *gift_name = gift_name.trim().to_string();
        }

        let gift = self
            .db
            .merge_gift(gift_id, &request)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Gift not found: {}", gift_id)))?;

        info!("Updated gift: {} with ID: {}", gift.gift_name, gift.id);

        Ok(gift)
    }

    /// Delete a gift. No cascade.
    pub async fn delete_gift(&self, gift_id: &str) -> Result<(), DomainError> {
        info!("Deleting gift: {}", gift_id);

        let deleted = self.db.delete_gift(gift_id).await?;
        if !deleted {
            return Err(DomainError::not_found(format!("Gift not found: {}", gift_id)));
        }

        info!("Deleted gift: {}", gift_id);

        Ok(())
    }
}

fn validate_gift_name(gift_name: &str) -> Result<(), DomainError> {
    if gift_name.trim().is_empty() {
        return Err(DomainError::validation("Gift name cannot be empty"));
    }
    Ok(())
}

fn validate_year(year: i32) -> Result<(), DomainError> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(DomainError::validation(format!(
            "Year must be between {} and {}",
            YEAR_MIN, YEAR_MAX
        )));
    }
    Ok(())
}
