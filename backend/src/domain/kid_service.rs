use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::dates;
use crate::domain::errors::DomainError;
use crate::storage::DbConnection;
use shared::{CreateKidRequest, Kid, UpdateKidRequest};

/// Service for managing the kid roster.
#[derive(Clone)]
pub struct KidService {
    db: DbConnection,
}

impl KidService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Create a new kid.
    pub async fn create_kid(&self, request: CreateKidRequest) -> Result<Kid, DomainError> {
        info!("Creating kid: name={}, birthday={}", request.name, request.birthday);

        validate_name(&request.name)?;
        validate_birthday(&request.birthday)?;

        let kid = Kid {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            birthday: request.birthday,
            photo: request.photo,
            interests: request.interests,
            created_at: Utc::now().to_rfc3339(),
        };

        self.db.store_kid(&kid).await?;

        info!("Created kid: {} with ID: {}", kid.name, kid.id);

        Ok(kid)
    }

    /// Get a kid by ID.
    pub async fn get_kid(&self, kid_id: &str) -> Result<Option<Kid>, DomainError> {
        let kid = self.db.get_kid(kid_id).await?;

        if kid.is_none() {
            warn!("Kid not found: {}", kid_id);
        }

        Ok(kid)
    }

    /// List all kids in roster (insertion) order.
    pub async fn list_kids(&self) -> Result<Vec<Kid>, DomainError> {
        let kids = self.db.list_kids().await?;

        info!("Found {} kids", kids.len());

        Ok(kids)
    }

    /// Merge the provided fields into an existing kid. Fields left out of
    /// the request keep their stored values. The merge is a single storage
    /// statement, so concurrent updates to the same kid cannot lose each
    /// other's fields.
    pub async fn update_kid(
        &self,
        kid_id: &str,
        request: UpdateKidRequest,
    ) -> Result<Kid, DomainError> {
        info!("Updating kid: {}", kid_id);

        if let Some(ref name) = request.name {
            validate_name(name)?;
        }
        if let Some(ref birthday) = request.birthday {
            validate_birthday(birthday)?;
        }

        let mut request = request;
        if let Some(ref mut name) = request.name {
            *name = name.trim().to_string();
        }

        let kid = self
            .db
            .merge_kid(kid_id, &request)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Kid not found: {}", kid_id)))?;

        info!("Updated kid: {} with ID: {}", kid.name, kid.id);

        Ok(kid)
    }

    /// Delete a kid and every gift recorded for them.
    pub async fn delete_kid(&self, kid_id: &str) -> Result<(), DomainError> {
        info!("Deleting kid: {}", kid_id);

        let deleted = self.db.delete_kid(kid_id).await?;
        if !deleted {
            return Err(DomainError::not_found(format!("Kid not found: {}", kid_id)));
        }

        info!("Deleted kid: {}", kid_id);

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Kid name cannot be empty"));
    }
    if name.len() > 100 {
        return Err(DomainError::validation("Kid name cannot exceed 100 characters"));
    }
    Ok(())
}

fn validate_birthday(birthday: &str) -> Result<(), DomainError> {
    if dates::parse_date(birthday).is_none() {
        return Err(DomainError::validation(
            "Birthday must be a valid date in YYYY-MM-DD format",
        ));
    }
    Ok(())
}
