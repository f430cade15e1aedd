//! Business rules in front of the store: required fields, allowed status values,
//! name uniqueness and page normalisation.

use serde::Serialize;

use crate::aggregate::{AlertAggregate, AlertStatus};
use crate::error::AlertError;
use crate::store::AlertStore;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// A 1-based page request after normalisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Pages below 1 become 1; sizes outside `1..=100` become the default of 20.
    pub fn normalize(page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        let page_size = if (1..=MAX_PAGE_SIZE).contains(&page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlertListing {
    pub items: Vec<AlertAggregate>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

pub fn parse_status(status: &str) -> Result<AlertStatus, AlertError> {
    status.parse().map_err(AlertError::Validation)
}

#[derive(Clone, Debug)]
pub struct AlertService {
    store: AlertStore,
}

impl AlertService {
    pub fn new(store: AlertStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    /// The name check here is best effort; the store's unique constraint decides.
    #[tracing::instrument(skip(self, alert), fields(alert_name = %alert.name))]
    pub async fn create(&self, alert: &AlertAggregate) -> Result<AlertAggregate, AlertError> {
        alert.validate()?;
        if self.store.name_owner(&alert.name).await?.is_some() {
            return Err(AlertError::Validation(format!(
                "alert name '{}' already exists",
                alert.name
            )));
        }
        self.store.create(alert).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<AlertAggregate, AlertError> {
        require_id(id)?;
        self.store.get_by_id(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<AlertAggregate, AlertError> {
        require_name(name)?;
        self.store.get_by_name(name).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<AlertAggregate>, AlertError> {
        require_name(name)?;
        self.store.find_by_name(name).await
    }

    #[tracing::instrument(skip(self, alert), fields(alert_name = %alert.name, alert_id = ?alert.id))]
    pub async fn update(&self, alert: &AlertAggregate) -> Result<AlertAggregate, AlertError> {
        let id = alert
            .id
            .ok_or_else(|| AlertError::Validation("id is required for update".into()))?;
        require_id(id)?;
        alert.validate()?;
        let taken = self
            .store
            .name_owner(&alert.name)
            .await?
            .is_some_and(|owner| owner != id);
        if taken {
            return Err(AlertError::Validation(format!(
                "alert name '{}' already exists",
                alert.name
            )));
        }
        self.store.update(alert).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AlertError> {
        require_id(id)?;
        self.store.delete(id).await
    }

    pub async fn list(&self, page: u64, page_size: u64) -> Result<AlertListing, AlertError> {
        let req = PageRequest::normalize(page, page_size);
        let result = self.store.list(req.offset(), req.page_size).await?;
        Ok(AlertListing {
            items: result.items,
            total: result.total,
            page: req.page,
            page_size: req.page_size,
        })
    }

    pub async fn list_by_status(
        &self,
        status: &str,
        page: u64,
        page_size: u64,
    ) -> Result<AlertListing, AlertError> {
        let status = parse_status(status)?;
        let req = PageRequest::normalize(page, page_size);
        let result = self
            .store
            .list_by_status(status, req.offset(), req.page_size)
            .await?;
        Ok(AlertListing {
            items: result.items,
            total: result.total,
            page: req.page,
            page_size: req.page_size,
        })
    }

    pub async fn count(&self) -> Result<u64, AlertError> {
        self.store.count().await
    }
}

fn require_id(id: i32) -> Result<(), AlertError> {
    if id == 0 {
        return Err(AlertError::Validation("invalid alert id 0".into()));
    }
    Ok(())
}

fn require_name(name: &str) -> Result<(), AlertError> {
    if name.trim().is_empty() {
        return Err(AlertError::Validation("name is required".into()));
    }
    Ok(())
}
