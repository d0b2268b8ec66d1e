//! Company asset model and DTOs.

use hrms_core::asset::{validate_category, validate_status, STATUS_AVAILABLE};
use hrms_core::pagination::PageRequest;
use hrms_core::stats::StatusCounts;
use hrms_core::types::{nullable, Date, DbId, Timestamp};
use hrms_core::validation::validate_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::common::EmployeeSummary;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub name: String,
    pub serial_number: String,
    pub category: String,
    pub status: String,
    pub purchase_date: Option<Date>,
    pub purchase_cost: Option<Decimal>,
    pub assigned_to: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    pub assigned_employee: Option<EmployeeSummary>,
}

/// DTO for creating an asset. `status` defaults to `available` and is
/// reconciled with the assignment before the write.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(required, length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub serial_number: Option<String>,
    #[validate(required, custom(function = "validate_category"))]
    pub category: Option<String>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    pub purchase_date: Option<Date>,
    #[validate(custom(function = "validate_money"))]
    pub purchase_cost: Option<Decimal>,
    pub assigned_to: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CreateAsset {
    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or(STATUS_AVAILABLE)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub purchase_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "nullable")]
    pub purchase_cost: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_to: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_at: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl UpdateAsset {
    /// Merge onto the stored row. Handing the asset to a different employee
    /// without an explicit `assigned_at` drops the old timestamp so a fresh
    /// one is filled in.
    pub fn apply_to(self, current: &Asset) -> CreateAsset {
        let assigned_to = self.assigned_to.unwrap_or(current.assigned_to);
        let assigned_at = match self.assigned_at {
            Some(explicit) => explicit,
            None if assigned_to == current.assigned_to => current.assigned_at,
            None => None,
        };
        CreateAsset {
            name: Some(self.name.unwrap_or_else(|| current.name.clone())),
            serial_number: Some(
                self.serial_number
                    .unwrap_or_else(|| current.serial_number.clone()),
            ),
            category: Some(self.category.unwrap_or_else(|| current.category.clone())),
            status: Some(self.status.unwrap_or_else(|| current.status.clone())),
            purchase_date: self.purchase_date.unwrap_or(current.purchase_date),
            purchase_cost: self.purchase_cost.unwrap_or(current.purchase_cost),
            assigned_to,
            assigned_at,
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<DbId>,
    /// Matches name or serial number.
    pub search: Option<String>,
}

impl AssetQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetStats {
    pub by_status: StatusCounts,
    pub by_category: StatusCounts,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn assigned() -> Asset {
        Asset {
            id: 1,
            name: "ThinkPad".into(),
            serial_number: "SN-1".into(),
            category: "laptop".into(),
            status: "assigned".into(),
            purchase_date: None,
            purchase_cost: None,
            assigned_to: Some(4),
            assigned_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unrelated_update_keeps_assignment_timestamp() {
        let patch: UpdateAsset = serde_json::from_str(r#"{"name": "X1"}"#).unwrap();
        let merged = patch.apply_to(&assigned());
        assert_eq!(merged.assigned_at, assigned().assigned_at);
    }

    #[test]
    fn reassignment_drops_old_timestamp() {
        let patch: UpdateAsset = serde_json::from_str(r#"{"assigned_to": 9}"#).unwrap();
        let merged = patch.apply_to(&assigned());
        assert_eq!(merged.assigned_to, Some(9));
        assert_eq!(merged.assigned_at, None);
    }

    #[test]
    fn clearing_assignee_clears_timestamp() {
        let patch: UpdateAsset = serde_json::from_str(r#"{"assigned_to": null}"#).unwrap();
        let merged = patch.apply_to(&assigned());
        assert_eq!(merged.assigned_to, None);
        assert_eq!(merged.assigned_at, None);
    }
}
