use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    #[serde(default)]
    pub reported_user_id: Option<Uuid>,
    #[serde(default)]
    pub product_id: Option<Uuid>,
    pub reason: ReportReason,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ReportStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Spam,
    Fraud,
    Inappropriate,
    DamagedItem,
    NoShow,
    Other,
}

impl ReportReason {
    pub fn label(&self) -> &'static str {
        match self {
            ReportReason::Spam => "Spam",
            ReportReason::Fraud => "Fraud or scam",
            ReportReason::Inappropriate => "Inappropriate content",
            ReportReason::DamagedItem => "Damaged item",
            ReportReason::NoShow => "No-show",
            ReportReason::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewing,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewing => "reviewing",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ReportStatus::Pending | ReportStatus::Reviewing)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReport {
    pub reporter_id: Uuid,
    pub reported_user_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub reason: ReportReason,
    pub description: Option<String>,
    pub status: ReportStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_report() {
        let json = r#"{
            "id": "5f0c6a4e-8a7b-4c7f-9d43-0f7e1b2c3d4e",
            "reporter_id": "0b8e1d2c-1111-4a2b-8c3d-1234567890ab",
            "reported_user_id": null,
            "product_id": "9a1b2c3d-2222-4e5f-8a7b-abcdefabcdef",
            "reason": "damaged_item",
            "description": "Lens came back with a scratched front element",
            "status": "reviewing",
            "created_at": "2025-06-20T10:00:00Z",
            "updated_at": "2025-06-20T10:00:00Z"
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.reason, ReportReason::DamagedItem);
        assert_eq!(report.reason.label(), "Damaged item");
        assert!(report.status.is_open());
        assert!(report.admin_notes.is_none());
    }

    #[test]
    fn test_closed_statuses() {
        assert!(!ReportStatus::Resolved.is_open());
        assert!(!ReportStatus::Dismissed.is_open());
        assert_eq!(ReportStatus::Dismissed.as_str(), "dismissed");
    }
}
