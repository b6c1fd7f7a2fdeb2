use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl TourStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourStatus::Scheduled => "scheduled",
            TourStatus::Completed => "completed",
            TourStatus::Cancelled => "cancelled",
        }
    }

    /// Only a scheduled tour can move, and only to a terminal state.
    pub fn can_transition_to(&self, next: TourStatus) -> bool {
        *self == TourStatus::Scheduled && next != TourStatus::Scheduled
    }
}

impl FromStr for TourStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(TourStatus::Scheduled),
            "completed" => Ok(TourStatus::Completed),
            "cancelled" => Ok(TourStatus::Cancelled),
            other => Err(format!("unknown tour status: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Tour {
    pub id: String,
    pub property_id: String,
    pub client_id: String,
    pub agent_id: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewTourParams {
    pub property_id: String,
    pub client_id: String,
    pub agent_id: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: String,
    pub notes: Option<String>,
}

impl Tour {
    pub fn new(params: NewTourParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            property_id: params.property_id,
            client_id: params.client_id,
            agent_id: params.agent_id,
            scheduled_date: params.scheduled_date,
            scheduled_time: params.scheduled_time,
            status: TourStatus::Scheduled.as_str().to_string(),
            notes: params.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn current_status(&self) -> TourStatus {
        self.status.parse().unwrap_or(TourStatus::Scheduled)
    }

    pub fn transition(&mut self, next: TourStatus) -> Result<(), String> {
        if !self.current_status().can_transition_to(next) {
            return Err(format!("Cannot move a {} tour to {}", self.status, next.as_str()));
        }
        self.status = next.as_str().to_string();
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct TourDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub tour: Tour,
    pub property_title: Option<String>,
    pub property_address: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub agent_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour() -> Tour {
        Tour::new(NewTourParams {
            property_id: "p1".into(),
            client_id: "c1".into(),
            agent_id: "a1".into(),
            scheduled_date: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
            scheduled_time: "10:00".into(),
            notes: None,
        })
    }

    #[test]
    fn test_scheduled_moves_to_terminal_states() {
        let mut t = tour();
        assert_eq!(t.status, "scheduled");
        t.transition(TourStatus::Completed).unwrap();
        assert_eq!(t.status, "completed");
        assert!(t.transition(TourStatus::Cancelled).is_err());
    }

    #[test]
    fn test_scheduled_to_scheduled_rejected() {
        let mut t = tour();
        assert!(t.transition(TourStatus::Scheduled).is_err());
        t.transition(TourStatus::Cancelled).unwrap();
        assert_eq!(t.current_status(), TourStatus::Cancelled);
    }
}
