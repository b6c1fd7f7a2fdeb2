use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InquiryStatus {
    Pending,
    Replied,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Pending => "pending",
            InquiryStatus::Replied => "replied",
            InquiryStatus::Closed => "closed",
        }
    }

    /// pending -> replied -> closed; a pending inquiry may also be closed directly.
    pub fn can_transition_to(&self, next: InquiryStatus) -> bool {
        matches!(
            (self, next),
            (InquiryStatus::Pending, InquiryStatus::Replied)
                | (InquiryStatus::Pending, InquiryStatus::Closed)
                | (InquiryStatus::Replied, InquiryStatus::Closed)
        )
    }
}

impl FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InquiryStatus::Pending),
            "replied" => Ok(InquiryStatus::Replied),
            "closed" => Ok(InquiryStatus::Closed),
            other => Err(format!("unknown inquiry status: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Inquiry {
    pub id: String,
    pub property_id: String,
    pub client_id: String,
    pub agent_id: String,
    pub message: String,
    pub status: String,
    pub agent_response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn new(property_id: String, client_id: String, agent_id: String, message: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            property_id,
            client_id,
            agent_id,
            message,
            status: InquiryStatus::Pending.as_str().to_string(),
            agent_response: None,
            responded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn current_status(&self) -> InquiryStatus {
        self.status.parse().unwrap_or(InquiryStatus::Pending)
    }

    pub fn reply(&mut self, response: String) -> Result<(), String> {
        if !self.current_status().can_transition_to(InquiryStatus::Replied) {
            return Err(format!("Cannot reply to an inquiry that is {}", self.status));
        }
        let now = Utc::now();
        self.agent_response = Some(response);
        self.responded_at = Some(now);
        self.status = InquiryStatus::Replied.as_str().to_string();
        self.updated_at = now;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), String> {
        if !self.current_status().can_transition_to(InquiryStatus::Closed) {
            return Err(format!("Cannot close an inquiry that is {}", self.status));
        }
        self.status = InquiryStatus::Closed.as_str().to_string();
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Inquiry joined with the property title and both parties.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct InquiryDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub inquiry: Inquiry,
    pub property_title: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub agent_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry() -> Inquiry {
        Inquiry::new("p1".into(), "c1".into(), "a1".into(), "Is it still available?".into())
    }

    #[test]
    fn test_new_inquiry_is_pending() {
        let i = inquiry();
        assert_eq!(i.status, "pending");
        assert!(i.agent_response.is_none());
    }

    #[test]
    fn test_reply_then_close() {
        let mut i = inquiry();
        i.reply("Yes it is".into()).unwrap();
        assert_eq!(i.status, "replied");
        assert!(i.responded_at.is_some());

        assert!(i.reply("Again".into()).is_err());

        i.close().unwrap();
        assert_eq!(i.status, "closed");
        assert!(i.close().is_err());
        assert!(i.reply("Too late".into()).is_err());
    }

    #[test]
    fn test_pending_can_close_directly() {
        let mut i = inquiry();
        i.close().unwrap();
        assert_eq!(i.current_status(), InquiryStatus::Closed);
    }
}
