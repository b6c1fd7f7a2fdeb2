use std::sync::Arc;
use crate::domain::{
    models::{
        inquiry::Inquiry, lead::Lead, notification::{kind, Notification}, property::Property,
        tour::Tour, user::User,
    },
    ports::NotificationRepository,
};
use tracing::{info, warn};

/// Writes notification rows inline with the request that caused them.
pub struct Notifier {
    repo: Arc<dyn NotificationRepository>,
}

impl Notifier {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    /// Fire-and-forget: a failed write is logged and never fails the caller.
    pub async fn send_quietly(&self, notification: Notification) {
        match self.repo.create(&notification).await {
            Ok(created) => info!("Notification {} ({}) sent to user {}", created.id, created.kind, created.user_id),
            Err(e) => warn!("Failed to notify user {}: {:?}", notification.user_id, e),
        }
    }

    /// Built here but written by the caller together with the approval itself.
    pub fn agent_approved(agent: &User) -> Notification {
        Notification::new(
            &agent.id,
            kind::AGENT_APPROVED,
            "Account approved",
            format!("Welcome aboard, {}! Your agent account has been verified and you can now sign in.", agent.name),
            Some("/dashboard/agent".to_string()),
        )
    }

    pub async fn agent_rejected(&self, agent: &User, reason: Option<&str>) {
        let message = match reason {
            Some(r) if !r.trim().is_empty() => format!("Your agent application was not approved: {}", r.trim()),
            _ => "Your agent application was not approved.".to_string(),
        };
        self.send_quietly(Notification::new(&agent.id, kind::AGENT_REJECTED, "Application rejected", message, None)).await;
    }

    pub async fn inquiry_received(&self, inquiry: &Inquiry, property: &Property, client_name: &str) {
        self.send_quietly(Notification::new(
            &inquiry.agent_id,
            kind::INQUIRY_RECEIVED,
            "New inquiry",
            format!("{} asked about \"{}\".", client_name, property.title),
            Some("/dashboard/agent/inquiries".to_string()),
        )).await;
    }

    pub async fn inquiry_replied(&self, inquiry: &Inquiry, property_title: &str) {
        self.send_quietly(Notification::new(
            &inquiry.client_id,
            kind::INQUIRY_REPLIED,
            "Your inquiry was answered",
            format!("The agent replied to your inquiry about \"{}\".", property_title),
            Some("/dashboard/client/inquiries".to_string()),
        )).await;
    }

    pub async fn tour_booked(&self, tour: &Tour, property: &Property, client_name: &str) {
        self.send_quietly(Notification::new(
            &tour.agent_id,
            kind::TOUR_BOOKED,
            "New tour request",
            format!("{} booked a tour of \"{}\" on {} at {}.", client_name, property.title, tour.scheduled_date, tour.scheduled_time),
            Some("/dashboard/agent/tours".to_string()),
        )).await;
    }

    pub async fn tour_updated(&self, tour: &Tour) {
        self.send_quietly(Notification::new(
            &tour.client_id,
            kind::TOUR_UPDATED,
            "Tour updated",
            format!("Your tour on {} at {} is now {}.", tour.scheduled_date, tour.scheduled_time, tour.status),
            Some("/dashboard/client/tours".to_string()),
        )).await;
    }

    pub async fn tour_cancelled_by_client(&self, tour: &Tour) {
        self.send_quietly(Notification::new(
            &tour.agent_id,
            kind::TOUR_CANCELLED,
            "Tour cancelled",
            format!("The tour on {} at {} was cancelled by the client.", tour.scheduled_date, tour.scheduled_time),
            Some("/dashboard/agent/tours".to_string()),
        )).await;
    }

    pub async fn lead_assigned(&self, lead: &Lead, agent_id: &str) {
        self.send_quietly(Notification::new(
            agent_id,
            kind::LEAD_ASSIGNED,
            "New lead assigned",
            format!("{} ({}) has been assigned to you.", lead.name, lead.email),
            Some("/dashboard/agent/leads".to_string()),
        )).await;
    }
}
