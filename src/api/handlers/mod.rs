pub mod admin;
pub mod assistant;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod favorite;
pub mod health;
pub mod inquiry;
pub mod lead;
pub mod notification;
pub mod profile;
pub mod property;
pub mod saved_search;
pub mod tour;
