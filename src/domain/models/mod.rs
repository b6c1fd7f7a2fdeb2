pub mod auth;
pub mod category;
pub mod chat;
pub mod favorite;
pub mod inquiry;
pub mod lead;
pub mod notification;
pub mod property;
pub mod role;
pub mod saved_search;
pub mod settings;
pub mod testimonial;
pub mod tour;
pub mod user;
