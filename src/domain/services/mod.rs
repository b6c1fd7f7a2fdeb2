pub mod access;
pub mod auth_service;
pub mod bootstrap;
pub mod chat_responder;
pub mod mortgage;
pub mod notifier;
