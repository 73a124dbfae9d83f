pub mod auth;
pub mod dispatcher;
pub mod spotify;
