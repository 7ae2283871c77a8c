pub mod auth;
pub mod claims;
pub mod items;
