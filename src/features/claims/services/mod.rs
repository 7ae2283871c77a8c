mod claim_service;

pub use claim_service::*;
