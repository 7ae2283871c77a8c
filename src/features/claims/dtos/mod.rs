mod claim_dto;

pub use claim_dto::*;
