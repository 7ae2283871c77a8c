mod claim_handler;

pub use claim_handler::*;
