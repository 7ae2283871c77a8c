mod claim;

pub use claim::*;
