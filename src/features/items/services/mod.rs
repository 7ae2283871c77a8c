mod item_service;

pub use item_service::{ItemFilter, ItemService, NewItem};
