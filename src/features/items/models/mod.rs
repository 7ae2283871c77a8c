mod item;

pub use item::{Item, ItemStatus, ItemType};
