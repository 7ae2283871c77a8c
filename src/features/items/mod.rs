//! Item reports: submission with photo, admin approval, owner edits,
//! mark-as-found, and deletion.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/items` | Submit item report (multipart) |
//! | GET | `/api/items` | List items (status/type/owner filters) |
//! | GET | `/api/items/{id}` | Get one item |
//! | PUT | `/api/items/{id}` | Owner partial edit |
//! | DELETE | `/api/items/{id}` | Owner delete |
//! | PUT | `/api/items/{id}/found` | Owner marks approved item found |
//! | POST | `/api/items/{id}/approve` | Admin approves |
//! | POST | `/api/items/{id}/reject` | Admin rejects |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ItemService;
