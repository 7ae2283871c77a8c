//! Ownership claims: submission against approved items, admin review, and
//! the owner notification sent on approval.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/claims` | Submit a claim |
//! | GET | `/api/claims` | List claims (status filter) |
//! | PUT | `/api/claims/{id}/approve` | Admin approves, owner is emailed |
//! | PUT | `/api/claims/{id}/reject` | Admin rejects |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ClaimService;
