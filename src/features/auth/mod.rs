//! User registration and login.
//!
//! Identity management stops here: the rest of the service receives the
//! acting user's id in each request and re-checks role/ownership against the
//! database before any state transition.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/auth/signup` | Register user |
//! | POST | `/api/auth/login` | Verify credentials |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod services;

pub use services::AuthService;
