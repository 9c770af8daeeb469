//! User accounts.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/auth/register` | Self registration (role `user`) |
//! | GET | `/api/users` | List users |
//! | POST | `/api/users` | Create user (superadmin) |
//! | GET | `/api/users/{id}` | Get user |
//! | PUT | `/api/users/{email}` | Update user (superadmin) |
//! | PUT | `/api/users/{email}/role` | Change role (superadmin) |
//! | DELETE | `/api/users/{email}` | Delete user (superadmin) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
