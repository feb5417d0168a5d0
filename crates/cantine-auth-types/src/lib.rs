//! Session-token types shared between the login flow and every protected
//! endpoint: JWT claims and validation, cookie builders, and the axum
//! extractor that turns the access-token cookie into a request identity.

pub mod cookie;
pub mod identity;
pub mod token;
