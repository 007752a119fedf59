//! Password hashing for account authentication.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
