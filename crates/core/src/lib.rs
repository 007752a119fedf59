//! Core business logic for Unifin.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, state machines, and guard rules live
//! here; the database layer executes them inside its transactions.
//!
//! # Modules
//!
//! - `ledger` - balance movement rules (credits, debits, sufficiency)
//! - `budget` - department budget allocation and spend guards
//! - `fee` - student fee payment state machine
//! - `expense` - expense approval workflow transition table
//! - `payroll` - payroll settlement guards
//! - `role` - user role hierarchy and parsing
//! - `auth` - password hashing

pub mod auth;
pub mod budget;
pub mod expense;
pub mod fee;
pub mod ledger;
pub mod payroll;
pub mod role;
