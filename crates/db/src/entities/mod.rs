//! `SeaORM` entity definitions for the finance schema.

pub mod department_budgets;
pub mod departments;
pub mod expenses;
pub mod fee_structures;
pub mod finance_balance;
pub mod income_sources;
pub mod payroll;
pub mod sea_orm_active_enums;
pub mod student_fee_records;
pub mod students;
pub mod transactions;
pub mod users;
