//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every multi-step monetary mutation runs inside one
//! database transaction.

pub mod balance;
pub mod budget;
pub mod department;
pub mod expense;
pub mod fee;
pub mod income;
pub mod payroll;
pub mod user;

pub use balance::{BalanceError, BalanceRepository};
pub use budget::{
    AllocationOutcome, BudgetError, BudgetRepository, BudgetSummaryRow, BudgetWithDepartment,
};
pub use department::{DepartmentError, DepartmentRepository};
pub use expense::{ExpenseError, ExpenseRepository, ExpenseWithDepartment};
pub use fee::{
    AssignedFeeFilter, AssignedFeeView, BulkAssignOutcome, CreateFeeStructureInput, FeeError,
    FeeRepository, GatewayPaymentOutcome, SettlementOutcome, UpdateFeeStructureInput,
};
pub use income::{IncomeError, IncomeOutcome, IncomeRepository, IncomeWithRecorder, RecordIncomeInput};
pub use payroll::{GenerateOutcome, PayOutcome, PayrollError, PayrollRepository};
pub use user::{CreateUserInput, UserError, UserRepository};
