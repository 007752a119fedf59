//! Initial database migration.
//!
//! Creates the enums and tables for the finance schema and seeds the
//! central balance singleton row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;

        db.execute_unprepared(DEPARTMENTS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(STUDENTS_SQL).await?;

        db.execute_unprepared(FINANCE_BALANCE_SQL).await?;
        db.execute_unprepared(DEPARTMENT_BUDGETS_SQL).await?;

        db.execute_unprepared(FEE_STRUCTURES_SQL).await?;
        db.execute_unprepared(STUDENT_FEE_RECORDS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        db.execute_unprepared(PAYROLL_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(INCOME_SOURCES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM (
    'admin',
    'finance_manager',
    'department_head',
    'faculty',
    'staff',
    'student'
);

CREATE TYPE fee_status AS ENUM ('unpaid', 'partial', 'paid');

CREATE TYPE transaction_status AS ENUM ('pending', 'success');

CREATE TYPE payroll_status AS ENUM ('unpaid', 'paid');

CREATE TYPE expense_status AS ENUM (
    'pending',
    'dept_approved',
    'approved',
    'rejected'
);
";

const DEPARTMENTS_SQL: &str = r"
CREATE TABLE departments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    head_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    role user_role NOT NULL,
    department_id UUID REFERENCES departments(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
CREATE INDEX idx_users_department ON users(department_id);
CREATE INDEX idx_users_role ON users(role);

ALTER TABLE departments
    ADD CONSTRAINT fk_departments_head
    FOREIGN KEY (head_id) REFERENCES users(id);
";

const STUDENTS_SQL: &str = r"
CREATE TABLE students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    enrollment_no VARCHAR(50) NOT NULL UNIQUE,
    batch VARCHAR(20) NOT NULL,
    program VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_students_batch ON students(batch);
";

const FINANCE_BALANCE_SQL: &str = r"
CREATE TABLE finance_balance (
    id SMALLINT PRIMARY KEY,
    total_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_balance_singleton CHECK (id = 1),
    CONSTRAINT chk_balance_non_negative CHECK (total_amount >= 0)
);

INSERT INTO finance_balance (id, total_amount) VALUES (1, 0);
";

const DEPARTMENT_BUDGETS_SQL: &str = r"
CREATE TABLE department_budgets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    department_id UUID NOT NULL REFERENCES departments(id),
    fiscal_year INTEGER NOT NULL,
    allocated NUMERIC(19, 4) NOT NULL DEFAULT 0,
    spent NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_budget_dept_year UNIQUE (department_id, fiscal_year),
    CONSTRAINT chk_budget_non_negative CHECK (allocated >= 0 AND spent >= 0),
    CONSTRAINT chk_budget_spent_within CHECK (spent <= allocated)
);
";

const FEE_STRUCTURES_SQL: &str = r"
CREATE TABLE fee_structures (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    description TEXT,
    amount NUMERIC(19, 4) NOT NULL,
    due_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_fee_amount_positive CHECK (amount > 0)
);
";

const STUDENT_FEE_RECORDS_SQL: &str = r"
CREATE TABLE student_fee_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id),
    fee_structure_id UUID NOT NULL REFERENCES fee_structures(id) ON DELETE RESTRICT,
    status fee_status NOT NULL DEFAULT 'unpaid',
    amount_paid NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_fee_record_student_structure UNIQUE (student_id, fee_structure_id),
    CONSTRAINT chk_fee_paid_non_negative CHECK (amount_paid >= 0)
);

CREATE INDEX idx_fee_records_student ON student_fee_records(student_id);
CREATE INDEX idx_fee_records_status ON student_fee_records(status);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_fee_record_id UUID NOT NULL REFERENCES student_fee_records(id),
    amount NUMERIC(19, 4) NOT NULL,
    method VARCHAR(50) NOT NULL,
    remarks TEXT,
    payment_reference VARCHAR(255),
    status transaction_status NOT NULL DEFAULT 'success',
    recorded_by UUID REFERENCES users(id),
    initiated_by UUID REFERENCES users(id),
    approved_by UUID REFERENCES users(id),
    approved_at TIMESTAMPTZ,
    payment_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_transaction_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_transactions_record ON transactions(student_fee_record_id);
CREATE INDEX idx_transactions_status ON transactions(status);
";

const PAYROLL_SQL: &str = r"
CREATE TABLE payroll (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    staff_id UUID NOT NULL REFERENCES users(id),
    role user_role NOT NULL,
    month DATE NOT NULL,
    amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    status payroll_status NOT NULL DEFAULT 'unpaid',
    paid_on DATE,
    processed_by UUID REFERENCES users(id),
    paid_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_payroll_staff_month UNIQUE (staff_id, month),
    CONSTRAINT chk_payroll_amount_non_negative CHECK (amount >= 0)
);

CREATE INDEX idx_payroll_month ON payroll(month);
CREATE INDEX idx_payroll_status ON payroll(status);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    department_id UUID NOT NULL REFERENCES departments(id),
    amount NUMERIC(19, 4) NOT NULL,
    description TEXT NOT NULL,
    submitted_by UUID NOT NULL REFERENCES users(id),
    status expense_status NOT NULL DEFAULT 'pending',
    submitted_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    dept_approved_by UUID REFERENCES users(id),
    dept_approved_at TIMESTAMPTZ,
    finance_approved_by UUID REFERENCES users(id),
    finance_approved_at TIMESTAMPTZ,
    rejected_by UUID REFERENCES users(id),
    rejected_at TIMESTAMPTZ,
    rejection_reason TEXT,

    CONSTRAINT chk_expense_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_expenses_department ON expenses(department_id);
CREATE INDEX idx_expenses_status ON expenses(status);
CREATE INDEX idx_expenses_submitter ON expenses(submitted_by);
";

const INCOME_SOURCES_SQL: &str = r"
CREATE TABLE income_sources (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    source_name VARCHAR(255) NOT NULL,
    description TEXT,
    amount NUMERIC(19, 4) NOT NULL,
    received_date DATE NOT NULL,
    recorded_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_income_amount_positive CHECK (amount > 0)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS income_sources;
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS payroll;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS student_fee_records;
DROP TABLE IF EXISTS fee_structures;
DROP TABLE IF EXISTS department_budgets;
DROP TABLE IF EXISTS finance_balance;
DROP TABLE IF EXISTS students;
ALTER TABLE departments DROP CONSTRAINT IF EXISTS fk_departments_head;
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS departments;

DROP TYPE IF EXISTS expense_status;
DROP TYPE IF EXISTS payroll_status;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS fee_status;
DROP TYPE IF EXISTS user_role;
";
