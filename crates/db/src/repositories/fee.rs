//! Fee repository for fee structures, assignments and collections.
//!
//! Every operation that moves money (recording a payment, approving a
//! gateway transaction) runs inside one database transaction together
//! with the fee record update and the central balance credit.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use unifin_core::fee::{FeeError as FeeRule, FeeService, FeeStatus};
use unifin_shared::types::{PageRequest, PageResponse};

use crate::entities::{
    fee_structures,
    sea_orm_active_enums::{FeeStatus as DbFeeStatus, TransactionStatus},
    student_fee_records, students, transactions, users,
};
use crate::repositories::balance::{BalanceError, BalanceRepository};

/// Error types for fee operations.
#[derive(Debug, thiserror::Error)]
pub enum FeeError {
    /// Fee structure not found.
    #[error("Fee structure not found: {0}")]
    StructureNotFound(Uuid),

    /// Fee structure still referenced by assigned records.
    #[error("Fee structure {0} has assigned records and cannot be deleted")]
    StructureInUse(Uuid),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Fee record not found.
    #[error("Fee record not found: {0}")]
    RecordNotFound(Uuid),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// The fee is already assigned to the student.
    #[error("Fee structure {fee_structure_id} is already assigned to student {student_id}")]
    DuplicateAssignment {
        /// The student.
        student_id: Uuid,
        /// The fee structure.
        fee_structure_id: Uuid,
    },

    /// No students matched the bulk assignment filter.
    #[error("No students matched the assignment filter")]
    NoStudentsMatched,

    /// The record has payments and cannot be revoked.
    #[error("Fee record {0} has payments and cannot be revoked")]
    RecordNotRevocable(Uuid),

    /// The record belongs to a different student than the payer.
    #[error("Fee record {0} does not belong to the paying student")]
    RecordNotOwned(Uuid),

    /// The transaction is not pending and cannot be approved again.
    #[error("Transaction {0} is not pending")]
    TransactionNotPending(Uuid),

    /// Amount failed a payment rule check.
    #[error(transparent)]
    Rule(#[from] FeeRule),

    /// The central balance movement failed.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a fee structure.
#[derive(Debug, Clone)]
pub struct CreateFeeStructureInput {
    /// Structure name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Amount owed per assigned student.
    pub amount: Decimal,
    /// Due date.
    pub due_date: chrono::NaiveDate,
}

/// Input for updating a fee structure.
#[derive(Debug, Clone, Default)]
pub struct UpdateFeeStructureInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New due date.
    pub due_date: Option<chrono::NaiveDate>,
}

/// Filter for listing assigned fee records.
#[derive(Debug, Clone, Default)]
pub struct AssignedFeeFilter {
    /// Restrict to one student.
    pub student_id: Option<Uuid>,
    /// Restrict to students of one department.
    pub department_id: Option<Uuid>,
    /// Restrict to one batch.
    pub batch: Option<String>,
    /// Restrict to one fee structure.
    pub fee_structure_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<DbFeeStatus>,
}

/// An assigned fee record joined with its student and structure.
#[derive(Debug, Clone)]
pub struct AssignedFeeView {
    /// The fee record.
    pub record: student_fee_records::Model,
    /// Student name.
    pub student_name: String,
    /// Enrollment number.
    pub enrollment_no: String,
    /// Fee structure name.
    pub structure_name: String,
    /// Amount owed under the structure.
    pub structure_amount: Decimal,
}

/// Outcome of a best-effort bulk assignment.
#[derive(Debug, Clone)]
pub struct BulkAssignOutcome {
    /// Records created.
    pub assigned: Vec<student_fee_records::Model>,
    /// Students skipped, with the reason.
    pub failed: Vec<(Uuid, String)>,
}

/// Outcome of an operation that settled money into the balance.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// The transaction row.
    pub transaction: transactions::Model,
    /// The fee record after the payment.
    pub record: student_fee_records::Model,
    /// Central balance after the credit.
    pub new_balance: Decimal,
}

/// Outcome of initiating a gateway payment (no balance movement yet).
#[derive(Debug, Clone)]
pub struct GatewayPaymentOutcome {
    /// The pending transaction row.
    pub transaction: transactions::Model,
    /// The fee record after the provisional payment.
    pub record: student_fee_records::Model,
}

const fn status_to_db(status: FeeStatus) -> DbFeeStatus {
    match status {
        FeeStatus::Unpaid => DbFeeStatus::Unpaid,
        FeeStatus::Partial => DbFeeStatus::Partial,
        FeeStatus::Paid => DbFeeStatus::Paid,
    }
}

const fn status_to_core(status: &DbFeeStatus) -> FeeStatus {
    match status {
        DbFeeStatus::Unpaid => FeeStatus::Unpaid,
        DbFeeStatus::Partial => FeeStatus::Partial,
        DbFeeStatus::Paid => FeeStatus::Paid,
    }
}

/// Fee repository.
#[derive(Debug, Clone)]
pub struct FeeRepository {
    db: DatabaseConnection,
}

impl FeeRepository {
    /// Creates a new fee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Fee structure CRUD
    // ========================================================================

    /// Creates a fee structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not strictly positive or the
    /// insert fails.
    pub async fn create_structure(
        &self,
        input: CreateFeeStructureInput,
    ) -> Result<fee_structures::Model, FeeError> {
        if input.amount <= Decimal::ZERO {
            return Err(FeeRule::NonPositiveAmount(input.amount).into());
        }

        let structure = fee_structures::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            amount: Set(input.amount),
            due_date: Set(input.due_date),
            created_at: Set(Utc::now().into()),
        };

        Ok(structure.insert(&self.db).await?)
    }

    /// Lists fee structures, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_structures(&self) -> Result<Vec<fee_structures::Model>, FeeError> {
        Ok(fee_structures::Entity::find()
            .order_by_desc(fee_structures::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Updates a fee structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure is not found or the new
    /// amount is not strictly positive.
    pub async fn update_structure(
        &self,
        structure_id: Uuid,
        input: UpdateFeeStructureInput,
    ) -> Result<fee_structures::Model, FeeError> {
        let structure = fee_structures::Entity::find_by_id(structure_id)
            .one(&self.db)
            .await?
            .ok_or(FeeError::StructureNotFound(structure_id))?;

        if let Some(amount) = input.amount
            && amount <= Decimal::ZERO
        {
            return Err(FeeRule::NonPositiveAmount(amount).into());
        }

        let mut active: fee_structures::ActiveModel = structure.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(due_date) = input.due_date {
            active.due_date = Set(due_date);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a fee structure.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::StructureInUse` while any fee record still
    /// references the structure.
    pub async fn delete_structure(&self, structure_id: Uuid) -> Result<(), FeeError> {
        let structure = fee_structures::Entity::find_by_id(structure_id)
            .one(&self.db)
            .await?
            .ok_or(FeeError::StructureNotFound(structure_id))?;

        let referencing = student_fee_records::Entity::find()
            .filter(student_fee_records::Column::FeeStructureId.eq(structure_id))
            .count(&self.db)
            .await?;
        if referencing > 0 {
            return Err(FeeError::StructureInUse(structure_id));
        }

        structure.delete(&self.db).await?;
        Ok(())
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    /// Assigns a fee structure to one student.
    ///
    /// # Errors
    ///
    /// Returns an error if the student or structure does not exist, or
    /// the pair is already assigned.
    pub async fn assign_single(
        &self,
        student_id: Uuid,
        fee_structure_id: Uuid,
    ) -> Result<student_fee_records::Model, FeeError> {
        let _structure = fee_structures::Entity::find_by_id(fee_structure_id)
            .one(&self.db)
            .await?
            .ok_or(FeeError::StructureNotFound(fee_structure_id))?;
        let _student = students::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(FeeError::StudentNotFound(student_id))?;

        Self::insert_record(&self.db, student_id, fee_structure_id).await
    }

    /// Assigns a fee structure to every student matching a department
    /// and/or batch filter, best effort.
    ///
    /// Students that already carry the fee are reported in `failed`
    /// instead of aborting the whole batch.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::NoStudentsMatched` when the filter selects
    /// nobody, or an error if the structure does not exist.
    pub async fn assign_bulk(
        &self,
        department_id: Option<Uuid>,
        batch: Option<String>,
        fee_structure_id: Uuid,
    ) -> Result<BulkAssignOutcome, FeeError> {
        let _structure = fee_structures::Entity::find_by_id(fee_structure_id)
            .one(&self.db)
            .await?
            .ok_or(FeeError::StructureNotFound(fee_structure_id))?;

        let mut query = students::Entity::find().find_also_related(users::Entity);
        if let Some(department_id) = department_id {
            query = query.filter(users::Column::DepartmentId.eq(department_id));
        }
        if let Some(batch) = batch {
            query = query.filter(students::Column::Batch.eq(batch));
        }

        let matched: Vec<Uuid> = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(student, _)| student.id)
            .collect();

        if matched.is_empty() {
            return Err(FeeError::NoStudentsMatched);
        }

        self.assign_each(matched, fee_structure_id).await
    }

    /// Assigns a fee structure to an explicit list of students, best
    /// effort.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::NoStudentsMatched` for an empty list, or an
    /// error if the structure does not exist.
    pub async fn assign_list(
        &self,
        student_ids: Vec<Uuid>,
        fee_structure_id: Uuid,
    ) -> Result<BulkAssignOutcome, FeeError> {
        let _structure = fee_structures::Entity::find_by_id(fee_structure_id)
            .one(&self.db)
            .await?
            .ok_or(FeeError::StructureNotFound(fee_structure_id))?;

        if student_ids.is_empty() {
            return Err(FeeError::NoStudentsMatched);
        }

        self.assign_each(student_ids, fee_structure_id).await
    }

    async fn assign_each(
        &self,
        student_ids: Vec<Uuid>,
        fee_structure_id: Uuid,
    ) -> Result<BulkAssignOutcome, FeeError> {
        let mut assigned = Vec::new();
        let mut failed = Vec::new();

        for student_id in student_ids {
            match Self::insert_record(&self.db, student_id, fee_structure_id).await {
                Ok(record) => assigned.push(record),
                Err(FeeError::DuplicateAssignment { .. }) => {
                    failed.push((student_id, "already assigned".to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(BulkAssignOutcome { assigned, failed })
    }

    async fn insert_record<C: ConnectionTrait>(
        conn: &C,
        student_id: Uuid,
        fee_structure_id: Uuid,
    ) -> Result<student_fee_records::Model, FeeError> {
        let existing = student_fee_records::Entity::find()
            .filter(student_fee_records::Column::StudentId.eq(student_id))
            .filter(student_fee_records::Column::FeeStructureId.eq(fee_structure_id))
            .one(conn)
            .await?;
        if existing.is_some() {
            return Err(FeeError::DuplicateAssignment {
                student_id,
                fee_structure_id,
            });
        }

        let now = Utc::now().into();
        let record = student_fee_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            fee_structure_id: Set(fee_structure_id),
            status: Set(DbFeeStatus::Unpaid),
            amount_paid: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(record.insert(conn).await?)
    }

    /// Revokes an assigned fee record.
    ///
    /// Only an untouched record can be revoked: still `unpaid`, no
    /// amount collected, no transactions referencing it.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::RecordNotRevocable` once any payment exists.
    pub async fn revoke(&self, record_id: Uuid) -> Result<(), FeeError> {
        let record = student_fee_records::Entity::find_by_id(record_id)
            .one(&self.db)
            .await?
            .ok_or(FeeError::RecordNotFound(record_id))?;

        let has_transactions = transactions::Entity::find()
            .filter(transactions::Column::StudentFeeRecordId.eq(record_id))
            .count(&self.db)
            .await?
            > 0;

        if record.status != DbFeeStatus::Unpaid
            || record.amount_paid > Decimal::ZERO
            || has_transactions
        {
            return Err(FeeError::RecordNotRevocable(record_id));
        }

        record.delete(&self.db).await?;
        Ok(())
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// Lists assigned fee records matching a filter, joined with
    /// student and structure details.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_assigned(
        &self,
        filter: AssignedFeeFilter,
    ) -> Result<Vec<AssignedFeeView>, FeeError> {
        let mut query = student_fee_records::Entity::find()
            .order_by_desc(student_fee_records::Column::CreatedAt);
        if let Some(student_id) = filter.student_id {
            query = query.filter(student_fee_records::Column::StudentId.eq(student_id));
        }
        if let Some(fee_structure_id) = filter.fee_structure_id {
            query = query.filter(student_fee_records::Column::FeeStructureId.eq(fee_structure_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(student_fee_records::Column::Status.eq(status));
        }

        let records = query.all(&self.db).await?;

        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let Some(student) = students::Entity::find_by_id(record.student_id)
                .one(&self.db)
                .await?
            else {
                continue;
            };

            let user = users::Entity::find_by_id(student.user_id).one(&self.db).await?;

            if let Some(department_id) = filter.department_id
                && user.as_ref().and_then(|u| u.department_id) != Some(department_id)
            {
                continue;
            }
            if let Some(batch) = &filter.batch
                && &student.batch != batch
            {
                continue;
            }

            let structure = fee_structures::Entity::find_by_id(record.fee_structure_id)
                .one(&self.db)
                .await?
                .ok_or(FeeError::StructureNotFound(record.fee_structure_id))?;

            views.push(AssignedFeeView {
                record,
                student_name: user.map(|u| u.full_name).unwrap_or_default(),
                enrollment_no: student.enrollment_no,
                structure_name: structure.name,
                structure_amount: structure.amount,
            });
        }

        Ok(views)
    }

    /// Lists one student's fee records with structure details.
    ///
    /// # Errors
    ///
    /// Returns an error if the student does not exist.
    pub async fn student_fees(&self, student_id: Uuid) -> Result<Vec<AssignedFeeView>, FeeError> {
        let _student = students::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(FeeError::StudentNotFound(student_id))?;

        self.list_assigned(AssignedFeeFilter {
            student_id: Some(student_id),
            ..Default::default()
        })
        .await
    }

    // ========================================================================
    // Collection
    // ========================================================================

    /// Records an immediately settled payment against a fee record.
    ///
    /// Runs in one database transaction: inserts a `success`
    /// transaction row, advances the record's paid total and status,
    /// and credits the central balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the record or its structure does not exist,
    /// the amount is not strictly positive, or a database operation
    /// fails (full rollback).
    pub async fn record_transaction(
        &self,
        record_id: Uuid,
        amount: Decimal,
        method: String,
        remarks: Option<String>,
        recorded_by: Uuid,
    ) -> Result<SettlementOutcome, FeeError> {
        let txn = self.db.begin().await?;

        // Row lock so a concurrent payment cannot read the same
        // amount_paid and lose an update.
        let record = student_fee_records::Entity::find_by_id(record_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(FeeError::RecordNotFound(record_id))?;
        let structure = fee_structures::Entity::find_by_id(record.fee_structure_id)
            .one(&txn)
            .await?
            .ok_or(FeeError::StructureNotFound(record.fee_structure_id))?;

        let outcome = FeeService::apply_payment(record.amount_paid, amount, structure.amount)?;

        let now = Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_fee_record_id: Set(record_id),
            amount: Set(amount),
            method: Set(method),
            remarks: Set(remarks),
            payment_reference: Set(None),
            status: Set(TransactionStatus::Success),
            recorded_by: Set(Some(recorded_by)),
            initiated_by: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            payment_date: Set(now),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut active: student_fee_records::ActiveModel = record.into();
        active.amount_paid = Set(outcome.amount_paid);
        active.status = Set(status_to_db(outcome.status));
        active.updated_at = Set(now);
        let record = active.update(&txn).await?;

        let new_balance = BalanceRepository::credit(&txn, amount).await?;

        txn.commit().await?;

        info!(
            record_id = %record.id,
            %amount,
            status = %outcome.status,
            %new_balance,
            "recorded fee payment"
        );

        Ok(SettlementOutcome {
            transaction,
            record,
            new_balance,
        })
    }

    /// Initiates a gateway payment against a fee record.
    ///
    /// Inserts a `pending` transaction and advances the paid total,
    /// but freezes the record at `partial` and leaves the central
    /// balance untouched: settlement is finalized by
    /// [`Self::approve_transaction`].
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist, the record is
    /// assigned to a different student than `payer_student_id`, the
    /// amount is not strictly positive, or a database operation fails.
    pub async fn initiate_gateway_payment(
        &self,
        record_id: Uuid,
        payer_student_id: Uuid,
        amount: Decimal,
        payment_reference: String,
        initiated_by: Uuid,
    ) -> Result<GatewayPaymentOutcome, FeeError> {
        let txn = self.db.begin().await?;

        let record = student_fee_records::Entity::find_by_id(record_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(FeeError::RecordNotFound(record_id))?;

        if record.student_id != payer_student_id {
            return Err(FeeError::RecordNotOwned(record_id));
        }

        let outcome = FeeService::apply_provisional_payment(record.amount_paid, amount)?;

        let now = Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_fee_record_id: Set(record_id),
            amount: Set(amount),
            method: Set("gateway".to_string()),
            remarks: Set(None),
            payment_reference: Set(Some(payment_reference)),
            status: Set(TransactionStatus::Pending),
            recorded_by: Set(None),
            initiated_by: Set(Some(initiated_by)),
            approved_by: Set(None),
            approved_at: Set(None),
            payment_date: Set(now),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut active: student_fee_records::ActiveModel = record.into();
        active.amount_paid = Set(outcome.amount_paid);
        active.status = Set(status_to_db(outcome.status));
        active.updated_at = Set(now);
        let record = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            record_id = %record.id,
            %amount,
            transaction_id = %transaction.id,
            "initiated gateway payment"
        );

        Ok(GatewayPaymentOutcome {
            transaction,
            record,
        })
    }

    /// Approves a pending gateway transaction, settling it.
    ///
    /// Runs in one database transaction: flips the transaction to
    /// `success` with the approver stamped, promotes the fee record to
    /// `paid` when its collected total covers the structure amount,
    /// and credits the central balance.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::TransactionNotPending` when the transaction
    /// was already settled, or an error if any row is missing or a
    /// database operation fails (full rollback).
    pub async fn approve_transaction(
        &self,
        transaction_id: Uuid,
        approver_id: Uuid,
    ) -> Result<SettlementOutcome, FeeError> {
        let txn = self.db.begin().await?;

        // The pending guard must read a locked row: without the lock
        // two concurrent approvals both see `pending` and the balance
        // is credited twice.
        let transaction = transactions::Entity::find_by_id(transaction_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(FeeError::TransactionNotFound(transaction_id))?;

        if transaction.status != TransactionStatus::Pending {
            return Err(FeeError::TransactionNotPending(transaction_id));
        }

        let record = student_fee_records::Entity::find_by_id(transaction.student_fee_record_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(FeeError::RecordNotFound(transaction.student_fee_record_id))?;
        let structure = fee_structures::Entity::find_by_id(record.fee_structure_id)
            .one(&txn)
            .await?
            .ok_or(FeeError::StructureNotFound(record.fee_structure_id))?;

        let amount = transaction.amount;
        let now = Utc::now().into();

        let mut tx_active: transactions::ActiveModel = transaction.into();
        tx_active.status = Set(TransactionStatus::Success);
        tx_active.approved_by = Set(Some(approver_id));
        tx_active.approved_at = Set(Some(now));
        let transaction = tx_active.update(&txn).await?;

        let settled = FeeService::settled_status(
            status_to_core(&record.status),
            record.amount_paid,
            structure.amount,
        );

        let mut active: student_fee_records::ActiveModel = record.into();
        active.status = Set(status_to_db(settled));
        active.updated_at = Set(now);
        let record = active.update(&txn).await?;

        let new_balance = BalanceRepository::credit(&txn, amount).await?;

        txn.commit().await?;

        info!(
            transaction_id = %transaction.id,
            record_id = %record.id,
            %amount,
            status = %settled,
            %new_balance,
            "approved gateway transaction"
        );

        Ok(SettlementOutcome {
            transaction,
            record,
            new_balance,
        })
    }

    /// Lists transactions newest first, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<transactions::Model>, FeeError> {
        let paginator = transactions::Entity::find()
            .order_by_desc(transactions::Column::CreatedAt)
            .paginate(&self.db, page.limit().max(1));

        let total = paginator.num_items().await?;
        let data = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Lists one student's transactions across all their fee records.
    ///
    /// # Errors
    ///
    /// Returns an error if the student does not exist.
    pub async fn student_transactions(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<transactions::Model>, FeeError> {
        let _student = students::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(FeeError::StudentNotFound(student_id))?;

        let record_ids: Vec<Uuid> = student_fee_records::Entity::find()
            .filter(student_fee_records::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        if record_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(transactions::Entity::find()
            .filter(transactions::Column::StudentFeeRecordId.is_in(record_ids))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}
