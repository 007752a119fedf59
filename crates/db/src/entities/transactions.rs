//! `SeaORM` Entity for fee payment transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_fee_record_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub remarks: Option<String>,
    pub payment_reference: Option<String>,
    pub status: TransactionStatus,
    pub recorded_by: Option<Uuid>,
    pub initiated_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub payment_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_fee_records::Entity",
        from = "Column::StudentFeeRecordId",
        to = "super::student_fee_records::Column::Id"
    )]
    StudentFeeRecords,
}

impl Related<super::student_fee_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentFeeRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
