//! `SeaORM` Entity for fee structures.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub due_date: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student_fee_records::Entity")]
    StudentFeeRecords,
}

impl Related<super::student_fee_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentFeeRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
