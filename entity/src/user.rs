use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// users

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// globally unique, the anchor for otp login
    #[sea_orm(column_type = "String(Some(20))")]
    pub phone_number: String,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub name: Option<String>,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub email: Option<String>,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::donation::Entity")]
    Donation,
}

impl Related<super::donation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
