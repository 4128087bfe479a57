use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// donation status, driven by gateway reconciliation
#[derive(EnumIter, DeriveActiveEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum Status {
    #[sea_orm(string_value = "link_created")]
    #[serde(rename = "link_created")]
    LinkCreated,
    #[sea_orm(string_value = "payment_completed")]
    #[serde(rename = "payment_completed")]
    PaymentCompleted,
    #[sea_orm(string_value = "payment_failed")]
    #[serde(rename = "payment_failed")]
    PaymentFailed,
}

/// donations

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// the authed user who created the payment link, not the donor
    pub link_creator_id: i32,

    pub amount: f64,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub status: Status,

    /// data create time
    pub created_at: i64,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub payment_link_id: Option<String>,

    #[sea_orm(column_type = "String(Some(500))", nullable)]
    pub payment_link_url: Option<String>,

    pub payment_link_expiry: Option<i64>,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub donor_name: Option<String>,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub donor_email: Option<String>,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub razorpay_payment_id: Option<String>,

    pub payment_date: Option<i64>,

    /// gateway assigned correlation id
    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub reference_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LinkCreatorId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
