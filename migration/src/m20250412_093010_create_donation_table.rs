use entity::donation;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(donation::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(donation::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::LinkCreatorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::Amount)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(donation::Column::Description).text().null())
                    .col(
                        ColumnDef::new(donation::Column::Status)
                            .string_len(20)
                            .not_null()
                            .default("link_created".to_owned()),
                    )
                    .col(
                        ColumnDef::new(donation::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::PaymentLinkId)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::PaymentLinkUrl)
                            .string_len(500)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::PaymentLinkExpiry)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::DonorName)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::DonorEmail)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::RazorpayPaymentId)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::PaymentDate)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::ReferenceId)
                            .string_len(100)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donation_link_creator")
                            .from(donation::Entity, donation::Column::LinkCreatorId)
                            .to(entity::user::Entity, entity::user::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_donation_link_creator_id")
                    .col(donation::Column::LinkCreatorId)
                    .table(donation::Entity)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_donation_payment_link_id")
                    .col(donation::Column::PaymentLinkId)
                    .table(donation::Entity)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_donation_link_creator_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_donation_payment_link_id").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(donation::Entity).to_owned())
            .await
    }
}
