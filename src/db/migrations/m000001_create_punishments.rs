use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Punishments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Punishments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Punishments::GuildId).big_integer().not_null())
                    .col(ColumnDef::new(Punishments::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Punishments::Action).string_len(16).not_null())
                    .col(ColumnDef::new(Punishments::DurationSecs).big_integer())
                    .col(ColumnDef::new(Punishments::Reason).string().not_null())
                    .col(ColumnDef::new(Punishments::Issuer).string().not_null())
                    .col(ColumnDef::new(Punishments::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Index for history lookups by target
        manager
            .create_index(
                Index::create()
                    .name("idx-punishments-guild-user")
                    .table(Punishments::Table)
                    .col(Punishments::GuildId)
                    .col(Punishments::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Punishments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Punishments {
    Table,
    Id,
    GuildId,
    UserId,
    Action,
    DurationSecs,
    Reason,
    Issuer,
    CreatedAt,
}
