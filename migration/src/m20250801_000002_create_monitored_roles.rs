use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // (guild_id, role_id) is the primary key, so a role is monitored at most once per guild
        manager
            .create_table(
                Table::create()
                    .table(MonitoredRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitoredRoles::GuildId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitoredRoles::RoleId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MonitoredRoles::GuildId)
                            .col(MonitoredRoles::RoleId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonitoredRoles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MonitoredRoles {
    Table,
    GuildId,
    RoleId,
}
