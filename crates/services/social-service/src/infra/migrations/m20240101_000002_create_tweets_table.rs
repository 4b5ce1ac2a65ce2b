//! Migration: Create tweets table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tweets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tweets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tweets::UserName).string().not_null())
                    .col(ColumnDef::new(Tweets::Content).text().not_null())
                    .col(
                        ColumnDef::new(Tweets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tweets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tweets::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Per-author listing
        manager
            .create_index(
                Index::create()
                    .name("idx_tweets_user_name")
                    .table(Tweets::Table)
                    .col(Tweets::UserName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tweets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tweets {
    Table,
    Id,
    UserName,
    Content,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
