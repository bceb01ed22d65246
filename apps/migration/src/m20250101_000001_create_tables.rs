//! Users and subreddits, each row one document. Embedded posts, voter sets
//! and subscription sets live in `jsonb` columns.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_uuid(Users::Id))
                    .col(string(Users::Name))
                    .col(string_uniq(Users::Email))
                    .col(string(Users::PasswordHash))
                    .col(big_integer(Users::Karma).default(1))
                    .col(timestamp_with_time_zone(Users::Joined))
                    .col(json_binary(Users::SubscribedTo).default(Expr::cust("'[]'::jsonb")))
                    .col(json_binary(Users::PostsPublished).default(Expr::cust("'[]'::jsonb")))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subreddits::Table)
                    .if_not_exists()
                    .col(pk_uuid(Subreddits::Id))
                    .col(string(Subreddits::Name))
                    .col(text(Subreddits::Bio))
                    .col(uuid(Subreddits::CreatedBy))
                    .col(timestamp_with_time_zone(Subreddits::CreatedAt))
                    .col(integer(Subreddits::Subscriptions).default(0))
                    .col(json_binary(Subreddits::Subscribers).default(Expr::cust("'[]'::jsonb")))
                    .col(
                        json_binary(Subreddits::PostsPublished)
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .to_owned(),
            )
            .await?;

        // Subreddit listings page in creation order.
        manager
            .create_index(
                Index::create()
                    .name("idx_subreddits_created_at")
                    .table(Subreddits::Table)
                    .col(Subreddits::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subreddits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Karma,
    Joined,
    SubscribedTo,
    PostsPublished,
}

#[derive(DeriveIden)]
enum Subreddits {
    Table,
    Id,
    Name,
    Bio,
    CreatedBy,
    CreatedAt,
    Subscriptions,
    Subscribers,
    PostsPublished,
}
