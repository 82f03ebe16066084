//! Initial migration to create the trendfeed database schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GitRepositories::Table)
                    .if_not_exists()
                    // GitHub's numeric id is the primary key
                    .col(
                        ColumnDef::new(GitRepositories::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    // Identity
                    .col(ColumnDef::new(GitRepositories::NodeId).string().null())
                    .col(ColumnDef::new(GitRepositories::Name).string().null())
                    .col(ColumnDef::new(GitRepositories::FullName).string().null())
                    .col(ColumnDef::new(GitRepositories::OwnerLogin).string().null())
                    .col(ColumnDef::new(GitRepositories::HtmlUrl).text().null())
                    // Content
                    .col(ColumnDef::new(GitRepositories::Description).text().null())
                    .col(ColumnDef::new(GitRepositories::Language).string().null())
                    .col(
                        ColumnDef::new(GitRepositories::StargazersCount)
                            .integer()
                            .null(),
                    )
                    // Upstream timestamps
                    .col(
                        ColumnDef::new(GitRepositories::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GitRepositories::PushedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GitRepositories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    // README
                    .col(ColumnDef::new(GitRepositories::ReadmeText).text().null())
                    .col(ColumnDef::new(GitRepositories::ReadmeSha).string().null())
                    .col(ColumnDef::new(GitRepositories::ReadmeEtag).text().null())
                    // Tracking
                    .col(
                        ColumnDef::new(GitRepositories::LastCrawledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup by composite name for the manual ingest path
        manager
            .create_index(
                Index::create()
                    .name("idx_git_repos_full_name")
                    .table(GitRepositories::Table)
                    .col(GitRepositories::FullName)
                    .to_owned(),
            )
            .await?;

        // Index on last_crawled_at for staleness queries
        manager
            .create_index(
                Index::create()
                    .name("idx_git_repos_last_crawled")
                    .table(GitRepositories::Table)
                    .col(GitRepositories::LastCrawledAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GitRepositories::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
#[sea_orm(iden = "git_repositories")]
enum GitRepositories {
    Table,
    Id,
    NodeId,
    Name,
    FullName,
    OwnerLogin,
    HtmlUrl,
    Description,
    Language,
    StargazersCount,
    CreatedAt,
    PushedAt,
    UpdatedAt,
    ReadmeText,
    ReadmeSha,
    ReadmeEtag,
    LastCrawledAt,
}
