use sea_orm_migration::prelude::*;

use meridian_core::domain::DEFAULT_CATEGORIES;

use crate::m20250101_000001_create_blog_tables::BlogCategories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(BlogCategories::Table)
            .columns([BlogCategories::Name, BlogCategories::Slug])
            .on_conflict(
                OnConflict::column(BlogCategories::Slug)
                    .do_nothing()
                    .to_owned(),
            );

        for (name, slug) in DEFAULT_CATEGORIES {
            insert
                .values([(*name).into(), (*slug).into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let slugs = DEFAULT_CATEGORIES.iter().map(|(_, slug)| *slug);

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(BlogCategories::Table)
                    .and_where(Expr::col(BlogCategories::Slug).is_in(slugs))
                    .to_owned(),
            )
            .await
    }
}
