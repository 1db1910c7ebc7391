#[cfg(feature = "postgres")]
mod postgres {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use uuid::Uuid;

    use crate::database::entity::{blog_category, blog_post, post_category, post_tag};
    use crate::database::postgres_store::PostgresContentStore;
    use meridian_core::domain::{PostLocator, PostStatus};
    use meridian_core::error::RepoError;
    use meridian_core::ports::{AdminStore, ContentStore, PublishedQuery};

    fn post_model(slug: &str) -> blog_post::Model {
        let now = chrono::Utc::now();
        blog_post::Model {
            id: Uuid::new_v4(),
            title: "Cloud Costs".to_owned(),
            slug: slug.to_owned(),
            excerpt: None,
            content: "<p>Cut the bill.</p>".to_owned(),
            featured_image_url: None,
            featured_image_alt: None,
            status: blog_post::Status::Published,
            published_at: Some(now.into()),
            author_name: "Meridian Team".to_owned(),
            read_time: Some(4),
            views: 10,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_published_by_slug_attaches_categories() {
        let model = post_model("cloud-costs");
        let category_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()]])
            .append_query_results([vec![post_category::Model {
                post_id: model.id,
                category_id,
            }]])
            .append_query_results([Vec::<post_tag::Model>::new()])
            .append_query_results([vec![blog_category::Model {
                id: category_id,
                name: "Cloud".to_owned(),
                slug: "cloud".to_owned(),
            }]])
            .into_connection();

        let store = PostgresContentStore::new(db);
        let record = store
            .find_published_by_slug("cloud-costs")
            .await
            .unwrap()
            .expect("post should be found");

        assert_eq!(record.post.id, model.id);
        assert_eq!(record.post.status, PostStatus::Published);
        assert_eq!(record.post.read_time, Some(4));
        assert_eq!(record.categories.len(), 1);
        assert_eq!(record.categories[0].slug, "cloud");
        assert!(record.tags.is_empty());
    }

    #[tokio::test]
    async fn test_find_published_by_slug_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();

        let store = PostgresContentStore::new(db);
        assert!(store.find_published_by_slug("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_escapes_like_wildcards() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();

        let store = PostgresContentStore::new(db.clone());
        let query = PublishedQuery {
            search: Some("100%_Off".to_owned()),
            ..Default::default()
        };
        assert!(store.list_published(&query).await.unwrap().is_empty());

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("ESCAPE"));
        // Debug output doubles each backslash.
        assert!(log.contains(r"%100\\%\\_off%"));
    }

    #[tokio::test]
    async fn test_list_categories_counts_links() {
        let used = Uuid::new_v4();
        let unused = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                blog_category::Model {
                    id: used,
                    name: "Cloud".to_owned(),
                    slug: "cloud".to_owned(),
                },
                blog_category::Model {
                    id: unused,
                    name: "Strategy".to_owned(),
                    slug: "strategy".to_owned(),
                },
            ]])
            .append_query_results([vec![BTreeMap::from([
                ("category_id", Value::from(used)),
                ("post_count", Value::from(2i64)),
            ])]])
            .into_connection();

        let store = PostgresContentStore::new(db);
        let categories = store.list_categories().await.unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].count, 2);
        assert_eq!(categories[1].count, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let store = PostgresContentStore::new(db);
        let result = store
            .delete_post(&PostLocator::Slug("ghost".to_owned()))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();

        let store = PostgresContentStore::new(db);
        let post = post_model("gone").into();
        let result = store.update_post(post).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}

/// Service workflows run against the in-memory store.
mod workflows {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use meridian_core::DomainError;
    use meridian_core::domain::{Post, PostInput, PostLocator, PostStatus};
    use meridian_core::ports::{AdminStore, ContentStore};
    use meridian_core::services::{AdminWorkflow, ContentRepository, ListPublishedParams};

    use crate::database::InMemoryContentStore;

    struct Site {
        store: Arc<InMemoryContentStore>,
        admin: AdminWorkflow,
        content: ContentRepository,
    }

    fn site() -> Site {
        let store = Arc::new(InMemoryContentStore::new());
        Site {
            admin: AdminWorkflow::new(store.clone()),
            content: ContentRepository::new(store.clone()),
            store,
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[tokio::test]
    async fn test_create_draft_then_publish() {
        let site = site();

        let draft = site
            .admin
            .create_post(PostInput::new("Hello World!", words(400)))
            .await
            .unwrap();
        assert_eq!(draft.slug, "hello-world");
        assert_eq!(draft.status, PostStatus::Draft);
        assert_eq!(draft.published_at, None);
        assert_eq!(draft.read_time, Some(2));
        assert_eq!(draft.author_name, "Meridian Team");

        assert!(site.content.get_by_slug("hello-world").await.unwrap().is_none());
        assert!(site.content.list_all_slugs().await.unwrap().is_empty());

        let before = Utc::now();
        let published = site.admin.publish(draft.id).await.unwrap();
        assert_eq!(published.status, PostStatus::Published);
        assert!(published.published_at.expect("stamped on publish") >= before);

        let view = site
            .content
            .get_by_slug("hello-world")
            .await
            .unwrap()
            .expect("published post is visible");
        assert_eq!(view.read_time, "2 min read");
        assert_eq!(site.content.list_all_slugs().await.unwrap(), vec!["hello-world"]);
    }

    #[tokio::test]
    async fn test_get_by_slug_counts_views() {
        let site = site();
        site.admin
            .create_post(PostInput::new("Counted", "body").with_status(PostStatus::Published))
            .await
            .unwrap();

        site.content.get_by_slug("counted").await.unwrap();
        let view = site.content.get_by_slug("counted").await.unwrap().unwrap();

        // The returned view was read before its own increment.
        assert_eq!(view.views, 1);
        let record = site.store.list_all_posts().await.unwrap();
        assert_eq!(record[0].post.views, 2);
    }

    #[tokio::test]
    async fn test_update_with_empty_categories_keeps_associations() {
        let site = site();
        let a = site.store.add_category("Alpha", "alpha").await;
        let b = site.store.add_category("Beta", "beta").await;

        let post = site
            .admin
            .create_post(PostInput::new("Tagged", "body").with_categories(vec![a.id, b.id]))
            .await
            .unwrap();

        site.admin
            .update_post(
                post.id,
                PostInput::new("Tagged again", "new body").with_categories(vec![]),
            )
            .await
            .unwrap();

        let detail = site.admin.get_post(post.id).await.unwrap();
        assert_eq!(detail.post.title, "Tagged again");
        assert_eq!(detail.categories.len(), 2);

        site.admin
            .update_post(
                post.id,
                PostInput::new("Tagged again", "new body").with_categories(vec![b.id, b.id]),
            )
            .await
            .unwrap();
        let detail = site.admin.get_post(post.id).await.unwrap();
        assert_eq!(detail.categories, vec![b.id]);
    }

    #[tokio::test]
    async fn test_update_keeps_views_and_publication_time() {
        let site = site();
        let post = site
            .admin
            .create_post(PostInput::new("Stable", "body").with_status(PostStatus::Published))
            .await
            .unwrap();
        site.content.get_by_slug("stable").await.unwrap();

        let updated = site
            .admin
            .update_post(
                post.id,
                PostInput::new("Stable", "edited").with_status(PostStatus::Published),
            )
            .await
            .unwrap();

        assert_eq!(updated.views, 1);
        assert_eq!(updated.created_at, post.created_at);
        assert_eq!(updated.published_at, post.published_at);

        let unpublished = site
            .admin
            .update_post(post.id, PostInput::new("Stable", "edited"))
            .await
            .unwrap();
        assert_eq!(unpublished.published_at, None);
    }

    #[tokio::test]
    async fn test_publish_restamps_published_post() {
        let site = site();
        let launched = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let mut post = Post::new("Launch Notes".into(), "launch-notes".into(), "body".into());
        post.status = PostStatus::Published;
        post.published_at = Some(launched);
        site.store.insert_post(post.clone()).await.unwrap();

        let before = Utc::now();
        let republished = site.admin.publish(post.id).await.unwrap();

        let stamped = republished.published_at.expect("still published");
        assert_ne!(stamped, launched);
        assert!(stamped >= before);
    }

    #[tokio::test]
    async fn test_category_filter_applies_after_limit() {
        let site = site();
        let cloud = site.store.add_category("Cloud", "cloud").await;

        site.admin
            .create_post(
                PostInput::new("Older cloud post", "body")
                    .with_status(PostStatus::Published)
                    .with_categories(vec![cloud.id]),
            )
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        site.admin
            .create_post(PostInput::new("Newest post", "body").with_status(PostStatus::Published))
            .await
            .unwrap();

        let first_page = site
            .content
            .list_published(&ListPublishedParams {
                limit: Some(1),
                category: Some("cloud".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(first_page.is_empty());

        let unbounded = site
            .content
            .list_published(&ListPublishedParams {
                category: Some("cloud".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(unbounded.len(), 1);
        assert_eq!(unbounded[0].slug, "older-cloud-post");
    }

    #[tokio::test]
    async fn test_search_matches_title_or_content() {
        let site = site();
        for (title, content) in [
            ("Kubernetes in practice", "containers"),
            ("Budgeting", "Our KUBERNETES bill"),
            ("Unrelated", "nothing here"),
        ] {
            site.admin
                .create_post(PostInput::new(title, content).with_status(PostStatus::Published))
                .await
                .unwrap();
        }

        let hits = site
            .content
            .list_published(&ListPublishedParams {
                search: Some("  kubernetes ".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_category_counts_include_drafts() {
        let site = site();
        let cloud = site.store.add_category("Cloud", "cloud").await;
        site.store.add_category("Strategy", "strategy").await;

        site.admin
            .create_post(PostInput::new("Draft", "body").with_categories(vec![cloud.id]))
            .await
            .unwrap();

        let categories = site.content.list_categories().await.unwrap();
        let counts: Vec<(String, u64)> =
            categories.into_iter().map(|c| (c.slug, c.count)).collect();
        assert_eq!(
            counts,
            vec![("cloud".to_string(), 1), ("strategy".to_string(), 0)]
        );
    }

    #[tokio::test]
    async fn test_related_posts_and_fallback() {
        let site = site();
        let cloud = site.store.add_category("Cloud", "cloud").await;
        let published = |title: &'static str| {
            PostInput::new(title, "body").with_status(PostStatus::Published)
        };

        let source = site
            .admin
            .create_post(published("Source").with_categories(vec![cloud.id]))
            .await
            .unwrap();
        let sibling = site
            .admin
            .create_post(published("Sibling").with_categories(vec![cloud.id]))
            .await
            .unwrap();
        let loner = site.admin.create_post(published("Loner")).await.unwrap();

        let related = site.content.get_related(source.id, 3).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, sibling.id);

        let fallback = site.content.get_related(loner.id, 3).await.unwrap();
        assert_eq!(fallback.len(), 2);
        assert!(fallback.iter().all(|p| p.id != loner.id));
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let site = site();
        site.admin
            .create_post(PostInput::new("Same Title", "one"))
            .await
            .unwrap();

        let result = site
            .admin
            .create_post(PostInput::new("Same title", "two"))
            .await;
        assert!(matches!(result, Err(DomainError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_delete_by_slug_and_missing() {
        let site = site();
        let cloud = site.store.add_category("Cloud", "cloud").await;
        site.admin
            .create_post(PostInput::new("Doomed", "body").with_categories(vec![cloud.id]))
            .await
            .unwrap();

        site.admin
            .delete_post(PostLocator::Slug("doomed".into()))
            .await
            .unwrap();
        assert!(site.admin.list_posts().await.unwrap().is_empty());
        assert_eq!(site.content.list_categories().await.unwrap()[0].count, 0);

        let again = site.admin.delete_post(PostLocator::Slug("doomed".into())).await;
        assert!(matches!(again, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_tags_are_attached_to_views() {
        let site = site();
        let tag = site.store.add_tag("Rust", "rust").await;
        let post = site
            .admin
            .create_post(PostInput::new("Tagged", "body").with_status(PostStatus::Published))
            .await
            .unwrap();
        site.store.tag_post(post.id, tag.id).await.unwrap();

        let view = site.content.get_by_slug("tagged").await.unwrap().unwrap();
        assert_eq!(view.tags, vec!["rust"]);
        assert!(site.store.category_ids_for_post(post.id).await.unwrap().is_empty());
    }
}
