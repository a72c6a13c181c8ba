//! `PgStore` behaviour that the in-memory store cannot show: unique
//! indexes, the public filter in SQL and the transactional reorder.
//!
//! These tests require a migrated `PostgreSQL` database in `DATABASE_URL`
//! (`lumen migrate`). Every row they create carries a random suffix and is
//! deleted at the end.
//!
//! Run with: `cargo test -p lumen-integration-tests --test postgres_store -- --ignored`

#![allow(clippy::unwrap_used)]

use lumen_core::comments::CommentBoard;
use lumen_core::content::{Audience, BlogPost, PostDraft, Service, ServiceDraft};
use lumen_core::manager::ContentManager;
use lumen_core::postgres::PgStore;
use lumen_core::store::ContentStore;
use lumen_core::{ContentError, PublicationState, ServiceId};
use sqlx::PgPool;
use uuid::Uuid;

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").unwrap();
    PgStore::new(PgPool::connect(&url).await.unwrap())
}

fn suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

fn post_draft(title: &str, publication: PublicationState) -> PostDraft {
    PostDraft {
        title: title.to_owned(),
        body: Some(format!("# {title}")),
        publication,
        ..PostDraft::default()
    }
}

fn service_draft(title: &str) -> ServiceDraft {
    ServiceDraft {
        title: title.to_owned(),
        ..ServiceDraft::default()
    }
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_duplicate_slug_is_a_conflict() {
    let store = store().await;
    let posts = ContentManager::<BlogPost, _>::new(&store);
    let title = format!("Hello World {}", suffix());

    let first = posts
        .create(&post_draft(&title, PublicationState::Draft))
        .await
        .unwrap();
    let err = posts
        .create(&post_draft(&title, PublicationState::Draft))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Conflict(_)), "got {err:?}");

    posts.delete(first.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_duplicate_service_title_is_a_conflict() {
    let store = store().await;
    let services = ContentManager::<Service, _>::new(&store);
    let title = format!("Branding {}", suffix());

    let first = services.create(&service_draft(&title)).await.unwrap();
    let err = services.create(&service_draft(&title)).await.unwrap_err();
    assert!(matches!(err, ContentError::Conflict(_)), "got {err:?}");

    services.delete(first.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_public_queries_exclude_drafts() {
    let store = store().await;
    let posts = ContentManager::<BlogPost, _>::new(&store);
    let tag = suffix();

    let draft = posts
        .create(&post_draft(&format!("Draft {tag}"), PublicationState::Draft))
        .await
        .unwrap();
    let live = posts
        .create(&post_draft(&format!("Live {tag}"), PublicationState::Published))
        .await
        .unwrap();

    // The store itself filters, before the manager's own check.
    let public: Vec<BlogPost> = ContentStore::<BlogPost>::select(&store, Audience::Public)
        .await
        .unwrap();
    assert!(public.iter().all(|p| p.publication.is_published()));
    assert!(public.iter().any(|p| p.id == live.id));
    assert!(public.iter().all(|p| p.id != draft.id));

    let admin: Vec<BlogPost> = ContentStore::<BlogPost>::select(&store, Audience::Admin)
        .await
        .unwrap();
    assert!(admin.iter().any(|p| p.id == draft.id));

    let hidden = ContentStore::<BlogPost>::find_by_key(&store, draft.slug.as_str(), Audience::Public)
        .await
        .unwrap();
    assert!(hidden.is_none());
    let found = ContentStore::<BlogPost>::find_by_key(&store, draft.slug.as_str(), Audience::Admin)
        .await
        .unwrap();
    assert_eq!(found.map(|p| p.id), Some(draft.id));

    posts.delete(draft.id).await.unwrap();
    posts.delete(live.id).await.unwrap();
}

async fn positions(
    services: &ContentManager<'_, Service, PgStore>,
    ids: &[ServiceId],
) -> Vec<i32> {
    let mut out = Vec::new();
    for id in ids {
        out.push(services.get(*id).await.unwrap().display_order);
    }
    out
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_reorder_writes_the_whole_order() {
    let store = store().await;
    let services = ContentManager::<Service, _>::new(&store);
    let tag = suffix();

    let mut ids = Vec::new();
    for name in ["One", "Two", "Three"] {
        let service = services
            .create(&service_draft(&format!("{name} {tag}")))
            .await
            .unwrap();
        ids.push(service.id);
    }
    let &[id1, id2, id3] = ids.as_slice() else {
        panic!("three services were created");
    };

    services.reorder(&[id3, id1, id2]).await.unwrap();
    assert_eq!(positions(&services, &[id3, id1, id2]).await, vec![0, 1, 2]);

    // An unknown id rolls the whole statement back.
    let err = services
        .reorder(&[id1, id2, ServiceId::generate(), id3])
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::NotFound), "got {err:?}");
    assert_eq!(positions(&services, &[id3, id1, id2]).await, vec![0, 1, 2]);

    for id in ids {
        services.delete(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_comment_delete_is_scoped_to_its_post() {
    let store = store().await;
    let posts = ContentManager::<BlogPost, _>::new(&store);
    let board = CommentBoard::new(&store);
    let tag = suffix();

    let post = posts
        .create(&post_draft(&format!("Commented {tag}"), PublicationState::Published))
        .await
        .unwrap();
    let other = posts
        .create(&post_draft(&format!("Other {tag}"), PublicationState::Published))
        .await
        .unwrap();
    let comment = board.submit(post.id, "Ana", "Nice work").await.unwrap();

    let err = board.remove(other.id, comment.id).await.unwrap_err();
    assert!(matches!(err, ContentError::NotFound), "got {err:?}");
    assert_eq!(board.list(post.id).await.unwrap().len(), 1);

    board.remove(post.id, comment.id).await.unwrap();
    assert!(board.list(post.id).await.unwrap().is_empty());

    posts.delete(post.id).await.unwrap();
    posts.delete(other.id).await.unwrap();
}
