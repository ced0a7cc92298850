mod common;

use bookstore_app::modules::books::{BookFilters, BookRepository, RepositoryError};
use common::{migrated_pool, sample_book};

async fn repository() -> BookRepository {
    let (_, db) = migrated_pool().await;
    BookRepository::new(db)
}

#[tokio::test]
async fn created_book_reads_back_unchanged() {
    let repo = repository().await;
    let book = sample_book("0691161518");

    let created = repo.create(&book).await.unwrap();
    assert_eq!(created, book);
    assert_eq!(repo.find_one("0691161518").await.unwrap(), book);
}

#[tokio::test]
async fn find_one_unknown_is_not_found() {
    let repo = repository().await;

    let err = repo.find_one("83457638").await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(ref isbn) if isbn == "83457638"));
    assert_eq!(err.to_string(), "There is no book with an isbn '83457638'");
}

#[tokio::test]
async fn find_all_orders_by_title_and_filters() {
    let repo = repository().await;
    let mut zebra = sample_book("1");
    zebra.title = "Zebra Crossings".to_string();
    zebra.language = "german".to_string();
    let mut apple = sample_book("2");
    apple.title = "Apple Orchards".to_string();
    repo.create(&zebra).await.unwrap();
    repo.create(&apple).await.unwrap();

    let all = repo.find_all(&BookFilters::default()).await.unwrap();
    let titles: Vec<&str> = all.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Apple Orchards", "Zebra Crossings"]);

    let filters = BookFilters {
        language: Some("german".to_string()),
        year: Some(2017),
        ..BookFilters::default()
    };
    let german = repo.find_all(&filters).await.unwrap();
    assert_eq!(german, vec![zebra]);
}

#[tokio::test]
async fn duplicate_isbn_surfaces_as_database_error() {
    let repo = repository().await;
    repo.create(&sample_book("0691161518")).await.unwrap();

    let err = repo.create(&sample_book("0691161518")).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Database(_)));
}

#[tokio::test]
async fn update_overwrites_all_fields() {
    let repo = repository().await;
    repo.create(&sample_book("0691161518")).await.unwrap();

    let mut replacement = sample_book("99990691161518");
    replacement.author = "UPDATED Matthew Lane".to_string();
    replacement.pages = 300;
    let updated = repo.update("0691161518", &replacement).await.unwrap();

    assert_eq!(updated, replacement);
    assert_eq!(repo.find_one("99990691161518").await.unwrap(), replacement);
    assert!(matches!(
        repo.find_one("0691161518").await,
        Err(RepositoryError::NotFound(_))
    ));
}

#[tokio::test]
async fn update_unknown_is_not_found() {
    let repo = repository().await;

    let err = repo
        .update("missing", &sample_book("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[tokio::test]
async fn remove_twice_is_not_found_the_second_time() {
    let repo = repository().await;
    repo.create(&sample_book("0691161518")).await.unwrap();

    repo.remove("0691161518").await.unwrap();
    assert!(matches!(
        repo.remove("0691161518").await,
        Err(RepositoryError::NotFound(_))
    ));
}
