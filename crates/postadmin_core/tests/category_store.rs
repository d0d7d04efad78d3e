use postadmin_core::db::open_db_in_memory;
use postadmin_core::{
    Category, CategoryRepository, CategoryService, CategoryServiceError, RepoError,
    SqliteCategoryRepository, ValidationError, UNKNOWN_CATEGORY_LABEL,
};

#[test]
fn repository_crud_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::new(&conn);

    let news = repo.create("News").unwrap();
    let blog = repo.create("Blog").unwrap();
    repo.update(&blog, "Journal").unwrap();

    assert_eq!(
        repo.fetch_all().unwrap(),
        vec![
            Category::new(news.clone(), "News"),
            Category::new(blog.clone(), "Journal")
        ]
    );

    repo.delete(&news).unwrap();
    assert!(repo.get(&news).unwrap().is_none());
    assert!(matches!(
        repo.delete(&news).unwrap_err(),
        RepoError::NotFound { entity: "category", .. }
    ));
}

#[test]
fn duplicate_names_are_allowed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::new(&conn);
    let first = repo.create("Same").unwrap();
    let second = repo.create("Same").unwrap();
    assert_ne!(first, second);
}

#[test]
fn service_rejects_blank_names_and_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::new(&conn));

    assert!(matches!(
        service.create("   ").unwrap_err(),
        CategoryServiceError::Validation(ValidationError::EmptyField("name"))
    ));
    assert!(matches!(
        service.rename("missing", "Name").unwrap_err(),
        CategoryServiceError::CategoryNotFound(id) if id == "missing"
    ));
}

#[test]
fn service_trims_names() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let id = service.create("  Travel ").unwrap();
    assert_eq!(service.resolve_name(&id).unwrap(), "Travel");
}

#[test]
fn resolve_name_falls_back_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let id = service.create("Temporary").unwrap();
    service.delete(&id).unwrap();
    assert_eq!(service.resolve_name(&id).unwrap(), UNKNOWN_CATEGORY_LABEL);
}

#[test]
fn subscribers_receive_initial_and_updated_snapshots() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::new(&conn));
    service.create("News").unwrap();

    let feed = service.subscribe().unwrap();
    let initial = feed.try_recv().unwrap();
    assert_eq!(initial.len(), 1);

    let id = service.create("Blog").unwrap();
    let after_create = feed.try_recv().unwrap();
    assert_eq!(after_create.len(), 2);

    service.rename(&id, "Journal").unwrap();
    let after_rename = feed.try_recv().unwrap();
    assert!(after_rename.iter().any(|category| category.name == "Journal"));

    service.delete(&id).unwrap();
    assert_eq!(feed.try_recv().unwrap().len(), 1);
    assert!(feed.try_recv().is_err());
}

#[test]
fn failed_mutation_publishes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let feed = service.subscribe().unwrap();
    feed.try_recv().unwrap();

    assert!(service.delete("missing").is_err());
    assert!(feed.try_recv().is_err());
}

#[test]
fn dropped_subscribers_are_pruned() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::new(&conn));

    let kept = service.subscribe().unwrap();
    let dropped = service.subscribe().unwrap();
    assert_eq!(service.subscriber_count(), 2);
    drop(dropped);

    service.create("News").unwrap();
    assert_eq!(service.subscriber_count(), 1);
    assert_eq!(kept.try_iter().count(), 2);
}

#[test]
fn feed_receiver_can_be_drained_on_another_thread() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let feed = service.subscribe().unwrap();

    let reader = std::thread::spawn(move || {
        feed.iter()
            .map(|snapshot| snapshot.len())
            .collect::<Vec<_>>()
    });

    service.create("News").unwrap();
    service.create("Blog").unwrap();
    drop(service);

    assert_eq!(reader.join().unwrap(), vec![0, 1, 2]);
}
