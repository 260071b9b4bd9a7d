//! Admin product and category table tests

mod common;

use std::sync::Arc;

use brainboost_client::application::admin::{
    product_image_path, DeleteCategory, DeleteCategoryError, DeleteProduct, DeleteProductError,
    ListAdminProducts, ListCategories, SaveCategory, SaveCategoryError, SaveCategoryInput,
    SaveProduct, SaveProductError, SaveProductInput, ADMIN_PAGE_SIZE, PRODUCT_IMAGE_BUCKET,
};
use brainboost_client::domain::services::TableState;
use brainboost_client::infrastructure::storage::ImageFile;

use common::*;

fn product_input(name: &str, points: Option<i64>) -> SaveProductInput {
    SaveProductInput {
        name: name.to_string(),
        description: "Soft and warm".to_string(),
        points_required: points,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_save_product_needs_name_and_points() {
    let app = setup().await;
    let save = SaveProduct::new(app.state.shop_repo.clone(), app.state.storage.clone());

    for input in [
        product_input("   ", Some(10)),
        product_input("Hoodie", None),
    ] {
        let err = save.execute(input).await.unwrap_err();
        assert!(matches!(err, SaveProductError::MissingFields));
        assert_eq!(err.to_string(), "Product name and points required are required.");
    }
    assert_eq!(count_rows(&app.pool, "products").await, 0);
}

#[tokio::test]
async fn test_save_product_accepts_zero_points() {
    let app = setup().await;
    let save = SaveProduct::new(app.state.shop_repo.clone(), app.state.storage.clone());

    save.execute(product_input("Free Sticker", Some(0))).await.unwrap();

    let products = app.state.shop_repo.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Free Sticker");
    assert_eq!(products[0].points_required, 0);
}

#[tokio::test]
async fn test_save_product_uploads_attached_image() {
    let app = setup().await;
    let save = SaveProduct::new(app.state.shop_repo.clone(), app.state.storage.clone());

    let mut input = product_input("Brain Boost Hoodie", Some(80));
    input.image = Some(ImageFile::new("front.view.png", "image/png", vec![0x89, 0x50]));
    save.execute(input).await.unwrap();

    assert_eq!(app.storage.len(), 1);
    let products = app.state.shop_repo.list_products().await.unwrap();
    assert_eq!(products.len(), 1);

    let url = products[0].image_url.clone().unwrap();
    let prefix = format!("memory://{}/Brain_Boost_Hoodie_", PRODUCT_IMAGE_BUCKET);
    assert!(url.starts_with(&prefix), "unexpected url {}", url);
    assert!(url.ends_with(".png"));

    let path = url.trim_start_matches(&format!("memory://{}/", PRODUCT_IMAGE_BUCKET));
    assert_eq!(app.storage.get(PRODUCT_IMAGE_BUCKET, path).unwrap().bytes, vec![0x89, 0x50]);
}

#[tokio::test]
async fn test_failed_upload_keeps_product_unsaved() {
    let app = setup().await;
    app.storage.fail_uploads();
    let save = SaveProduct::new(app.state.shop_repo.clone(), app.state.storage.clone());

    let mut input = product_input("Mug", Some(15));
    input.image = Some(ImageFile::new("mug.jpg", "image/jpeg", vec![1, 2, 3]));
    let err = save.execute(input).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to upload image.");
    assert_eq!(count_rows(&app.pool, "products").await, 0);
}

#[tokio::test]
async fn test_edit_product_keeps_existing_image_url() {
    let app = setup().await;
    let id = seed_product(&app.pool, "Pen", 5, minutes_ago(1)).await;
    let save = SaveProduct::new(app.state.shop_repo.clone(), app.state.storage.clone());

    let mut input = product_input("Gel Pen", Some(6));
    input.id = Some(id.clone());
    input.image_url = "https://cdn.test/pen.png".to_string();
    save.execute(input).await.unwrap();

    let product = app.state.shop_repo.find_product(&id).await.unwrap().unwrap();
    assert_eq!(product.name, "Gel Pen");
    assert_eq!(product.points_required, 6);
    assert_eq!(product.image_url.as_deref(), Some("https://cdn.test/pen.png"));
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn test_store_failure_without_message_uses_default() {
    let app = setup().await;
    let shop = Arc::new(FlakyShopRepository::new(app.state.shop_repo.clone()));
    shop.fail_product_writes();

    let err = SaveProduct::new(shop, app.state.storage.clone())
        .execute(product_input("Mug", Some(15)))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to save product");
}

#[tokio::test]
async fn test_delete_product_removes_purchases_first() {
    let app = setup().await;
    seed_profile(&app.pool, "kid", "kid", "student", 0).await;
    let cap = seed_product(&app.pool, "Cap", 10, minutes_ago(2)).await;
    let mug = seed_product(&app.pool, "Mug", 10, minutes_ago(1)).await;
    seed_purchase(&app.pool, "kid", &cap, "pending", minutes_ago(1)).await;
    seed_purchase(&app.pool, "kid", &cap, "completed", minutes_ago(1)).await;
    seed_purchase(&app.pool, "kid", &mug, "pending", minutes_ago(1)).await;

    DeleteProduct::new(app.state.shop_repo.clone()).execute(&cap).await.unwrap();

    assert!(app.state.shop_repo.find_product(&cap).await.unwrap().is_none());
    assert_eq!(count_rows(&app.pool, "purchases").await, 1);
    assert_eq!(count_rows(&app.pool, "products").await, 1);
}

#[tokio::test]
async fn test_failed_purchase_cleanup_keeps_product() {
    let app = setup().await;
    seed_profile(&app.pool, "kid", "kid", "student", 0).await;
    let cap = seed_product(&app.pool, "Cap", 10, minutes_ago(1)).await;
    seed_purchase(&app.pool, "kid", &cap, "pending", minutes_ago(1)).await;

    let shop = Arc::new(FlakyShopRepository::new(app.state.shop_repo.clone()));
    shop.fail_purchase_cleanup();
    let err = DeleteProduct::new(shop).execute(&cap).await.unwrap_err();

    assert!(matches!(err, DeleteProductError::Purchases(_)));
    assert_eq!(err.to_string(), "Failed to delete related purchases. Product not deleted.");
    assert!(app.state.shop_repo.find_product(&cap).await.unwrap().is_some());
    assert_eq!(count_rows(&app.pool, "purchases").await, 1);
}

#[tokio::test]
async fn test_product_table_search_and_pages() {
    let app = setup().await;
    for i in 0..7 {
        seed_product(&app.pool, &format!("Sticker {}", i), 5, minutes_ago(i)).await;
    }
    seed_product(&app.pool, "Hoodie", 80, minutes_ago(30)).await;

    let list = ListAdminProducts::new(app.state.shop_repo.clone());
    let mut table = TableState::new(ADMIN_PAGE_SIZE);

    table.set_page(2);
    let page = list.execute(&table).await.unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_pages, 2);

    table.set_search("  STICKER ");
    assert_eq!(table.page(), 1);
    let page = list.execute(&table).await.unwrap();
    assert_eq!(page.total_items, 7);
    assert_eq!(page.items.len(), ADMIN_PAGE_SIZE);
    assert!(page.items.iter().all(|p| p.name.starts_with("Sticker")));
}

#[tokio::test]
async fn test_category_names_are_trimmed_and_unique() {
    let app = setup().await;
    let general = seed_category(&app.pool, "General").await;
    let save = SaveCategory::new(app.state.forum_repo.clone());

    let err = save
        .execute(SaveCategoryInput { id: None, name: "   ".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, SaveCategoryError::MissingName));
    assert_eq!(err.to_string(), "Category name is required.");

    let err = save
        .execute(SaveCategoryInput { id: None, name: " general ".into() })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Category name must be unique.");

    // Renaming a row to its own name in another case is fine
    save.execute(SaveCategoryInput {
        id: Some(general.clone()),
        name: "GENERAL".into(),
    })
    .await
    .unwrap();

    save.execute(SaveCategoryInput { id: None, name: "  Homework help ".into() })
        .await
        .unwrap();

    let names: Vec<String> = app
        .state
        .forum_repo
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["GENERAL".to_string(), "Homework help".to_string()]);
}

#[tokio::test]
async fn test_delete_category_removes_posts_first() {
    let app = setup().await;
    let maths = seed_category(&app.pool, "Maths").await;
    let art = seed_category(&app.pool, "Art").await;
    seed_post(&app.pool, &maths, "Fractions?").await;
    seed_post(&app.pool, &maths, "Long division").await;
    seed_post(&app.pool, &art, "Colour wheel").await;

    DeleteCategory::new(app.state.forum_repo.clone()).execute(&maths).await.unwrap();

    assert_eq!(count_rows(&app.pool, "forum_posts").await, 1);
    let table = TableState::new(ADMIN_PAGE_SIZE);
    let page = ListCategories::new(app.state.forum_repo.clone()).execute(&table).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Art");
}

#[tokio::test]
async fn test_failed_post_cleanup_keeps_category() {
    let app = setup().await;
    let maths = seed_category(&app.pool, "Maths").await;
    seed_post(&app.pool, &maths, "Fractions?").await;

    let forum = Arc::new(FailingPostsForumRepository::new(app.state.forum_repo.clone()));
    let err = DeleteCategory::new(forum).execute(&maths).await.unwrap_err();

    assert!(matches!(err, DeleteCategoryError::Posts(_)));
    assert_eq!(err.to_string(), "Failed to delete posts for this category.");
    assert_eq!(count_rows(&app.pool, "forum_categories").await, 1);
    assert_eq!(count_rows(&app.pool, "forum_posts").await, 1);
}

#[test]
fn test_image_path_collapses_whitespace_runs() {
    assert_eq!(product_image_path("Big \t Red  Cap", "webp", 42), "Big_Red_Cap_42.webp");
}
