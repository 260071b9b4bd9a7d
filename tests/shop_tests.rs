//! Shop and purchase history tests

mod common;

use brainboost_client::application::shop::{
    ListPurchases, ListPurchasesError, ListShopProducts, ListShopProductsError, PurchaseProduct,
    PurchaseProductError, ShopAccessError, SHOP_PAGE_SIZE,
};
use brainboost_client::application::navigation::build_menu;
use brainboost_client::domain::entities::{PurchaseStatus, PurchaseTab};
use brainboost_client::domain::services::{NotificationVariant, PageMarker};

use common::*;

async fn seed_catalogue(app: &TestApp, count: usize) -> Vec<String> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        // Product i is i minutes old, so the list comes back in seeding order
        let id = seed_product(&app.pool, &format!("Prize {}", i + 1), 10, minutes_ago(i as i64)).await;
        ids.push(id);
    }
    ids
}

#[tokio::test]
async fn test_shop_pages_hold_six_products_newest_first() {
    let app = setup().await;
    seed_profile(&app.pool, "kid", "kid", "student", 100).await;
    let ids = seed_catalogue(&app, 14).await;

    let list = ListShopProducts::new(app.state.shop_repo.clone(), app.state.profile_repo.clone());
    let ctx = ctx_for("kid");

    let first = list.execute(Some(&ctx), 1).await.unwrap();
    assert_eq!(first.products.items.len(), SHOP_PAGE_SIZE);
    assert_eq!(first.products.items[0].id, ids[0]);
    assert_eq!(first.products.total_pages, 3);
    assert_eq!(
        first.strip,
        vec![PageMarker::Number(1), PageMarker::Number(2), PageMarker::Number(3)]
    );
    assert_eq!(first.profile.points, 100);

    let last = list.execute(Some(&ctx), 3).await.unwrap();
    let names: Vec<&str> = last.products.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Prize 13", "Prize 14"]);
}

#[tokio::test]
async fn test_shop_strip_marks_gaps() {
    let app = setup().await;
    seed_profile(&app.pool, "kid", "kid", "student", 0).await;
    seed_catalogue(&app, 60).await;

    let list = ListShopProducts::new(app.state.shop_repo.clone(), app.state.profile_repo.clone());
    let page = list.execute(Some(&ctx_for("kid")), 5).await.unwrap();

    assert_eq!(page.products.total_pages, 10);
    assert_eq!(page.strip.first(), Some(&PageMarker::Number(1)));
    assert_eq!(page.strip[1], PageMarker::Ellipsis);
    assert_eq!(page.strip[page.strip.len() - 2], PageMarker::Ellipsis);
    assert_eq!(page.strip.last(), Some(&PageMarker::Number(10)));
}

#[tokio::test]
async fn test_shop_is_for_students_only() {
    let app = setup().await;
    seed_profile(&app.pool, "t", "teacher", "teacher", 500).await;

    let list = ListShopProducts::new(app.state.shop_repo.clone(), app.state.profile_repo.clone());
    let err = list.execute(Some(&ctx_for("t")), 1).await.unwrap_err();
    assert!(matches!(err, ListShopProductsError::Access(ShopAccessError::NotStudent)));

    let err = list.execute(None, 1).await.unwrap_err();
    assert!(matches!(err, ListShopProductsError::Access(ShopAccessError::NotAuthenticated)));

    let err = list.execute(Some(&ctx_for("ghost")), 1).await.unwrap_err();
    assert!(matches!(err, ListShopProductsError::Access(ShopAccessError::ProfileNotFound)));
}

#[tokio::test]
async fn test_purchase_with_too_few_points_writes_nothing() {
    let app = setup().await;
    seed_profile(&app.pool, "kid", "kid", "student", 30).await;
    let hoodie = seed_product(&app.pool, "Hoodie", 50, minutes_ago(1)).await;

    let purchase = PurchaseProduct::new(
        app.state.shop_repo.clone(),
        app.state.profile_repo.clone(),
        app.notifier.clone(),
    );
    let err = purchase.execute(Some(&ctx_for("kid")), &hoodie).await.unwrap_err();

    assert!(matches!(err, PurchaseProductError::InsufficientPoints { needed: 20 }));
    let toast = app.notifier.last().unwrap();
    assert_eq!(toast.title, "Not enough points");
    assert_eq!(toast.description, "You need 20 more points to purchase this item.");
    assert_eq!(count_rows(&app.pool, "purchases").await, 0);

    let profile = app.state.profile_repo.find_by_id("kid").await.unwrap().unwrap();
    assert_eq!(profile.points, 30);
}

#[tokio::test]
async fn test_purchase_records_pending_purchase_and_new_balance() {
    let app = setup().await;
    seed_profile(&app.pool, "kid", "kid", "student", 120).await;
    let cap = seed_product(&app.pool, "Cap", 45, minutes_ago(1)).await;

    let purchase = PurchaseProduct::new(
        app.state.shop_repo.clone(),
        app.state.profile_repo.clone(),
        app.notifier.clone(),
    );
    let outcome = purchase.execute(Some(&ctx_for("kid")), &cap).await.unwrap();

    assert_eq!(outcome.new_balance, 75);
    assert_eq!(outcome.purchase.status, PurchaseStatus::Pending);
    assert_eq!(outcome.purchase.points_spent, 45);
    assert_eq!(outcome.purchase.product_name(), "Cap");

    let profile = app.state.profile_repo.find_by_id("kid").await.unwrap().unwrap();
    assert_eq!(profile.points, 75);

    let toast = app.notifier.last().unwrap();
    assert_eq!(toast.variant, NotificationVariant::Success);
    assert_eq!(
        toast.description,
        "Successfully purchased Cap for 45 points. Your new balance: 75 points"
    );
}

#[tokio::test]
async fn test_purchase_of_exact_balance_is_allowed() {
    let app = setup().await;
    seed_profile(&app.pool, "kid", "kid", "student", 45).await;
    let cap = seed_product(&app.pool, "Cap", 45, minutes_ago(1)).await;

    let purchase = PurchaseProduct::new(
        app.state.shop_repo.clone(),
        app.state.profile_repo.clone(),
        app.notifier.clone(),
    );
    let outcome = purchase.execute(Some(&ctx_for("kid")), &cap).await.unwrap();
    assert_eq!(outcome.new_balance, 0);
}

#[tokio::test]
async fn test_unknown_product() {
    let app = setup().await;
    seed_profile(&app.pool, "kid", "kid", "student", 45).await;

    let purchase = PurchaseProduct::new(
        app.state.shop_repo.clone(),
        app.state.profile_repo.clone(),
        app.notifier.clone(),
    );
    let err = purchase.execute(Some(&ctx_for("kid")), "missing").await.unwrap_err();
    assert!(matches!(err, PurchaseProductError::ProductNotFound));
}

#[tokio::test]
async fn test_purchase_tabs_keep_newest_first() {
    let app = setup().await;
    seed_profile(&app.pool, "kid", "kid", "student", 0).await;
    seed_profile(&app.pool, "other", "other", "student", 0).await;
    let product = seed_product(&app.pool, "Stickers", 10, minutes_ago(60)).await;

    let oldest = seed_purchase(&app.pool, "kid", &product, "pending", minutes_ago(30)).await;
    let middle = seed_purchase(&app.pool, "kid", &product, "completed", minutes_ago(20)).await;
    let newest = seed_purchase(&app.pool, "kid", &product, "pending", minutes_ago(10)).await;
    seed_purchase(&app.pool, "other", &product, "pending", minutes_ago(5)).await;

    let list = ListPurchases::new(app.state.shop_repo.clone(), app.state.profile_repo.clone());
    let ctx = ctx_for("kid");

    let all = list.execute(Some(&ctx), PurchaseTab::All).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![newest.as_str(), middle.as_str(), oldest.as_str()]);
    assert_eq!(all[0].product_name(), "Stickers");

    let pending = list.execute(Some(&ctx), PurchaseTab::Pending).await.unwrap();
    let ids: Vec<&str> = pending.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![newest.as_str(), oldest.as_str()]);

    let cancelled = list.execute(Some(&ctx), PurchaseTab::Cancelled).await.unwrap();
    assert!(cancelled.is_empty());

    // Pending purchases feed the menu badge
    let profile = app.state.profile_repo.find_by_id("kid").await.unwrap();
    let menu = build_menu(Some(&ctx.user), profile.as_ref(), &all);
    assert_eq!(menu.find("My Purchases").and_then(|item| item.badge), Some(2));
}

#[tokio::test]
async fn test_purchase_history_needs_a_student() {
    let app = setup().await;
    seed_profile(&app.pool, "admin", "root", "admin", 0).await;

    let list = ListPurchases::new(app.state.shop_repo.clone(), app.state.profile_repo.clone());
    let err = list.execute(Some(&ctx_for("admin")), PurchaseTab::All).await.unwrap_err();
    assert!(matches!(err, ListPurchasesError::Access(ShopAccessError::NotStudent)));
}
