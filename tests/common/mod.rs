//! Shared harness: use cases over in-memory SQLite, the broadcast hub and
//! recording navigator/notifier.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use brainboost_client::domain::entities::{
    AuthUser, ForumCategory, NewPurchase, NewQuizParticipant, NewQuizSession, Product,
    ProductDraft, PurchaseRecord, Question, Quiz, QuizParticipant, QuizSession, UserMetadata,
};
use brainboost_client::domain::repositories::{
    ForumRepository, QuizRepository, RepositoryError, ShopRepository,
};
use brainboost_client::domain::services::{RecordingNavigator, RecordingNotifier};
use brainboost_client::domain::value_objects::{AccessCode, AuthContext};
use brainboost_client::infrastructure::app_state::AppState;
use brainboost_client::infrastructure::auth::MockAuthProvider;
use brainboost_client::infrastructure::database::connect_in_memory;
use brainboost_client::infrastructure::realtime::BroadcastHub;
use brainboost_client::infrastructure::storage::MemoryStorage;

pub struct TestApp {
    pub state: AppState,
    pub pool: SqlitePool,
    pub hub: Arc<BroadcastHub>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub storage: Arc<MemoryStorage>,
    pub auth: Arc<MockAuthProvider>,
}

pub async fn setup() -> TestApp {
    let pool = connect_in_memory().await.expect("Failed to open test database");
    let hub = Arc::new(BroadcastHub::default());
    let navigator = Arc::new(RecordingNavigator::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let storage = Arc::new(MemoryStorage::new());
    let auth = Arc::new(MockAuthProvider::new());

    let mut state = AppState::local(pool.clone(), hub.clone(), navigator.clone(), notifier.clone());
    state.storage = storage.clone();
    state.auth = auth.clone();

    TestApp {
        state,
        pool,
        hub,
        navigator,
        notifier,
        storage,
        auth,
    }
}

pub fn ctx_for(user_id: &str) -> AuthContext {
    let user = AuthUser {
        id: user_id.to_string(),
        email: Some(format!("{}@school.test", user_id)),
        user_metadata: UserMetadata::default(),
    };
    AuthContext::new(user, format!("token-{}", user_id))
}

/// `minutes` before now
pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

// ========== Seeding ==========

pub async fn seed_profile(pool: &SqlitePool, id: &str, username: &str, role: &str, points: i64) {
    sqlx::query("INSERT INTO profiles (id, username, role, points) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(username)
        .bind(role)
        .bind(points)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn seed_quiz(pool: &SqlitePool, id: &str, access_code: &str, status: &str, created_by: &str) {
    sqlx::query(
        "INSERT INTO quizzes (id, title, description, access_code, status, created_by) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(format!("Quiz {}", id))
    .bind(Option::<String>::None)
    .bind(access_code)
    .bind(status)
    .bind(created_by)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_question(pool: &SqlitePool, quiz_id: &str, order_number: i32, time_limit: i32) {
    sqlx::query("INSERT INTO questions (id, quiz_id, order_number, time_limit) VALUES (?, ?, ?, ?)")
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(quiz_id)
        .bind(order_number)
        .bind(time_limit)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn seed_session(pool: &SqlitePool, quiz_id: &str, status: &str, created_at: DateTime<Utc>) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO quiz_sessions (id, quiz_id, created_by, status, current_question_index,
                                   time_remaining, created_at, started_at, ended_at)
        VALUES (?, ?, NULL, ?, 0, 30, ?, ?, NULL)
        "#,
    )
    .bind(&id)
    .bind(quiz_id)
    .bind(status)
    .bind(created_at)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
    id
}

pub async fn seed_participant(pool: &SqlitePool, session_id: &str, quiz_id: &str, user_id: &str) {
    sqlx::query(
        "INSERT INTO quiz_participants (id, session_id, quiz_id, user_id, status, joined_at) VALUES (?, ?, ?, ?, 'joined', ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(session_id)
    .bind(quiz_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_product(pool: &SqlitePool, name: &str, points_required: i64, created_at: DateTime<Utc>) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO products (id, name, description, points_required, image_url, created_at) VALUES (?, ?, '', ?, '', ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(points_required)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
    id
}

pub async fn seed_purchase(
    pool: &SqlitePool,
    user_id: &str,
    product_id: &str,
    status: &str,
    created_at: DateTime<Utc>,
) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO purchases (id, user_id, product_id, status, points_spent, created_at) VALUES (?, ?, ?, ?, 10, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(product_id)
    .bind(status)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
    id
}

pub async fn seed_category(pool: &SqlitePool, name: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO forum_categories (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
    id
}

pub async fn seed_post(pool: &SqlitePool, category_id: &str, title: &str) {
    sqlx::query("INSERT INTO forum_posts (id, category_id, title) VALUES (?, ?, ?)")
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(category_id)
        .bind(title)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    use sqlx::Row;

    let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap();
    row.get("n")
}

// ========== Instrumented repositories ==========

/// Counts writes and can hide existing participations from the pre-check
pub struct InstrumentedQuizRepository {
    inner: Arc<dyn QuizRepository>,
    hide_participations: AtomicBool,
    pub sessions_created: AtomicUsize,
    pub participants_added: AtomicUsize,
}

impl InstrumentedQuizRepository {
    pub fn new(inner: Arc<dyn QuizRepository>) -> Self {
        Self {
            inner,
            hide_participations: AtomicBool::new(false),
            sessions_created: AtomicUsize::new(0),
            participants_added: AtomicUsize::new(0),
        }
    }

    pub fn hide_participations(&self) {
        self.hide_participations.store(true, Ordering::SeqCst);
    }

    pub fn sessions_created(&self) -> usize {
        self.sessions_created.load(Ordering::SeqCst)
    }

    pub fn participants_added(&self) -> usize {
        self.participants_added.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuizRepository for InstrumentedQuizRepository {
    async fn find_by_access_code(&self, code: &AccessCode) -> Result<Option<Quiz>, RepositoryError> {
        self.inner.find_by_access_code(code).await
    }

    async fn list_questions(&self, quiz_id: &str) -> Result<Vec<Question>, RepositoryError> {
        self.inner.list_questions(quiz_id).await
    }

    async fn latest_session(&self, quiz_id: &str) -> Result<Option<QuizSession>, RepositoryError> {
        self.inner.latest_session(quiz_id).await
    }

    async fn create_session(&self, session: &NewQuizSession) -> Result<QuizSession, RepositoryError> {
        self.sessions_created.fetch_add(1, Ordering::SeqCst);
        self.inner.create_session(session).await
    }

    async fn find_participations(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> Result<Vec<QuizParticipant>, RepositoryError> {
        if self.hide_participations.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        self.inner.find_participations(quiz_id, user_id).await
    }

    async fn add_participant(
        &self,
        participant: &NewQuizParticipant,
    ) -> Result<QuizParticipant, RepositoryError> {
        self.participants_added.fetch_add(1, Ordering::SeqCst);
        self.inner.add_participant(participant).await
    }
}

/// Shop repository whose purchase cleanup or product writes can be made to fail
pub struct FlakyShopRepository {
    inner: Arc<dyn ShopRepository>,
    fail_purchase_cleanup: AtomicBool,
    fail_product_writes: AtomicBool,
}

impl FlakyShopRepository {
    pub fn new(inner: Arc<dyn ShopRepository>) -> Self {
        Self {
            inner,
            fail_purchase_cleanup: AtomicBool::new(false),
            fail_product_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_purchase_cleanup(&self) {
        self.fail_purchase_cleanup.store(true, Ordering::SeqCst);
    }

    pub fn fail_product_writes(&self) {
        self.fail_product_writes.store(true, Ordering::SeqCst);
    }

    fn product_write(&self) -> Result<(), RepositoryError> {
        if self.fail_product_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(String::new()));
        }
        Ok(())
    }
}

#[async_trait]
impl ShopRepository for FlakyShopRepository {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        self.inner.list_products().await
    }

    async fn find_product(&self, id: &str) -> Result<Option<Product>, RepositoryError> {
        self.inner.find_product(id).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<(), RepositoryError> {
        self.product_write()?;
        self.inner.create_product(draft).await
    }

    async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<(), RepositoryError> {
        self.product_write()?;
        self.inner.update_product(id, draft).await
    }

    async fn delete_product(&self, id: &str) -> Result<(), RepositoryError> {
        self.product_write()?;
        self.inner.delete_product(id).await
    }

    async fn list_purchases(&self, user_id: &str) -> Result<Vec<PurchaseRecord>, RepositoryError> {
        self.inner.list_purchases(user_id).await
    }

    async fn create_purchase(&self, purchase: &NewPurchase) -> Result<PurchaseRecord, RepositoryError> {
        self.inner.create_purchase(purchase).await
    }

    async fn delete_purchases_for_product(&self, product_id: &str) -> Result<(), RepositoryError> {
        if self.fail_purchase_cleanup.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database("permission denied for table purchases".into()));
        }
        self.inner.delete_purchases_for_product(product_id).await
    }
}

/// Forum repository whose post cleanup fails
pub struct FailingPostsForumRepository {
    inner: Arc<dyn ForumRepository>,
}

impl FailingPostsForumRepository {
    pub fn new(inner: Arc<dyn ForumRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ForumRepository for FailingPostsForumRepository {
    async fn list_categories(&self) -> Result<Vec<ForumCategory>, RepositoryError> {
        self.inner.list_categories().await
    }

    async fn create_category(&self, name: &str) -> Result<(), RepositoryError> {
        self.inner.create_category(name).await
    }

    async fn rename_category(&self, id: &str, name: &str) -> Result<(), RepositoryError> {
        self.inner.rename_category(id, name).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), RepositoryError> {
        self.inner.delete_category(id).await
    }

    async fn delete_posts_in_category(&self, _category_id: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Database("permission denied for table forum_posts".into()))
    }
}
