use sqlx::SqlitePool;

/// Tables mirror the hosted Postgres schema closely enough for the
/// repositories to behave the same; only the columns the client reads exist.
const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS profiles (
        id TEXT PRIMARY KEY NOT NULL,
        username TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL DEFAULT 'student',
        points INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS quizzes (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        access_code TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'draft',
        created_by TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS questions (
        id TEXT PRIMARY KEY NOT NULL,
        quiz_id TEXT NOT NULL REFERENCES quizzes(id),
        order_number INTEGER NOT NULL,
        time_limit INTEGER NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS quiz_sessions (
        id TEXT PRIMARY KEY NOT NULL,
        quiz_id TEXT NOT NULL REFERENCES quizzes(id),
        created_by TEXT,
        status TEXT NOT NULL,
        current_question_index INTEGER NOT NULL DEFAULT 0,
        time_remaining INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        started_at TEXT,
        ended_at TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS quiz_participants (
        id TEXT PRIMARY KEY NOT NULL,
        session_id TEXT NOT NULL REFERENCES quiz_sessions(id),
        quiz_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        status TEXT NOT NULL,
        joined_at TEXT NOT NULL,
        UNIQUE (quiz_id, user_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        points_required INTEGER NOT NULL,
        image_url TEXT,
        created_at TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS purchases (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL,
        product_id TEXT NOT NULL REFERENCES products(id),
        status TEXT NOT NULL DEFAULT 'pending',
        points_spent INTEGER NOT NULL,
        created_at TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS forum_categories (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS forum_posts (
        id TEXT PRIMARY KEY NOT NULL,
        category_id TEXT NOT NULL REFERENCES forum_categories(id),
        title TEXT NOT NULL
    )"#,
    r#"CREATE VIEW IF NOT EXISTS quizzes_with_creator AS
        SELECT q.id, q.title, q.description, q.access_code, q.status, q.created_by,
               lower(q.access_code) AS access_code_lower,
               p.username AS creator_username,
               (SELECT COUNT(*) FROM questions qu WHERE qu.quiz_id = q.id) AS question_count
        FROM quizzes q
        LEFT JOIN profiles p ON p.id = q.created_by"#,
];

/// Create every table and view if missing
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("Database schema ready ({} statements)", STATEMENTS.len());
    Ok(())
}
