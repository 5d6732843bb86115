use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Result;
use std::collections::{BTreeSet, HashMap};

use crate::ads::Submission;
use crate::core::error::{AppError, AppResult};
use crate::storage::migrations::run_migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and applies the
/// embedded migrations on the first connection.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Example
///
/// ```no_run
/// use adboard::storage::db;
///
/// let pool = db::create_pool("adboard.sqlite")?;
/// # Ok::<(), adboard::core::error::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder()
        .max_size(10) // Maximum 10 connections in the pool
        .build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn).map_err(AppError::Anyhow)?;

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is automatically returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Возвращает множество ID всех администраторов.
pub fn list_admins(conn: &DbConnection) -> Result<BTreeSet<i64>> {
    let mut stmt = conn.prepare("SELECT user_id FROM admins")?;
    let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;

    let mut admins = BTreeSet::new();
    for row in rows {
        admins.insert(row?);
    }
    Ok(admins)
}

/// Добавляет администратора. Повторное добавление ничего не меняет.
pub fn add_admin(conn: &DbConnection, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO admins (user_id) VALUES (?1)",
        rusqlite::params![user_id],
    )?;
    Ok(())
}

/// Удаляет администратора.
///
/// # Returns
///
/// `true`, если запись существовала и была удалена.
pub fn remove_admin(conn: &DbConnection, user_id: i64) -> Result<bool> {
    let affected = conn.execute("DELETE FROM admins WHERE user_id = ?1", rusqlite::params![user_id])?;
    Ok(affected > 0)
}

/// Возвращает все настроенные каналы: тип канала ("male", "female", "hidden") → chat ID.
pub fn get_channels(conn: &DbConnection) -> Result<HashMap<String, i64>> {
    let mut stmt = conn.prepare("SELECT channel_type, channel_id FROM channels")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

    let mut channels = HashMap::new();
    for row in rows {
        let (channel_type, channel_id) = row?;
        channels.insert(channel_type, channel_id);
    }
    Ok(channels)
}

/// Сохраняет (или заменяет) канал заданного типа.
pub fn set_channel(conn: &DbConnection, channel_type: &str, channel_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO channels (channel_type, channel_id) VALUES (?1, ?2)
         ON CONFLICT(channel_type) DO UPDATE SET channel_id = excluded.channel_id",
        rusqlite::params![channel_type, channel_id],
    )?;
    Ok(())
}

/// Возвращает все настройки в виде ключ → значение.
pub fn get_settings(conn: &DbConnection) -> Result<HashMap<String, String>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

    let mut settings = HashMap::new();
    for row in rows {
        let (key, value) = row?;
        settings.insert(key, value);
    }
    Ok(settings)
}

/// Сохраняет настройку (upsert по ключу).
pub fn set_setting(conn: &DbConnection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

/// Сохраняет опубликованное объявление.
///
/// Запись хранится как JSON-объект со всеми полями анкеты и полем `code`.
/// Опубликованные объявления не перезаписываются: повторный код даёт ошибку.
pub fn save_ad(conn: &DbConnection, code: &str, ad: &Submission) -> AppResult<()> {
    let data = serde_json::to_string(ad)?;
    conn.execute(
        "INSERT INTO ads (code, data) VALUES (?1, ?2)",
        rusqlite::params![code, data],
    )?;
    Ok(())
}

/// Проверяет, занят ли код опубликованным объявлением.
pub fn ad_exists(conn: &DbConnection, code: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM ads WHERE code = ?1)",
        rusqlite::params![code],
        |row| row.get(0),
    )
}

/// Получает объявление по коду.
///
/// # Returns
///
/// `Ok(Some(..))` если объявление найдено, `Ok(None)` если нет.
pub fn get_ad(conn: &DbConnection, code: &str) -> AppResult<Option<Submission>> {
    let mut stmt = conn.prepare("SELECT data FROM ads WHERE code = ?1")?;
    let mut rows = stmt.query(rusqlite::params![code])?;

    if let Some(row) = rows.next()? {
        let data: String = row.get(0)?;
        Ok(Some(serde_json::from_str(&data)?))
    } else {
        Ok(None)
    }
}
