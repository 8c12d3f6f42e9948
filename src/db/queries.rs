// Raw SQL used by the health checks

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement, Value};

use crate::db::error::DbError;

/// Value the liveness query is expected to echo back
pub const LIVENESS_VALUE: &str = "test";

const LIVENESS_SQL: &str = "SELECT 'test' AS value";

const STALE_LOCKS_SQL: &str = "
    SELECT
        COUNT(*) AS count
    FROM pg_catalog.pg_locks blockedl
    INNER JOIN pg_stat_activity blockeda
        ON blockedl.pid = blockeda.pid
    WHERE
        (now() - blockeda.query_start) > $1::interval
";

const LONG_QUERIES_SQL: &str = "
    SELECT
        COUNT(*) AS count
    FROM pg_stat_activity
    WHERE
        (now() - pg_stat_activity.query_start) > $1::interval
";

/// Runs the round-trip query and returns the scalar the server echoed
pub async fn select_liveness_value(conn: &DatabaseConnection) -> Result<String, DbError> {
    let row = conn
        .query_one(Statement::from_string(DbBackend::Postgres, LIVENESS_SQL.to_owned()))
        .await?
        .ok_or(DbError::NoRows)?;

    Ok(row.try_get::<String>("", "value")?)
}

/// Counts locks whose holding backend started its query more than `seconds` ago
pub async fn count_stale_locks(conn: &DatabaseConnection, seconds: u32) -> Result<i64, DbError> {
    count_older_than(conn, STALE_LOCKS_SQL, seconds).await
}

/// Counts backends whose current query started more than `seconds` ago
pub async fn count_long_queries(conn: &DatabaseConnection, seconds: u32) -> Result<i64, DbError> {
    count_older_than(conn, LONG_QUERIES_SQL, seconds).await
}

async fn count_older_than(
    conn: &DatabaseConnection,
    sql: &str,
    seconds: u32,
) -> Result<i64, DbError> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [interval_param(seconds)],
        ))
        .await?
        .ok_or(DbError::NoRows)?;

    Ok(row.try_get::<i64>("", "count")?)
}

/// Interval literal bound to `$1`, cast server-side
fn interval_param(seconds: u32) -> Value {
    Value::from(format!("{} seconds", seconds))
}
