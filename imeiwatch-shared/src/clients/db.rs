use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<PgConnection>>;

pub fn create_pool(database_url: &str, max_size: u32) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .min_idle(Some(1))
        .test_on_check_out(true)
        .build(manager)?;

    tracing::info!(max_size, "database connection pool created");
    Ok(pool)
}

/// Run an idempotent DDL script (`CREATE ... IF NOT EXISTS`) on one pooled connection.
pub fn ensure_schema(pool: &DbPool, ddl: &str) -> anyhow::Result<()> {
    let mut conn = pool.get()?;
    conn.batch_execute(ddl)?;
    tracing::info!("database schema ensured");
    Ok(())
}
