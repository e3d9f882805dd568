use std::time::Duration;

use anyhow::{Context, Result};
use diesel::{
    Connection, PgConnection,
    connection::CacheSize,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use tracing::info;

use crate::config::config_model::Database;

pub type PgPoolSquad = Pool<ConnectionManager<PgConnection>>;

/// Poolers in transaction mode reject named prepared statements.
#[derive(Debug)]
struct NoStatementCache;

impl CustomizeConnection<PgConnection, R2d2Error> for NoStatementCache {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        Ok(())
    }
}

pub fn establish_connection(database: &Database) -> Result<PgPoolSquad> {
    let manager = ConnectionManager::<PgConnection>::new(&database.url);
    let pool = Pool::builder()
        .max_size(database.max_connections)
        .connection_timeout(Duration::from_secs(database.connect_timeout_secs))
        .connection_customizer(Box::new(NoStatementCache))
        .build(manager)
        .context("failed to build postgres pool")?;

    info!(
        max_connections = database.max_connections,
        "postgres: pool ready"
    );
    Ok(pool)
}
