use sqlx::PgPool;

/// Handle that every SQL command processor is implemented on.
///
/// Connections are checked out of the pool per statement; nothing holds a
/// connection across an await point belonging to another invocation.
#[derive(Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
