use crate::db::{DbPool, OrmConn};
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    /// None when S3 is not configured; uploads then fail with a storage error.
    pub storage: Option<Storage>,
}
