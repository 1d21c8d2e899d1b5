//! SQLite persistence for Expense HUD.

pub mod budgets;
pub mod categories;
pub mod db;
pub mod errors;
pub mod goals;
pub mod imports;
pub mod schema;
pub mod seed;
pub mod settings;
pub mod sync;
pub mod transactions;
mod utils;
pub mod wealth;

pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbPool, WriteHandle};
pub use errors::StorageError;
pub use seed::{seed_defaults, SeedSummary};
pub use sync::{DeleteQueueRepository, LocalSyncRepository};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use tempfile::tempdir;

    use crate::db::{create_pool, init, run_migrations, spawn_writer, DbPool, WriteHandle};

    pub fn setup_db() -> (Arc<DbPool>, WriteHandle) {
        let app_data = tempdir()
            .expect("tempdir")
            .keep()
            .to_string_lossy()
            .to_string();
        let db_path = init(&app_data).expect("init db");
        run_migrations(&db_path).expect("migrate db");
        let pool = create_pool(&db_path).expect("create pool");
        let writer = spawn_writer(pool.as_ref().clone());
        (pool, writer)
    }
}
