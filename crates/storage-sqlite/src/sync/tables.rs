//! Typed table access for every synced entity.
//!
//! Each table gets an [`EntityTable`] implementation generated by
//! `entity_table!`; [`with_table!`] selects the implementation for a runtime
//! [`SyncEntity`].

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use expensehud_core::budgets::Budget;
use expensehud_core::categories::Category;
use expensehud_core::errors::Result;
use expensehud_core::goals::Goal;
use expensehud_core::imports::ImportBatch;
use expensehud_core::settings::Settings;
use expensehud_core::sync::{SyncRecord, SyncStatus};
use expensehud_core::transactions::Transaction;
use expensehud_core::wealth::{Asset, Liability, NetWorthSnapshot, Property};

use crate::budgets::BudgetDB;
use crate::categories::CategoryDB;
use crate::errors::StorageError;
use crate::goals::GoalDB;
use crate::imports::ImportBatchDB;
use crate::settings::SettingsDB;
use crate::transactions::TransactionDB;
use crate::wealth::{AssetDB, LiabilityDB, NetWorthSnapshotDB, PropertyDB};

pub(crate) trait EntityTable {
    type Model: SyncRecord;

    fn load_all(conn: &mut SqliteConnection) -> Result<Vec<Self::Model>>;

    fn load_pending(conn: &mut SqliteConnection) -> Result<Vec<Self::Model>>;

    fn find(conn: &mut SqliteConnection, local_id: i64) -> Result<Option<Self::Model>>;

    fn find_by_remote_id(
        conn: &mut SqliteConnection,
        remote_id: &str,
    ) -> Result<Option<Self::Model>>;

    fn count(conn: &mut SqliteConnection) -> Result<i64>;

    /// Inserts `model` under a new local id and returns the stored row.
    fn insert(conn: &mut SqliteConnection, model: &Self::Model) -> Result<Self::Model>;

    /// Writes every column of `model` onto the row with the same id.
    fn replace(conn: &mut SqliteConnection, model: &Self::Model) -> Result<usize>;

    /// Updates only the sync metadata columns; `updated_at` is left alone.
    fn set_sync_meta(
        conn: &mut SqliteConnection,
        local_id: i64,
        remote_id: Option<&str>,
        status: SyncStatus,
    ) -> Result<usize>;

    fn delete(conn: &mut SqliteConnection, local_id: i64) -> Result<usize>;
}

macro_rules! entity_table {
    ($name:ident, $table:ident, $model:ty, $row:ty) => {
        pub(crate) struct $name;

        impl EntityTable for $name {
            type Model = $model;

            fn load_all(conn: &mut SqliteConnection) -> Result<Vec<$model>> {
                use crate::schema::$table::dsl;
                dsl::$table
                    .order(dsl::id.asc())
                    .select(<$row>::as_select())
                    .load::<$row>(conn)
                    .map_err(StorageError::from)?
                    .into_iter()
                    .map(<$model>::try_from)
                    .collect()
            }

            fn load_pending(conn: &mut SqliteConnection) -> Result<Vec<$model>> {
                use crate::schema::$table::dsl;
                dsl::$table
                    .filter(dsl::sync_status.eq(SyncStatus::Pending.as_str()))
                    .order(dsl::id.asc())
                    .select(<$row>::as_select())
                    .load::<$row>(conn)
                    .map_err(StorageError::from)?
                    .into_iter()
                    .map(<$model>::try_from)
                    .collect()
            }

            fn find(conn: &mut SqliteConnection, local_id: i64) -> Result<Option<$model>> {
                use crate::schema::$table::dsl;
                dsl::$table
                    .find(local_id)
                    .select(<$row>::as_select())
                    .first::<$row>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .map(<$model>::try_from)
                    .transpose()
            }

            fn find_by_remote_id(
                conn: &mut SqliteConnection,
                remote_id: &str,
            ) -> Result<Option<$model>> {
                use crate::schema::$table::dsl;
                dsl::$table
                    .filter(dsl::remote_id.eq(remote_id))
                    .select(<$row>::as_select())
                    .first::<$row>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .map(<$model>::try_from)
                    .transpose()
            }

            fn count(conn: &mut SqliteConnection) -> Result<i64> {
                use crate::schema::$table::dsl;
                Ok(dsl::$table
                    .count()
                    .get_result::<i64>(conn)
                    .map_err(StorageError::from)?)
            }

            fn insert(conn: &mut SqliteConnection, model: &$model) -> Result<$model> {
                use crate::schema::$table::dsl;
                let row = <$row>::try_from(model)?;
                let saved = diesel::insert_into(dsl::$table)
                    .values(&row)
                    .returning(<$row>::as_returning())
                    .get_result::<$row>(conn)
                    .map_err(StorageError::from)?;
                <$model>::try_from(saved)
            }

            fn replace(conn: &mut SqliteConnection, model: &$model) -> Result<usize> {
                use crate::schema::$table::dsl;
                let row = <$row>::try_from(model)?;
                Ok(diesel::update(dsl::$table.find(model.id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            }

            fn set_sync_meta(
                conn: &mut SqliteConnection,
                local_id: i64,
                remote_id: Option<&str>,
                status: SyncStatus,
            ) -> Result<usize> {
                use crate::schema::$table::dsl;
                Ok(diesel::update(dsl::$table.find(local_id))
                    .set((
                        dsl::remote_id.eq(remote_id),
                        dsl::sync_status.eq(status.as_str()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            }

            fn delete(conn: &mut SqliteConnection, local_id: i64) -> Result<usize> {
                use crate::schema::$table::dsl;
                Ok(diesel::delete(dsl::$table.find(local_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            }
        }
    };
}

entity_table!(CategoriesTable, categories, Category, CategoryDB);
entity_table!(ImportBatchesTable, import_batches, ImportBatch, ImportBatchDB);
entity_table!(PropertiesTable, properties, Property, PropertyDB);
entity_table!(TransactionsTable, transactions, Transaction, TransactionDB);
entity_table!(BudgetsTable, budgets, Budget, BudgetDB);
entity_table!(SettingsTable, settings, Settings, SettingsDB);
entity_table!(GoalsTable, goals, Goal, GoalDB);
entity_table!(AssetsTable, assets, Asset, AssetDB);
entity_table!(LiabilitiesTable, liabilities, Liability, LiabilityDB);
entity_table!(
    NetWorthSnapshotsTable,
    net_worth_snapshots,
    NetWorthSnapshot,
    NetWorthSnapshotDB
);

/// Evaluates `$body` with `$table` bound to the [`EntityTable`] of `$entity`.
macro_rules! with_table {
    ($entity:expr, $table:ident => $body:expr) => {
        match $entity {
            expensehud_core::sync::SyncEntity::Category => {
                type $table = $crate::sync::tables::CategoriesTable;
                $body
            }
            expensehud_core::sync::SyncEntity::ImportBatch => {
                type $table = $crate::sync::tables::ImportBatchesTable;
                $body
            }
            expensehud_core::sync::SyncEntity::Property => {
                type $table = $crate::sync::tables::PropertiesTable;
                $body
            }
            expensehud_core::sync::SyncEntity::Transaction => {
                type $table = $crate::sync::tables::TransactionsTable;
                $body
            }
            expensehud_core::sync::SyncEntity::Budget => {
                type $table = $crate::sync::tables::BudgetsTable;
                $body
            }
            expensehud_core::sync::SyncEntity::Settings => {
                type $table = $crate::sync::tables::SettingsTable;
                $body
            }
            expensehud_core::sync::SyncEntity::Goal => {
                type $table = $crate::sync::tables::GoalsTable;
                $body
            }
            expensehud_core::sync::SyncEntity::Asset => {
                type $table = $crate::sync::tables::AssetsTable;
                $body
            }
            expensehud_core::sync::SyncEntity::Liability => {
                type $table = $crate::sync::tables::LiabilitiesTable;
                $body
            }
            expensehud_core::sync::SyncEntity::NetWorthSnapshot => {
                type $table = $crate::sync::tables::NetWorthSnapshotsTable;
                $body
            }
        }
    };
}

pub(crate) use with_table;
