//! Default rows for a fresh database.

use log::info;

use expensehud_core::categories::default_categories;
use expensehud_core::errors::Result;
use expensehud_core::settings::Settings;

use crate::db::WriteHandle;
use crate::sync::now_millis;
use crate::sync::tables::{CategoriesTable, EntityTable, SettingsTable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub settings: usize,
}

/// Inserts the default categories and settings row when their tables are
/// empty. Rows are stored as `seeded`: the first sync that can read the
/// remote tables either matches them to another device's defaults or marks
/// them for push.
pub async fn seed_defaults(writer: &WriteHandle) -> Result<SeedSummary> {
    let summary = writer
        .exec(|conn| {
            let now = now_millis();
            let mut summary = SeedSummary::default();
            if CategoriesTable::count(conn)? == 0 {
                for category in default_categories(now) {
                    CategoriesTable::insert(conn, &category)?;
                    summary.categories += 1;
                }
            }
            if SettingsTable::count(conn)? == 0 {
                SettingsTable::insert(conn, &Settings::defaults(now))?;
                summary.settings = 1;
            }
            Ok(summary)
        })
        .await?;

    if summary != SeedSummary::default() {
        info!(
            "Seeded {} default categories and {} settings row(s)",
            summary.categories, summary.settings
        );
    }
    Ok(summary)
}
