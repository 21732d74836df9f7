pub use sea_orm_migration::prelude::*;

mod m20260703_120000_expenses;
mod m20260710_090000_budgets;
mod m20260801_100000_edit_history;
mod m20260812_000001_normalize_legacy;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260703_120000_expenses::Migration),
            Box::new(m20260710_090000_budgets::Migration),
            Box::new(m20260801_100000_edit_history::Migration),
            Box::new(m20260812_000001_normalize_legacy::Migration),
        ]
    }
}
