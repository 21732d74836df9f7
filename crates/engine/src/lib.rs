pub use analytics::{
    Aggregate, BudgetStatus, BudgetTier, OVER_BUDGET, PERCENT_CAP, SpendingSummary, UNCATEGORIZED,
    UNKNOWN_DATE, aggregate, evaluate,
};
pub use budgets::Budget;
pub use commands::{CreateExpenseCmd, ExpenseFields, UpdateExpenseCmd};
pub use edit_history::{EditEntry, FieldSnapshot, NO_CHANGES, UNKNOWN_EDITOR};
pub use error::EngineError;
pub use events::{ChangeAction, ChangeEvent};
pub use expenses::Expense;
pub use ops::{BudgetOverview, Engine, EngineBuilder};

mod amount;
mod analytics;
mod budgets;
mod commands;
mod edit_history;
mod error;
mod events;
mod expenses;
mod ops;

type ResultEngine<T> = Result<T, EngineError>;
