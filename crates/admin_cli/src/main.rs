use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::Engine;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "spesa_admin")]
#[command(about = "Admin utilities for Spesa (budgets, owner cleanup)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./spesa.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Budget(Budget),
    WipeOwner(WipeOwnerArgs),
}

#[derive(Args, Debug)]
struct Budget {
    #[command(subcommand)]
    command: BudgetCommand,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    Show(OwnerArgs),
    Set(BudgetSetArgs),
    Reset(OwnerArgs),
}

#[derive(Args, Debug)]
struct OwnerArgs {
    #[arg(long)]
    owner: String,
}

#[derive(Args, Debug)]
struct BudgetSetArgs {
    #[arg(long)]
    owner: String,
    /// Decimal amount; zero or less resets the budget.
    #[arg(long)]
    amount: String,
}

#[derive(Args, Debug)]
struct WipeOwnerArgs {
    #[arg(long)]
    owner: String,
    /// Deletes every expense, its edit history and the budget. No undo.
    #[arg(long)]
    yes: bool,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Budget(Budget {
            command: BudgetCommand::Show(args),
        }) => match engine.budget(&args.owner).await? {
            Some(budget) => println!(
                "budget for {}: {} (updated {})",
                args.owner, budget.amount, budget.updated_at
            ),
            None => println!("no budget configured for {}", args.owner),
        },
        Command::Budget(Budget {
            command: BudgetCommand::Set(args),
        }) => match engine.set_budget(&args.owner, &args.amount).await? {
            Some(budget) => println!("budget for {} set to {}", args.owner, budget.amount),
            None => println!("budget for {} reset", args.owner),
        },
        Command::Budget(Budget {
            command: BudgetCommand::Reset(args),
        }) => {
            engine.reset_budget(&args.owner).await?;
            println!("budget for {} reset", args.owner);
        }
        Command::WipeOwner(args) => {
            if !args.yes {
                eprintln!("refusing to wipe {} without --yes", args.owner);
                std::process::exit(1);
            }

            let expenses = engine.list_expenses(&args.owner).await?;
            let count = expenses.len();
            for expense in expenses {
                engine.delete_expense(expense.id, &args.owner).await?;
            }
            engine.reset_budget(&args.owner).await?;

            println!("wiped {}: {count} expenses removed", args.owner);
        }
    }

    Ok(())
}
