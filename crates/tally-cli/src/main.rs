//! Tally CLI - Small-business bookkeeping and ledger analysis
//!
//! Usage:
//!   tally init                          Initialize database
//!   tally transactions add -t revenue   Record a transaction
//!   tally dashboard                     Show the dashboard
//!   tally analyze --file ledger.csv     Analyze an uploaded table

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_transactions_list(&db, 20),
                Some(TransactionsAction::List { limit }) => {
                    commands::cmd_transactions_list(&db, limit)
                }
                Some(TransactionsAction::Add {
                    kind,
                    amount,
                    category,
                    date,
                    description,
                }) => commands::cmd_transactions_add(
                    &db,
                    &kind,
                    amount,
                    &category,
                    date.as_deref(),
                    description,
                )
                .map(|_| ()),
                Some(TransactionsAction::Update {
                    id,
                    kind,
                    amount,
                    category,
                    date,
                    description,
                }) => commands::cmd_transactions_update(
                    &db,
                    id,
                    commands::TransactionChanges {
                        kind,
                        amount,
                        category,
                        date,
                        description,
                    },
                ),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, id)
                }
            }
        }
        Commands::CashFlows { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_cash_flows_list(&db, 20),
                Some(CashFlowsAction::List { limit }) => commands::cmd_cash_flows_list(&db, limit),
                Some(CashFlowsAction::Add {
                    flow_type,
                    amount,
                    source,
                    date,
                    description,
                }) => commands::cmd_cash_flows_add(
                    &db,
                    &flow_type,
                    amount,
                    &source,
                    date.as_deref(),
                    description,
                )
                .map(|_| ()),
                Some(CashFlowsAction::Delete { id }) => commands::cmd_cash_flows_delete(&db, id),
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(BudgetsAction::List) => commands::cmd_budgets_list(&db),
                Some(BudgetsAction::Add {
                    category,
                    amount,
                    period,
                }) => commands::cmd_budgets_add(&db, &category, amount, period).map(|_| ()),
                Some(BudgetsAction::Delete { id }) => commands::cmd_budgets_delete(&db, id),
            }
        }
        Commands::Dashboard { as_of, json } => {
            let db = commands::open_db(&cli.db)?;
            let as_of = commands::resolve_as_of(as_of.as_deref())?;
            commands::cmd_dashboard(&db, as_of, json).await
        }
        Commands::Report { report } => {
            let db = commands::open_db(&cli.db)?;
            match report {
                ReportType::Summary { as_of } => {
                    let as_of = commands::resolve_as_of(as_of.as_deref())?;
                    commands::cmd_report_summary(&db, as_of)
                }
                ReportType::Categories { kind, top } => {
                    commands::cmd_report_categories(&db, kind.as_deref(), top)
                }
                ReportType::Trends => commands::cmd_report_trends(&db),
                ReportType::CashFlow => commands::cmd_report_cash_flow(&db),
            }
        }
        Commands::Analyze {
            file,
            api_url,
            timeout,
            fallback,
            check,
            json,
        } => {
            let settings = commands::load_settings(cli.config.as_deref(), api_url, timeout)?;
            commands::cmd_analyze(
                &file,
                &settings.analysis,
                commands::AnalyzeOptions {
                    fallback,
                    check,
                    json,
                },
            )
            .await
            .map(|_| ())
        }
        Commands::Categories => commands::cmd_categories(),
    }
}
