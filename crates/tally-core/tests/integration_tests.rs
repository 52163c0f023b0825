//! Integration tests for tally-core
//!
//! These tests exercise the full record → dashboard and upload → analysis workflows.

use std::time::Duration;

use axum::{routing::post, Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tally_core::{
    analysis::{quick_analysis, AnalysisResult, Analyzer, RemoteAnalyzer},
    config::AnalysisSettings,
    db::Database,
    ingest::read_rows,
    load_dashboard,
    models::{FlowType, NewCashFlowEntry, NewTransaction, TransactionType},
    Money,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Ledger covering a year boundary, with an uncategorized expense
fn seed(db: &Database) {
    let txs = [
        (TransactionType::Revenue, "Product Sales", "1200", d(2023, 12, 5)),
        (TransactionType::Expenditure, "Rent", "800", d(2023, 12, 1)),
        (TransactionType::Revenue, "Service Revenue", "300", d(2024, 1, 10)),
        (TransactionType::Expenditure, "Marketing", "150", d(2024, 1, 12)),
        (TransactionType::Expenditure, "", "50", d(2024, 1, 20)),
        (TransactionType::Expenditure, "Rent", "800", d(2024, 1, 1)),
    ];
    for (kind, category, amount, date) in txs {
        db.insert_transaction(&NewTransaction {
            kind,
            category: category.to_string(),
            description: None,
            amount: amount.parse().unwrap(),
            date,
        })
        .unwrap();
    }

    let flows = [
        (FlowType::Inflow, "Customer Payments", "1500"),
        (FlowType::Outflow, "Payroll", "900"),
        (FlowType::Outflow, "Tax Payments", "200"),
    ];
    for (flow_type, source, amount) in flows {
        db.insert_cash_flow(&NewCashFlowEntry {
            flow_type,
            source: source.to_string(),
            description: None,
            amount: amount.parse().unwrap(),
            date: d(2024, 1, 15),
        })
        .unwrap();
    }
}

// =============================================================================
// Dashboard Integration Tests
// =============================================================================

#[tokio::test]
async fn test_full_dashboard_workflow() {
    let db = Database::in_memory().expect("Failed to create database");
    seed(&db);

    let dashboard = load_dashboard(&db, d(2024, 1, 31))
        .await
        .expect("Dashboard load failed");

    // Profit and loss
    assert_eq!(dashboard.summary.total_revenue, Money::from_units(1500));
    assert_eq!(dashboard.summary.total_expenditure, Money::from_units(1800));
    assert_eq!(dashboard.summary.total_profit, Money::from_units(-300));
    assert_eq!(dashboard.summary.monthly_revenue, Money::from_units(300));
    assert_eq!(dashboard.summary.monthly_expenditure, Money::from_units(1000));

    // Cash position
    assert_eq!(dashboard.cash_flow_summary.total_inflow, Money::from_units(1500));
    assert_eq!(dashboard.cash_flow_summary.total_outflow, Money::from_units(1100));
    assert_eq!(dashboard.cash_flow_summary.net_cash_flow, Money::from_units(400));

    // Expense breakdown: Rent summed, blank label grouped as Uncategorized
    let rent = dashboard
        .expense_categories
        .iter()
        .find(|c| c.name == "Rent")
        .unwrap();
    assert_eq!(rent.total, Money::from_units(1600));
    assert!(dashboard
        .expense_categories
        .iter()
        .any(|c| c.name == "Uncategorized" && c.total == Money::from_units(50)));
    assert!(!dashboard
        .expense_categories
        .iter()
        .any(|c| c.name == "Product Sales"));

    // Trends stay chronological across the year boundary
    let months: Vec<_> = dashboard
        .monthly_trends
        .iter()
        .map(|b| b.month.as_str())
        .collect();
    assert_eq!(months, vec!["Dec 2023", "Jan 2024"]);
    assert_eq!(dashboard.monthly_trends[0].revenue, Money::from_units(1200));
    assert_eq!(dashboard.monthly_trends[1].expenses, Money::from_units(1000));

    // JSON shape consumed by front ends
    let value = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(value["summary"]["totalProfit"], -300.0);
    assert_eq!(value["cashFlowSummary"]["netCashFlow"], 400.0);
    assert_eq!(value["transactions"][0]["type"], "expenditure");
}

#[test]
fn test_category_totals_reconcile_with_summary() {
    let db = Database::in_memory().unwrap();
    let amounts = [
        (TransactionType::Revenue, "B", "55.29"),
        (TransactionType::Revenue, "A", "34.57"),
        (TransactionType::Expenditure, "Fees", "0.10"),
        (TransactionType::Revenue, "B", "67.68"),
        (TransactionType::Expenditure, "Fees", "0.20"),
        (TransactionType::Revenue, "A", "76.09"),
        (TransactionType::Expenditure, "Travel", "19.99"),
    ];
    for (i, (kind, category, amount)) in amounts.into_iter().enumerate() {
        db.insert_transaction(&NewTransaction {
            kind,
            category: category.to_string(),
            description: None,
            amount: amount.parse().unwrap(),
            date: d(2024, 3, 1 + i as u32),
        })
        .unwrap();
    }

    let transactions = db.list_transactions().unwrap();
    let summary = tally_core::summarize_transactions(&transactions, d(2024, 3, 31));
    let grouped: Money = tally_core::totals_by_category(&transactions)
        .iter()
        .map(|c| c.total)
        .sum();

    assert_eq!(grouped, summary.total_revenue + summary.total_expenditure);
    assert_eq!(summary.total_revenue, Money::from_cents(23_363));
    assert_eq!(summary.total_expenditure, Money::from_cents(2_029));
    assert_eq!(summary.total_profit, Money::from_cents(21_334));
}

#[tokio::test]
async fn test_dashboard_after_deletion() {
    let db = Database::in_memory().unwrap();
    seed(&db);

    let newest = db.list_transactions().unwrap()[0].clone();
    db.delete_transaction(newest.id).unwrap();

    let dashboard = load_dashboard(&db, d(2024, 1, 31)).await.unwrap();
    assert_eq!(dashboard.transactions.len(), 5);
    assert!(dashboard.transactions.iter().all(|t| t.id != newest.id));
}

// =============================================================================
// Ad-hoc Analysis Integration Tests
// =============================================================================

const UPLOAD: &str = "Date,Category,Amount\n\
2024-01-02,Sales,\"$1,200.00\"\n\
2024-01-03,Rent,-800\n\
2024-01-04,,-25.50\n\
2024-01-05,Sales,garbage\n";

#[test]
fn test_csv_upload_quick_analysis() {
    let rows = read_rows(UPLOAD.as_bytes()).unwrap();
    assert_eq!(rows.len(), 4);

    let analysis = quick_analysis(&rows);
    assert_eq!(analysis.inflow, Money::from_units(1200));
    assert_eq!(analysis.outflow, Money::from_cents(82_550));
    assert_eq!(analysis.net, Money::from_cents(37_450));

    let names: Vec<_> = analysis
        .top_categories
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Sales", "Rent", "Uncategorized"]);
}

async fn start_echo_server() -> (String, tokio::sync::oneshot::Sender<()>) {
    let app = Router::new().route(
        "/analyze",
        post(|Json(body): Json<Value>| async move {
            let rows = body["rows"].as_array().map(|r| r.len()).unwrap_or(0);
            Json(json!({"rows": rows, "summary": "remote"}))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                rx.await.ok();
            })
            .await
            .unwrap();
    });
    (format!("http://{}/analyze", addr), tx)
}

#[tokio::test]
async fn test_csv_upload_remote_analysis() {
    let (url, _shutdown) = start_echo_server().await;
    let settings = AnalysisSettings {
        url: Some(url),
        timeout: Duration::from_secs(5),
        retries: 1,
    };
    let analyzer = Analyzer::from_settings(&settings).unwrap();

    let rows = read_rows(UPLOAD.as_bytes()).unwrap();
    let result = analyzer.analyze(&rows).await.unwrap();

    assert_eq!(
        result,
        AnalysisResult::Api(json!({"rows": 4, "summary": "remote"}))
    );
}

#[tokio::test]
async fn test_remote_failure_falls_back_to_local() {
    let (url, shutdown) = start_echo_server().await;
    // Unknown route on a live server answers 404
    let remote = RemoteAnalyzer::new(&url.replace("/analyze", "/missing"), Duration::from_secs(5))
        .unwrap();
    let analyzer = Analyzer::with_remote(remote);

    let rows = read_rows(UPLOAD.as_bytes()).unwrap();
    let outcome = analyzer.analyze_with_fallback(&rows).await.unwrap();

    assert!(outcome.remote_error.is_some());
    match outcome.result {
        AnalysisResult::Local(analysis) => assert_eq!(analysis.net, Money::from_cents(37_450)),
        other => panic!("expected local fallback, got {:?}", other),
    }
    let _ = shutdown.send(());
}
