//! Integration tests for jarbook-core
//!
//! These tests exercise whole sessions over a file store: persistence across
//! restarts, the on-disk key layout, and coaching round trips.

use std::sync::Arc;

use chrono::NaiveDate;
use jarbook_core::{
    ai::CoachingMode, AIClient, BackendKind, CoachTarget, Config, Error, FileStore, GoalType,
    Jar, KnownCategory, NewGoal, NewTransaction, Session, Store, TransactionType, ViewMode,
};
use serde_json::Value;
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn config_at(dir: &TempDir) -> Config {
    let mut config = Config::embedded().unwrap();
    config.store.path = Some(dir.path().join("store.json"));
    config.ai.backend = BackendKind::Mock;
    config
}

fn read_store(dir: &TempDir) -> Value {
    let raw = std::fs::read_to_string(dir.path().join("store.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut session = Session::open(config_at(&dir)).unwrap();
        session.budget_mut().set_income(60_000_000).unwrap();
        session.budget_mut().set_jar(Jar::Play, 10).unwrap();
        session
            .ledger_mut()
            .add(NewTransaction {
                kind: TransactionType::Income,
                amount: 60_000_000,
                category: Some(KnownCategory::Salary),
                notes: "March salary".to_string(),
                date: Some(date("2024-03-01")),
                ..Default::default()
            })
            .unwrap();
        session
            .goals_mut()
            .add(NewGoal {
                title: "Emergency fund".to_string(),
                target_amount: 180_000_000,
                current_amount: 20_000_000,
                deadline: date("2025-12-31"),
                kind: GoalType::Saving,
                reminder_days: 14,
            })
            .unwrap();
    }

    let session = Session::open(config_at(&dir)).unwrap();
    assert_eq!(session.budget().income(), 60_000_000);
    assert_eq!(session.budget().expenses(), 15_000_000);
    assert!(session.budget().has_custom_jars());
    assert_eq!(session.budget().jar_config().get(Jar::Play), 10);
    // Mid tier (40/10/10/30/5/5) with play raised to 10
    assert_eq!(session.budget().allocation_status().total, 105);

    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.ledger().transactions()[0].notes, "March salary");
    assert_eq!(session.goals().goals().len(), 1);
    assert!((session.goals().goals()[0].progress() - 100.0 / 9.0).abs() < 1e-9);
}

#[test]
fn test_store_key_layout() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::open(config_at(&dir)).unwrap();
    session.budget_mut().set_income(25_000_000).unwrap();
    session.budget_mut().set_jar(Jar::Give, 5).unwrap();
    session
        .ledger_mut()
        .add(NewTransaction {
            amount: 45_000,
            category: Some(KnownCategory::Food),
            notes: "Pho".to_string(),
            date: Some(date("2024-03-20")),
            ..Default::default()
        })
        .unwrap();

    let store = read_store(&dir);
    assert_eq!(store["ai_budget_income"], "25000000");

    let jars: Value =
        serde_json::from_str(store["ai_budget_jar_config"].as_str().unwrap()).unwrap();
    assert_eq!(jars["nec"], 55);
    assert_eq!(jars["give"], 5);

    let txs: Value =
        serde_json::from_str(store["ai_budget_transactions"].as_str().unwrap()).unwrap();
    assert_eq!(txs[0]["type"], "expense");
    assert_eq!(txs[0]["category"], "food");
    assert_eq!(txs[0]["classification"], "need");
    assert_eq!(txs[0]["date"], "2024-03-20");
    assert_eq!(txs[0]["amount"], 45_000);
}

#[test]
fn test_custom_namespace() {
    let dir = TempDir::new().unwrap();
    let mut config = config_at(&dir);
    config.store.namespace = "household_".to_string();

    let mut session = Session::open(config).unwrap();
    session.budget_mut().set_expenses(9_000_000).unwrap();

    let store = read_store(&dir);
    assert_eq!(store["household_expenses"], "9000000");
    assert!(store.get("ai_budget_expenses").is_none());
}

#[test]
fn test_unreadable_values_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(
        &path,
        r#"{"ai_budget_income": "lots", "ai_budget_transactions": "[not json", "ai_budget_goals": "[]"}"#,
    )
    .unwrap();

    let session = Session::open(config_at(&dir)).unwrap();
    assert_eq!(session.budget().income(), 20_000_000);
    assert!(session.ledger().is_empty());
    assert!(session.goals().goals().is_empty());
}

#[test]
fn test_shared_store_between_services() {
    let dir = TempDir::new().unwrap();
    let file = FileStore::open(dir.path().join("store.json")).unwrap();
    let store = Store::new(Arc::new(file), "ai_budget_");

    let config = Config::embedded().unwrap();
    let mut session = Session::new(
        config.clone(),
        store.clone(),
        jarbook_core::Coach::from_config(&config.ai).unwrap(),
    );
    session.budget_mut().set_income(10_000_000).unwrap();

    let reopened = jarbook_core::BudgetService::load(store, &config.budget);
    assert_eq!(reopened.income(), 10_000_000);
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[test]
fn test_default_allocation_scenario() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::open(config_at(&dir)).unwrap();
    session.budget_mut().set_income(20_000_000).unwrap();

    let amounts = session.budget().jar_amounts(ViewMode::Monthly);
    assert_eq!(amounts[&Jar::Necessities], 11_000_000);
    assert_eq!(amounts[&Jar::Investment], 3_000_000);

    let yearly = session.budget().jar_amounts(ViewMode::Yearly);
    assert_eq!(yearly[&Jar::Necessities], 132_000_000);
}

#[tokio::test]
async fn test_coaching_round_trip_with_mock_backend() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::open(config_at(&dir)).unwrap();
    let goal = session
        .goals_mut()
        .add(NewGoal {
            title: "House".to_string(),
            target_amount: 2_000_000_000,
            current_amount: 500_000_000,
            deadline: date("2030-12-31"),
            kind: GoalType::Saving,
            reminder_days: 0,
        })
        .unwrap();

    let insight = session
        .coach_overview(CoachingMode::General, 0, None)
        .await
        .unwrap()
        .unwrap();
    assert!((1..=7).contains(&insight.current_level));

    let strategy = session.goal_strategy(&goal.id).await.unwrap().unwrap();
    assert!(!strategy.monthly_target.is_empty());
    assert!(session
        .board()
        .get(&CoachTarget::Goal(goal.id.clone()))
        .is_some());

    // Coaching never writes to the store
    let store = read_store(&dir);
    assert!(store.get("ai_budget_income").is_none());
}

#[tokio::test]
async fn test_coaching_without_backend_is_unavailable() {
    let mut config = Config::embedded().unwrap();
    config.ai.backend = BackendKind::OpenAICompatible;
    config.ai.host = None;

    let client = AIClient::from_config(&config.ai).unwrap();
    assert!(client.is_none());

    let session = Session::in_memory(config, client);
    let result = session.content_idea("Gardening").await;
    assert!(matches!(result, Err(Error::CoachingUnavailable)));
}
