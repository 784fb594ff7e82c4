//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::NaiveDate;
use jarbook_core::config::DisplayConfig;
use jarbook_core::prompts::PromptLibrary;
use jarbook_core::test_utils::MockCoachServer;
use jarbook_core::{
    AIClient, BackendKind, Category, CoachTarget, Coach, Config, Error, Jar, KnownCategory,
    MockBackend, Session, Store, TransactionType, ViewMode,
};

use crate::commands::{self, format_money, truncate, GoalInput, TxInput};

fn setup_session() -> Session {
    Session::in_memory(Config::embedded().unwrap(), Some(AIClient::mock()))
}

fn setup_session_with(mock: MockBackend) -> Session {
    Session::in_memory(Config::embedded().unwrap(), Some(AIClient::Mock(mock)))
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn expense<'a>(amount: &'a str, notes: &'a str) -> TxInput<'a> {
    TxInput {
        amount,
        kind: "expense",
        notes,
        ..Default::default()
    }
}

fn goal_input<'a>(title: &'a str, target: &'a str) -> GoalInput<'a> {
    GoalInput {
        title,
        target,
        current: "0",
        deadline: "2030-12-31",
        kind: "saving",
        remind: 0,
    }
}

// ========== Formatting Tests ==========

#[test]
fn test_format_money() {
    let display = DisplayConfig {
        currency_symbol: "VND".to_string(),
        thousands_separator: ".".to_string(),
    };
    assert_eq!(format_money(11_000_000, &display), "11.000.000 VND");
    assert_eq!(format_money(999, &display), "999 VND");
    assert_eq!(format_money(1_000, &display), "1.000 VND");
    assert_eq!(format_money(0, &display), "0 VND");
    assert_eq!(format_money(-2_500_000, &display), "-2.500.000 VND");

    let plain = DisplayConfig {
        currency_symbol: String::new(),
        thousands_separator: ",".to_string(),
    };
    assert_eq!(format_money(123_456_789, &plain), "123,456,789");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer note", 10), "a much ...");
    // Multi-byte characters are never split
    assert_eq!(truncate("Cà phê sữa đá buổi sáng", 8), "Cà ph...");
}

#[test]
fn test_parse_date() {
    assert_eq!(
        commands::parse_date("2024-03-20").unwrap(),
        date("2024-03-20")
    );
    assert!(commands::parse_date("20/03/2024").is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budget_show() {
    let session = setup_session();
    assert!(commands::cmd_budget_show(&session, ViewMode::Monthly).is_ok());
    assert!(commands::cmd_budget_show(&session, ViewMode::Yearly).is_ok());
}

#[test]
fn test_cmd_budget_income_is_lenient() {
    let mut session = setup_session();
    commands::cmd_budget_income(&mut session, "25,000,000").unwrap();
    assert_eq!(session.budget().income(), 25_000_000);

    commands::cmd_budget_income(&mut session, "abc").unwrap();
    assert_eq!(session.budget().income(), 0);

    commands::cmd_budget_expenses(&mut session, "-5").unwrap();
    assert_eq!(session.budget().expenses(), 0);
}

#[test]
fn test_cmd_budget_jar_allows_invalid_total() {
    let mut session = setup_session();
    commands::cmd_budget_jar(&mut session, "play", "10").unwrap();

    let status = session.budget().allocation_status();
    assert_eq!(status.total, 105);
    assert!(!status.valid);
    assert_eq!(session.budget().jar_config().get(Jar::Play), 10);
}

#[test]
fn test_cmd_budget_jar_unknown() {
    let mut session = setup_session();
    let result = commands::cmd_budget_jar(&mut session, "savings", "10");
    assert!(result.is_err());
    assert!(!session.budget().has_custom_jars());
}

#[test]
fn test_cmd_budget_jar_strict_mode() {
    let mut config = Config::embedded().unwrap();
    config.budget.strict_allocation = true;
    let mut session = Session::in_memory(config, None);

    let err = commands::cmd_budget_jar(&mut session, "play", "10").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::AllocationMismatch { total: 105 })
    ));
    assert!(!session.budget().has_custom_jars());
}

#[test]
fn test_cmd_budget_reset() {
    let mut session = setup_session();
    commands::cmd_budget_jar(&mut session, "nec", "30").unwrap();
    assert!(session.budget().has_custom_jars());

    commands::cmd_budget_reset(&mut session).unwrap();
    assert!(!session.budget().has_custom_jars());
    assert!(session.budget().allocation_status().valid);
}

// ========== Transaction Command Tests ==========

#[test]
fn test_tx_input_defaults() {
    let draft = expense("50,000", "Lunch").into_draft().unwrap();
    assert_eq!(draft.kind, TransactionType::Expense);
    assert_eq!(draft.amount, 50_000);
    assert!(draft.category.is_none());
    assert!(draft.date.is_none());
    assert!(draft.frequency.is_none());
}

#[test]
fn test_tx_input_rejects_bad_values() {
    let mut input = expense("1000", "x");
    input.kind = "transfer";
    assert!(input.into_draft().is_err());

    let mut input = expense("1000", "x");
    input.category = Some("salary");
    assert!(input.into_draft().is_err());

    let input = TxInput {
        amount: "1000",
        kind: "income",
        class: Some("need"),
        ..Default::default()
    };
    assert!(input.into_draft().is_err());

    let mut input = expense("1000", "x");
    input.repeat = Some("daily");
    assert!(input.into_draft().is_err());
}

#[test]
fn test_cmd_tx_add_and_list() {
    let mut session = setup_session();
    let mut input = expense("50000", "Lunch with team");
    input.category = Some("food");
    input.date = Some("2024-03-20");
    let tx = commands::cmd_tx_add(&mut session, input.into_draft().unwrap()).unwrap();

    assert_eq!(tx.category, Category::Known(KnownCategory::Food));
    assert_eq!(tx.date, date("2024-03-20"));
    assert_eq!(session.ledger().len(), 1);

    assert!(commands::cmd_tx_list(&session, None, 20).is_ok());
    assert!(commands::cmd_tx_list(&session, Some("lunch"), 20).is_ok());
    assert_eq!(session.ledger().search("LUNCH").len(), 1);
}

#[test]
fn test_cmd_tx_add_custom_label() {
    let mut session = setup_session();
    let mut input = expense("120000", "Vet visit");
    input.label = Some("Pets");
    let tx = commands::cmd_tx_add(&mut session, input.into_draft().unwrap()).unwrap();
    assert_eq!(tx.category, Category::Custom("Pets".to_string()));
}

#[test]
fn test_cmd_tx_add_zero_amount_fails() {
    let mut session = setup_session();
    let draft = expense("abc", "Nothing").into_draft().unwrap();
    let result = commands::cmd_tx_add(&mut session, draft);
    assert!(result.is_err());
    assert!(session.ledger().is_empty());
}

#[test]
fn test_cmd_tx_delete() {
    let mut session = setup_session();
    let draft = expense("1000", "Tea").into_draft().unwrap();
    let tx = commands::cmd_tx_add(&mut session, draft).unwrap();

    commands::cmd_tx_delete(&mut session, &tx.id).unwrap();
    assert!(session.ledger().is_empty());

    // Deleting again is a no-op
    assert!(commands::cmd_tx_delete(&mut session, &tx.id).is_ok());
}

#[test]
fn test_cmd_tx_due() {
    let mut session = setup_session();
    let mut input = expense("5000000", "Rent");
    input.category = Some("housing");
    input.date = Some("2024-01-31");
    input.repeat = Some("monthly");
    let tx = commands::cmd_tx_add(&mut session, input.into_draft().unwrap()).unwrap();
    assert_eq!(tx.next_due_date, Some(date("2024-02-29")));

    assert!(commands::cmd_tx_due(&session, date("2024-03-01")).is_ok());
    assert_eq!(session.ledger().due_recurring(date("2024-03-01")).len(), 1);
    assert!(session.ledger().due_recurring(date("2024-02-01")).is_empty());
}

#[tokio::test]
async fn test_cmd_tx_coach() {
    let mock = MockBackend::new();
    let mut session = setup_session_with(mock.clone());
    let draft = expense("30000000", "New phone").into_draft().unwrap();
    let tx = commands::cmd_tx_add(&mut session, draft).unwrap();

    commands::cmd_tx_coach(&session, &tx.id).await.unwrap();
    assert!(mock.requests()[0].user.contains("New phone"));
    assert!(session
        .board()
        .get(&CoachTarget::Transaction(tx.id.clone()))
        .is_some());
}

#[tokio::test]
async fn test_cmd_tx_coach_unknown_id() {
    let session = setup_session();
    assert!(commands::cmd_tx_coach(&session, "nope").await.is_err());
}

// ========== Goal Command Tests ==========

#[test]
fn test_cmd_goals_add_and_progress() {
    let mut session = setup_session();
    let today = date("2024-01-01");
    let goal = commands::cmd_goals_add(
        &mut session,
        goal_input("House", "2000000000").into_draft().unwrap(),
        today,
    )
    .unwrap();

    commands::cmd_goals_progress(&mut session, &goal.id, "500000000", today).unwrap();
    let stored = session.goals().get(&goal.id).unwrap();
    assert_eq!(stored.current_amount, 500_000_000);
    assert_eq!(stored.progress(), 25.0);

    assert!(commands::cmd_goals_list(&session, today).is_ok());
}

#[test]
fn test_cmd_goals_add_validation() {
    let mut session = setup_session();
    let today = date("2024-01-01");

    let blank = goal_input("   ", "1000").into_draft().unwrap();
    assert!(commands::cmd_goals_add(&mut session, blank, today).is_err());

    let zero = goal_input("Car", "0").into_draft().unwrap();
    assert!(commands::cmd_goals_add(&mut session, zero, today).is_err());

    let mut bad_date = goal_input("Car", "1000");
    bad_date.deadline = "soon";
    assert!(bad_date.into_draft().is_err());

    assert!(session.goals().goals().is_empty());
}

#[test]
fn test_cmd_goals_progress_unknown() {
    let mut session = setup_session();
    let err = commands::cmd_goals_progress(&mut session, "missing", "10", date("2024-01-01"))
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));
}

#[test]
fn test_cmd_goals_reminders() {
    let mut session = setup_session();
    let mut input = goal_input("Tuition", "10000000");
    input.deadline = "2024-06-30";
    input.remind = 30;
    let draft = input.into_draft().unwrap();
    commands::cmd_goals_add(&mut session, draft, date("2024-01-01")).unwrap();

    assert_eq!(session.goals().reminders(date("2024-06-01")).len(), 1);
    assert!(session.goals().reminders(date("2024-05-30")).is_empty());
    assert!(commands::cmd_goals_reminders(&session, date("2024-06-01")).is_ok());
}

#[tokio::test]
async fn test_cmd_goals_strategy_then_delete() {
    let mut session = setup_session();
    let today = date("2024-01-01");
    let goal = commands::cmd_goals_add(
        &mut session,
        goal_input("House", "2000000000").into_draft().unwrap(),
        today,
    )
    .unwrap();

    commands::cmd_goals_strategy(&session, &goal.id).await.unwrap();
    let target = CoachTarget::Goal(goal.id.clone());
    assert!(session.board().get(&target).is_some());

    commands::cmd_goals_delete(&mut session, &goal.id).unwrap();
    assert!(session.board().get(&target).is_none());
    assert!(session.goals().get(&goal.id).is_none());
}

// ========== Coach Command Tests ==========

#[tokio::test]
async fn test_cmd_coach() {
    let mock = MockBackend::new();
    let session = setup_session_with(mock.clone());

    commands::cmd_coach(&session, false, "3,000,000", Some("Buy a house".to_string()))
        .await
        .unwrap();

    let user = &mock.requests()[0].user;
    assert!(user.contains("Reserves 3000000"));
    assert!(user.contains("Goal: Buy a house"));
}

#[tokio::test]
async fn test_cmd_coach_recognition() {
    let mock = MockBackend::new();
    let session = setup_session_with(mock.clone());
    commands::cmd_coach(&session, true, "0", None).await.unwrap();
    assert!(mock.requests()[0].user.starts_with("RECOGNITION REVIEW"));
}

#[tokio::test]
async fn test_cmd_coach_unavailable() {
    let session = setup_session_with(MockBackend::failing());
    let err = commands::cmd_coach(&session, false, "0", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::CoachingUnavailable)
    ));
}

#[tokio::test]
async fn test_cmd_coach_without_backend() {
    let session = Session::in_memory(Config::embedded().unwrap(), None);
    assert!(commands::cmd_coach(&session, false, "0", None).await.is_err());
}

#[tokio::test]
async fn test_cmd_content() {
    let mock = MockBackend::new();
    let session = setup_session_with(mock.clone());
    commands::cmd_content(&session, "Cooking").await.unwrap();
    assert_eq!(mock.requests()[0].schema, "content_idea");

    let err = commands::cmd_content(&session, "  ").await.unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(_))));
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_cmd_coach_over_http() {
    let server = MockCoachServer::start().await;
    let mut config = Config::embedded().unwrap();
    config.ai.backend = BackendKind::Gemini;
    config.ai.host = Some(server.url());

    let client = AIClient::Gemini(
        jarbook_core::GeminiBackend::new(&server.url(), "test-key", config.ai.timeout).unwrap(),
    );
    let coach = Coach::new(Some(client), PromptLibrary::embedded_only(), config.ai.clone());
    let session = Session::new(config, Store::in_memory(), coach);

    commands::cmd_coach(&session, false, "0", None).await.unwrap();
    let seen = server.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].model, "gemini-3-pro-preview");
    assert_eq!(seen[0].api_key.as_deref(), Some("test-key"));
}

#[test]
fn test_cmd_pyramid() {
    assert!(commands::cmd_pyramid().is_ok());
}

// ========== Prompts / Config Command Tests ==========

#[test]
fn test_cmd_prompts_list() {
    let mut library = PromptLibrary::embedded_only();
    assert!(commands::cmd_prompts_list(&mut library).is_ok());
}

#[test]
fn test_cmd_prompts_show() {
    let mut library = PromptLibrary::embedded_only();
    assert!(commands::cmd_prompts_show(&mut library, "coach_general").is_ok());
    assert!(commands::cmd_prompts_show(&mut library, "explain_spending").is_err());
}

#[test]
fn test_cmd_config() {
    let config = Config::embedded().unwrap();
    assert!(commands::cmd_config(&config, None).is_ok());
}
