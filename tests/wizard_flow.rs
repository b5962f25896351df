mod common;

use std::sync::Arc;
use std::time::Duration;

use pricehawk_api::{
    comparison::PrimaryInput,
    dto::wizard::WizardInputRequest,
    error::AppError,
    models::RetailerId,
    retailers::{GLOBAL_HOUSE, HOMEPRO},
    services::wizard_service,
    state::AppState,
    wizard::{
        COMPETITOR_REQUIRED, ComparisonWizard, CompetitorEntry, MAX_COMPETITORS, NotificationKind, RETAILER_REQUIRED,
        SKU_REQUIRED, SUBMISSION_FAILED, URL_REQUIRED, WizardSessions, WizardStage, WizardView,
    },
};
use uuid::Uuid;

fn entry(id: &str, retailer: &str, url: &str) -> CompetitorEntry {
    CompetitorEntry {
        id: id.to_string(),
        retailer: retailer.to_string(),
        url: url.to_string(),
    }
}

fn homepro_input() -> WizardInputRequest {
    WizardInputRequest {
        primary: PrimaryInput {
            sku: "1145439".to_string(),
            url: common::PRIMARY_URL.to_string(),
        },
        competitors: vec![entry("competitor-1", "HOMEPRO", common::HOMEPRO_URL)],
    }
}

fn view(resp: pricehawk_api::response::ApiResponse<WizardView>) -> WizardView {
    resp.data.expect("wizard view")
}

/// New session with the HomePro scenario filled in and moved to review.
async fn session_in_review(state: &AppState) -> Uuid {
    let id = view(wizard_service::create(state).await.expect("create")).id;
    wizard_service::set_input(state, id, homepro_input()).await.expect("input");
    let reviewed = view(wizard_service::review(state, id).await.expect("review"));
    assert_eq!(reviewed.stage, WizardStage::Review);
    id
}

/// Polls the session until no submission is in flight.
async fn settled(state: &AppState, id: Uuid) -> WizardView {
    for _ in 0..200 {
        let current = view(wizard_service::get(state, id).await.expect("get"));
        if !current.submitting {
            return current;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("submission never settled");
}

#[tokio::test]
async fn homepro_comparison_is_saved_and_listed() {
    let state = common::state().await;
    let id = session_in_review(&state).await;

    let done = view(wizard_service::confirm(&state, id).await.expect("confirm"));
    assert_eq!(done.stage, WizardStage::Results);
    assert!(!done.submitting);
    assert_eq!(
        done.notification.as_ref().map(|n| n.kind),
        Some(NotificationKind::Success)
    );

    let saved = state.manual_products.get_all().await;
    assert_eq!(saved.len(), 1);
    let product = &saved[0];
    assert!(product.id.as_str().starts_with("manual_"));
    assert!(product.prices[&RetailerId::new(HOMEPRO)].price.is_some());
    assert_eq!(product.prices[&RetailerId::new(GLOBAL_HOUSE)].price, None);

    let results = done.results.expect("results");
    assert_eq!(results.product_id, product.id);
    assert_eq!(results.list_link, "/api/products?search=1145439");
}

#[tokio::test]
async fn review_is_guarded_by_validation() {
    let state = common::state().await;
    let id = view(wizard_service::create(&state).await.expect("create")).id;

    let blocked = view(wizard_service::review(&state, id).await.expect("review"));
    assert_eq!(blocked.stage, WizardStage::Input);
    let primary = blocked.errors.primary.expect("primary errors");
    assert_eq!(primary.sku.as_deref(), Some(SKU_REQUIRED));
    assert_eq!(primary.url.as_deref(), Some(URL_REQUIRED));
    assert_eq!(blocked.errors.general.as_deref(), Some(COMPETITOR_REQUIRED));

    let partial = WizardInputRequest {
        competitors: vec![
            entry("a", "HOMEPRO", ""),
            entry("b", "", "https://www.dohome.co.th/p/1"),
            entry("c", "GLOBAL_HOUSE", "https://www.globalhouse.co.th/product/1"),
        ],
        ..homepro_input()
    };
    wizard_service::set_input(&state, id, partial).await.expect("input");
    let blocked = view(wizard_service::review(&state, id).await.expect("review"));
    assert_eq!(blocked.stage, WizardStage::Input);
    assert_eq!(blocked.errors.competitors.get("a").map(String::as_str), Some(URL_REQUIRED));
    assert_eq!(blocked.errors.competitors.get("b").map(String::as_str), Some(RETAILER_REQUIRED));
    assert!(blocked.errors.general.is_none());
}

#[test]
fn competitor_entries_are_bounded() {
    let mut wizard = ComparisonWizard::new();
    assert_eq!(wizard.competitors().len(), 1);

    for _ in 1..MAX_COMPETITORS {
        wizard.add_competitor().expect("room for another");
    }
    assert!(wizard.add_competitor().is_err());
    assert_eq!(wizard.competitors().len(), MAX_COMPETITORS);

    let ids: Vec<String> = wizard.competitors().iter().map(|e| e.id.clone()).collect();
    for id in &ids[1..] {
        wizard.remove_competitor(id).expect("remove");
    }
    assert!(wizard.remove_competitor(&ids[0]).is_err());
    assert_eq!(wizard.competitors().len(), 1);
}

#[tokio::test]
async fn edit_keeps_values_and_input_is_locked_in_review() {
    let state = common::state().await;
    let id = session_in_review(&state).await;

    let locked = wizard_service::set_input(&state, id, homepro_input()).await;
    assert!(matches!(locked, Err(AppError::Conflict(_))));

    let edited = view(wizard_service::edit(&state, id).await.expect("edit"));
    assert_eq!(edited.stage, WizardStage::Input);
    assert_eq!(edited.primary.sku, "1145439");
    assert_eq!(edited.competitors[0].retailer, "HOMEPRO");
}

#[tokio::test]
async fn failed_submission_stays_in_review_and_saves_nothing() {
    let state = common::state().await.with_comparison(Arc::new(common::FailingComparison));
    let id = session_in_review(&state).await;

    let failed = view(wizard_service::confirm(&state, id).await.expect("confirm"));
    assert_eq!(failed.stage, WizardStage::Review);
    assert!(!failed.submitting);
    assert_eq!(failed.errors.general.as_deref(), Some(SUBMISSION_FAILED));
    assert_eq!(
        failed.notification.as_ref().map(|n| n.kind),
        Some(NotificationKind::Error)
    );
    assert!(state.manual_products.get_all().await.is_empty());

    // A retry is allowed after a failure.
    let engine = state.mock_engine.clone();
    let state = state.with_comparison(engine);
    let done = view(wizard_service::confirm(&state, id).await.expect("retry"));
    assert_eq!(done.stage, WizardStage::Results);
    assert_eq!(state.manual_products.get_all().await.len(), 1);
}

#[tokio::test]
async fn second_confirm_while_in_flight_is_rejected() {
    let gate = common::GatedComparison::new(common::table("1145439", "SPC Nara Cream", 100.0, 120.0));
    let state = common::state().await.with_comparison(gate.clone());
    let id = session_in_review(&state).await;

    let first = {
        let state = state.clone();
        tokio::spawn(async move { wizard_service::confirm(&state, id).await })
    };
    gate.started.notified().await;

    let in_flight = view(wizard_service::get(&state, id).await.expect("get"));
    assert!(in_flight.submitting);
    let second = wizard_service::confirm(&state, id).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    gate.release.notify_one();
    let done = view(first.await.expect("join").expect("confirm"));
    assert_eq!(done.stage, WizardStage::Results);
    assert_eq!(state.manual_products.get_all().await.len(), 1);
}

#[tokio::test]
async fn result_arriving_after_restart_is_discarded() {
    let gate = common::GatedComparison::new(common::table("1145439", "SPC Nara Cream", 100.0, 120.0));
    let state = common::state().await.with_comparison(gate.clone());
    let id = session_in_review(&state).await;

    let pending = {
        let state = state.clone();
        tokio::spawn(async move { wizard_service::confirm(&state, id).await })
    };
    gate.started.notified().await;

    let restarted = view(wizard_service::restart(&state, id).await.expect("restart"));
    assert_eq!(restarted.stage, WizardStage::Input);
    assert!(restarted.primary.sku.is_empty());

    gate.release.notify_one();
    let late = view(pending.await.expect("join").expect("confirm"));
    assert_eq!(late.stage, WizardStage::Input);
    assert!(late.results.is_none());
    assert!(state.manual_products.get_all().await.is_empty());
}

#[tokio::test]
async fn sessions_can_be_dropped() {
    let state = common::state().await;
    let id = view(wizard_service::create(&state).await.expect("create")).id;

    wizard_service::drop_session(&state, id).await.expect("drop");
    assert!(matches!(wizard_service::get(&state, id).await, Err(AppError::NotFound)));
    assert!(matches!(
        wizard_service::drop_session(&state, id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn abandoned_confirm_still_settles_the_session() {
    let gate = common::GatedComparison::new(common::table("1145439", "SPC Nara Cream", 100.0, 120.0));
    let state = common::state().await.with_comparison(gate.clone());
    let id = session_in_review(&state).await;

    // The caller gives up while the comparison request is still out.
    let abandoned = tokio::time::timeout(Duration::from_millis(50), wizard_service::confirm(&state, id)).await;
    assert!(abandoned.is_err());
    gate.started.notified().await;

    gate.release.notify_one();
    let done = settled(&state, id).await;
    assert_eq!(done.stage, WizardStage::Results);
    assert!(done.results.is_some());
    assert_eq!(state.manual_products.get_all().await.len(), 1);

    // The session is free for the next comparison.
    let engine = state.mock_engine.clone();
    let state = state.with_comparison(engine);
    wizard_service::restart(&state, id).await.expect("restart");
    wizard_service::set_input(&state, id, homepro_input()).await.expect("input");
    wizard_service::review(&state, id).await.expect("review");
    let again = view(wizard_service::confirm(&state, id).await.expect("confirm"));
    assert_eq!(again.stage, WizardStage::Results);
    assert_eq!(state.manual_products.get_all().await.len(), 2);
}

#[tokio::test]
async fn idle_sessions_are_evicted() {
    let sessions = WizardSessions::new(Duration::from_millis(200));
    let (idle, _) = sessions.create().await;
    let (active, _) = sessions.create().await;

    tokio::time::sleep(Duration::from_millis(120)).await;
    sessions.get(active).await.expect("touch active session");
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(sessions.evict_idle().await, 1);
    assert!(sessions.get(idle).await.is_err());
    assert!(sessions.get(active).await.is_ok());

    tokio::time::sleep(Duration::from_millis(250)).await;
    let (fresh, _) = sessions.create().await;
    assert_eq!(sessions.count().await, 1);
    assert!(sessions.get(active).await.is_err());
    assert!(sessions.get(fresh).await.is_ok());
}

#[tokio::test]
async fn sweeper_drops_sessions_left_in_results() {
    let sessions = WizardSessions::new(Duration::from_millis(50));
    let (id, _) = sessions.create().await;
    let sweeper = sessions.spawn_sweeper(Duration::from_millis(20));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(sessions.count().await, 0);
    assert!(sessions.get(id).await.is_err());
    sweeper.abort();
}
