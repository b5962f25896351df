use uuid::Uuid;

use crate::{
    audit,
    comparison::ComparisonClient,
    dto::wizard::{DroppedSession, WizardInputRequest},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
    wizard::{CompetitorEntry, SharedWizard, SubmissionTicket, WizardView},
};

fn respond(message: &str, view: WizardView) -> AppResult<ApiResponse<WizardView>> {
    Ok(ApiResponse::success(message, view, Some(Meta::empty())))
}

pub async fn create(state: &AppState) -> AppResult<ApiResponse<WizardView>> {
    let (id, wizard) = state.wizards.create().await;
    tracing::debug!(%id, "wizard session created");
    let view = wizard.lock().await.view(id);
    respond("Wizard session created", view)
}

pub async fn get(state: &AppState, id: Uuid) -> AppResult<ApiResponse<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let view = wizard.lock().await.view(id);
    respond("Wizard session", view)
}

pub async fn drop_session(state: &AppState, id: Uuid) -> AppResult<ApiResponse<DroppedSession>> {
    state.wizards.remove(id).await?;
    Ok(ApiResponse::success(
        "Wizard session removed",
        DroppedSession { id },
        Some(Meta::empty()),
    ))
}

pub async fn set_input(
    state: &AppState,
    id: Uuid,
    payload: WizardInputRequest,
) -> AppResult<ApiResponse<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.set_input(payload.primary, payload.competitors)?;
    respond("Wizard input saved", wizard.view(id))
}

pub async fn add_competitor(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CompetitorEntry>> {
    let wizard = state.wizards.get(id).await?;
    let entry = wizard.lock().await.add_competitor()?;
    Ok(ApiResponse::success("Competitor added", entry, Some(Meta::empty())))
}

pub async fn remove_competitor(
    state: &AppState,
    id: Uuid,
    entry_id: String,
) -> AppResult<ApiResponse<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.remove_competitor(&entry_id)?;
    respond("Competitor removed", wizard.view(id))
}

/// Validation failures are not an error: the view comes back in the input
/// stage with its field errors filled in.
pub async fn review(state: &AppState, id: Uuid) -> AppResult<ApiResponse<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    let message = if wizard.go_to_review()? {
        "Ready for review"
    } else {
        "Please fix the highlighted fields"
    };
    respond(message, wizard.view(id))
}

pub async fn edit(state: &AppState, id: Uuid) -> AppResult<ApiResponse<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.edit()?;
    respond("Back to input", wizard.view(id))
}

/// Sends the reviewed comparison and stores the result as a manual product.
///
/// The submission runs as its own task, so a caller that goes away (client
/// disconnect, timeout) does not leave the session stuck mid-submission.
/// The session lock is released while the comparison request runs. A result
/// arriving after the session moved on (edit, restart) is discarded and
/// nothing is saved.
pub async fn confirm(state: &AppState, id: Uuid) -> AppResult<ApiResponse<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let ticket = wizard.lock().await.begin_submission()?;
    let generation = ticket.generation;

    let task = tokio::spawn(settle_submission(state.clone(), id, wizard.clone(), ticket));
    match task.await {
        Ok((message, view)) => respond(message, view),
        Err(err) => {
            tracing::error!(%id, error = %err, "comparison task aborted");
            wizard.lock().await.complete_failure(generation);
            Err(AppError::Internal(anyhow::anyhow!("comparison task aborted")))
        }
    }
}

async fn settle_submission(
    state: AppState,
    id: Uuid,
    wizard: SharedWizard,
    ticket: SubmissionTicket,
) -> (&'static str, WizardView) {
    let outcome = state.comparison.compare(&ticket.request).await;

    let mut guard = wizard.lock().await;
    if !guard.is_current(ticket.generation) {
        tracing::debug!(%id, "stale comparison result discarded");
        return ("Comparison result discarded", guard.view(id));
    }

    match outcome {
        Ok(data) => {
            let product_id = state.manual_products.save(&data).await;
            audit::record(
                state.pool(),
                "comparison_saved",
                Some("manual_products"),
                Some(serde_json::json!({
                    "product_id": product_id.as_str(),
                    "sku": data.primary.sku,
                    "competitors": data.competitors.len(),
                })),
            )
            .await;
            guard.complete_success(ticket.generation, product_id, data);
            ("Comparison completed", guard.view(id))
        }
        Err(err) => {
            tracing::warn!(%id, error = %err, "comparison request failed");
            guard.complete_failure(ticket.generation);
            ("Comparison failed", guard.view(id))
        }
    }
}

pub async fn restart(state: &AppState, id: Uuid) -> AppResult<ApiResponse<WizardView>> {
    let wizard = state.wizards.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.restart();
    respond("Wizard restarted", wizard.view(id))
}
