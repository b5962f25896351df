//! Input → review → results flow for ad-hoc comparisons, run server-side as
//! sessions. The controller never does I/O itself: the caller takes a
//! [`SubmissionTicket`], performs the request and hands the outcome back,
//! which is applied only if the ticket is still current.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::comparison::{ComparisonRequest, ComparisonTableData, CompetitorInput, PrimaryInput};
use crate::models::ProductId;

pub const MAX_COMPETITORS: usize = 5;

pub const SKU_REQUIRED: &str = "SKU is required";
pub const URL_REQUIRED: &str = "URL is required";
pub const RETAILER_REQUIRED: &str = "Retailer selection is required";
pub const COMPETITOR_REQUIRED: &str = "Please add at least one competitor with retailer and URL";
pub const SUBMISSION_FAILED: &str = "Failed to process comparison. Please try again.";
pub const SUBMISSION_SUCCEEDED: &str = "Comparison completed successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WizardStage {
    Input,
    Review,
    Results,
}

impl fmt::Display for WizardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WizardStage::Input => "input",
            WizardStage::Review => "review",
            WizardStage::Results => "results",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompetitorEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub retailer: String,
    #[serde(default)]
    pub url: String,
}

impl CompetitorEntry {
    fn has_retailer(&self) -> bool {
        !self.retailer.trim().is_empty()
    }

    fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    fn is_complete(&self) -> bool {
        self.has_retailer() && self.has_url()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PrimaryErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Field-level messages shown next to the inputs. Competitor errors are
/// keyed by entry id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ValidationErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<PrimaryErrors>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub competitors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.competitors.is_empty() && self.general.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardResults {
    #[schema(value_type = String)]
    pub product_id: ProductId,
    pub comparison: ComparisonTableData,
    /// Merged product list narrowed to the saved product.
    pub list_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub id: Uuid,
    pub stage: WizardStage,
    pub primary: PrimaryInput,
    pub competitors: Vec<CompetitorEntry>,
    pub errors: ValidationErrors,
    pub submitting: bool,
    pub can_add_competitor: bool,
    pub results: Option<WizardResults>,
    pub notification: Option<Notification>,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("wizard session {0} not found")]
    SessionNotFound(Uuid),

    #[error("action not allowed in the {actual} stage (expected {expected})")]
    WrongStage {
        expected: WizardStage,
        actual: WizardStage,
    },

    #[error("a comparison is already being submitted")]
    SubmissionInFlight,

    #[error("at most 5 competitors can be compared")]
    TooManyCompetitors,

    #[error("at least one competitor entry is required")]
    NoCompetitorEntries,

    #[error("competitor entry {0} not found")]
    UnknownEntry(String),
}

/// What the caller needs to perform a submission.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    pub generation: u64,
    pub request: ComparisonRequest,
}

#[derive(Debug, Clone)]
pub struct ComparisonWizard {
    stage: WizardStage,
    primary: PrimaryInput,
    competitors: Vec<CompetitorEntry>,
    errors: ValidationErrors,
    submitting: bool,
    generation: u64,
    next_entry: u64,
    results: Option<WizardResults>,
    notification: Option<Notification>,
}

impl Default for ComparisonWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonWizard {
    pub fn new() -> Self {
        let mut wizard = Self {
            stage: WizardStage::Input,
            primary: PrimaryInput::default(),
            competitors: Vec::new(),
            errors: ValidationErrors::default(),
            submitting: false,
            generation: 0,
            next_entry: 1,
            results: None,
            notification: None,
        };
        let entry = wizard.new_entry(String::new(), String::new());
        wizard.competitors.push(entry);
        wizard
    }

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn competitors(&self) -> &[CompetitorEntry] {
        &self.competitors
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn results(&self) -> Option<&WizardResults> {
        self.results.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn view(&self, id: Uuid) -> WizardView {
        WizardView {
            id,
            stage: self.stage,
            primary: self.primary.clone(),
            competitors: self.competitors.clone(),
            errors: self.errors.clone(),
            submitting: self.submitting,
            can_add_competitor: self.stage == WizardStage::Input
                && self.competitors.len() < MAX_COMPETITORS,
            results: self.results.clone(),
            notification: self.notification.clone(),
        }
    }

    fn new_entry(&mut self, retailer: String, url: String) -> CompetitorEntry {
        let entry = CompetitorEntry {
            id: format!("competitor-{}", self.next_entry),
            retailer,
            url,
        };
        self.next_entry += 1;
        entry
    }

    fn expect_stage(&self, expected: WizardStage) -> Result<(), WizardError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStage {
                expected,
                actual: self.stage,
            })
        }
    }

    /// Replaces the form. Entries without an id (or reusing one) get a fresh id.
    pub fn set_input(
        &mut self,
        primary: PrimaryInput,
        competitors: Vec<CompetitorEntry>,
    ) -> Result<(), WizardError> {
        self.expect_stage(WizardStage::Input)?;
        if competitors.is_empty() {
            return Err(WizardError::NoCompetitorEntries);
        }
        if competitors.len() > MAX_COMPETITORS {
            return Err(WizardError::TooManyCompetitors);
        }

        let mut entries: Vec<CompetitorEntry> = Vec::with_capacity(competitors.len());
        for entry in competitors {
            let taken = entry.id.is_empty() || entries.iter().any(|e| e.id == entry.id);
            if taken {
                let fresh = self.new_entry(entry.retailer, entry.url);
                entries.push(fresh);
            } else {
                entries.push(entry);
            }
        }

        self.primary = primary;
        self.competitors = entries;
        Ok(())
    }

    pub fn add_competitor(&mut self) -> Result<CompetitorEntry, WizardError> {
        self.expect_stage(WizardStage::Input)?;
        if self.competitors.len() >= MAX_COMPETITORS {
            return Err(WizardError::TooManyCompetitors);
        }
        let entry = self.new_entry(String::new(), String::new());
        self.competitors.push(entry.clone());
        Ok(entry)
    }

    pub fn remove_competitor(&mut self, entry_id: &str) -> Result<(), WizardError> {
        self.expect_stage(WizardStage::Input)?;
        let position = self
            .competitors
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| WizardError::UnknownEntry(entry_id.to_string()))?;
        if self.competitors.len() == 1 {
            return Err(WizardError::NoCompetitorEntries);
        }
        self.competitors.remove(position);
        self.errors.competitors.remove(entry_id);
        Ok(())
    }

    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        let mut primary = PrimaryErrors::default();
        if self.primary.sku.trim().is_empty() {
            primary.sku = Some(SKU_REQUIRED.to_string());
        }
        if self.primary.url.trim().is_empty() {
            primary.url = Some(URL_REQUIRED.to_string());
        }
        if primary != PrimaryErrors::default() {
            errors.primary = Some(primary);
        }

        for entry in &self.competitors {
            match (entry.has_retailer(), entry.has_url()) {
                (true, false) => {
                    errors.competitors.insert(entry.id.clone(), URL_REQUIRED.to_string());
                }
                (false, true) => {
                    errors
                        .competitors
                        .insert(entry.id.clone(), RETAILER_REQUIRED.to_string());
                }
                _ => {}
            }
        }

        if !self.competitors.iter().any(CompetitorEntry::is_complete) {
            errors.general = Some(COMPETITOR_REQUIRED.to_string());
        }

        errors
    }

    /// Moves to review when the form is valid. Otherwise stays in input with
    /// the errors recorded and returns `false`.
    pub fn go_to_review(&mut self) -> Result<bool, WizardError> {
        self.expect_stage(WizardStage::Input)?;
        self.errors = self.validate();
        self.notification = None;
        if !self.errors.is_empty() {
            return Ok(false);
        }
        self.stage = WizardStage::Review;
        Ok(true)
    }

    /// Back to input with every value kept. Abandons any submission in flight.
    pub fn edit(&mut self) -> Result<(), WizardError> {
        self.expect_stage(WizardStage::Review)?;
        self.generation += 1;
        self.submitting = false;
        self.stage = WizardStage::Input;
        Ok(())
    }

    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, WizardError> {
        self.expect_stage(WizardStage::Review)?;
        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }

        self.generation += 1;
        self.submitting = true;
        self.errors = ValidationErrors::default();
        self.notification = None;

        let request = ComparisonRequest {
            primary: PrimaryInput {
                sku: self.primary.sku.trim().to_string(),
                url: self.primary.url.trim().to_string(),
            },
            competitors: self
                .competitors
                .iter()
                .filter(|e| e.is_complete())
                .map(|e| CompetitorInput {
                    retailer: e.retailer.trim().to_string(),
                    url: e.url.trim().to_string(),
                })
                .collect(),
        };

        Ok(SubmissionTicket {
            generation: self.generation,
            request,
        })
    }

    /// True while the submission identified by `generation` may still be applied.
    pub fn is_current(&self, generation: u64) -> bool {
        self.submitting && self.stage == WizardStage::Review && self.generation == generation
    }

    /// Returns `false` (and changes nothing) for a stale submission.
    pub fn complete_success(
        &mut self,
        generation: u64,
        product_id: ProductId,
        comparison: ComparisonTableData,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        let list_link = format!(
            "/api/products?search={}",
            urlencoding::encode(&comparison.primary.sku)
        );
        self.submitting = false;
        self.stage = WizardStage::Results;
        self.results = Some(WizardResults {
            product_id,
            comparison,
            list_link,
        });
        self.notification = Some(Notification {
            kind: NotificationKind::Success,
            message: SUBMISSION_SUCCEEDED.to_string(),
        });
        true
    }

    /// Stays in review with a general error. Returns `false` for a stale submission.
    pub fn complete_failure(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.submitting = false;
        self.errors = ValidationErrors {
            general: Some(SUBMISSION_FAILED.to_string()),
            ..ValidationErrors::default()
        };
        self.notification = Some(Notification {
            kind: NotificationKind::Error,
            message: SUBMISSION_FAILED.to_string(),
        });
        true
    }

    /// Clears everything back to an empty form. Allowed from any stage.
    pub fn restart(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new();
        self.generation = generation;
    }
}

pub type SharedWizard = Arc<Mutex<ComparisonWizard>>;

/// Sessions idle for longer than this are evicted.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct Session {
    wizard: SharedWizard,
    last_touched: Instant,
}

impl Session {
    fn is_idle(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.last_touched) > ttl
    }
}

/// Live wizard sessions. Every lookup refreshes the session's idle timer;
/// idle sessions are dropped on `create`, on lookup and by [`Self::spawn_sweeper`].
#[derive(Clone)]
pub struct WizardSessions {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_ttl: Duration,
}

impl Default for WizardSessions {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

impl WizardSessions {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> (Uuid, SharedWizard) {
        let id = Uuid::new_v4();
        let wizard = Arc::new(Mutex::new(ComparisonWizard::new()));
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.is_idle(self.idle_ttl, now));
        sessions.insert(
            id,
            Session {
                wizard: wizard.clone(),
                last_touched: now,
            },
        );
        (id, wizard)
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedWizard, WizardError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id) {
            Some(session) if !session.is_idle(self.idle_ttl, now) => {
                session.last_touched = now;
                Ok(session.wizard.clone())
            }
            Some(_) => {
                sessions.remove(&id);
                tracing::debug!(%id, "idle wizard session evicted");
                Err(WizardError::SessionNotFound(id))
            }
            None => Err(WizardError::SessionNotFound(id)),
        }
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), WizardError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(WizardError::SessionNotFound(id))
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every idle session and returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(self.idle_ttl, now));
        before - sessions.len()
    }

    /// Runs [`Self::evict_idle`] every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let sessions = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = sessions.evict_idle().await;
                if evicted > 0 {
                    tracing::info!(evicted, "idle wizard sessions evicted");
                }
            }
        })
    }
}
