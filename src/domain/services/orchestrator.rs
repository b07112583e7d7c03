#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;

use super::CredentialStore;
use crate::domain::models::ApiKey;
use crate::domain::models::CredentialError;
use crate::domain::models::GatewayBox;
use crate::domain::models::GatewayError;
use crate::domain::models::Persona;
use crate::domain::models::SessionConfiguration;
use crate::domain::models::Turn;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OrchestratorState {
    /// No usable credential, only credential submission and persona changes
    /// do anything.
    AwaitingCredential,
    Idle,
    /// A request is in flight, new messages are ignored until it completes.
    Sending,
}

/// Owns the conversation and drives the gateway. Every gateway failure ends
/// up as a model turn, nothing is raised to the caller.
pub struct Orchestrator {
    gateway: GatewayBox,
    store: CredentialStore,
    api_key: Option<ApiKey>,
    model: String,
    persona: Persona,
    state: OrchestratorState,
    turns: Vec<Turn>,
}

impl Orchestrator {
    pub fn new(
        gateway: GatewayBox,
        store: CredentialStore,
        model: &str,
        persona: Persona,
    ) -> Orchestrator {
        return Orchestrator {
            gateway,
            store,
            api_key: None,
            model: model.to_string(),
            persona,
            state: OrchestratorState::AwaitingCredential,
            turns: vec![],
        };
    }

    /// Builds an orchestrator and restores the stored configuration. The
    /// stored persona wins over `default_persona` even when the stored key is
    /// no longer usable.
    pub async fn start(
        gateway: GatewayBox,
        store: CredentialStore,
        model: &str,
        default_persona: Persona,
    ) -> Orchestrator {
        let mut orchestrator = Orchestrator::new(gateway, store, model, default_persona);

        if let Some(config) = orchestrator.store.load().await {
            orchestrator.persona = config.selected_persona;
            if let Some(api_key) = config.valid_api_key() {
                orchestrator.use_api_key(api_key);
            }
        }

        tracing::debug!(
            state = ?orchestrator.state,
            persona = orchestrator.persona.to_string(),
            model = orchestrator.model,
            "Orchestrator started"
        );

        return orchestrator;
    }

    pub fn state(&self) -> OrchestratorState {
        return self.state;
    }

    pub fn turns(&self) -> &[Turn] {
        return &self.turns;
    }

    pub fn persona(&self) -> Persona {
        return self.persona;
    }

    pub fn model(&self) -> &str {
        return &self.model;
    }

    pub fn api_key(&self) -> Option<&ApiKey> {
        return self.api_key.as_ref();
    }

    fn use_api_key(&mut self, api_key: ApiKey) {
        self.gateway.configure(&api_key);
        self.api_key = Some(api_key);
        self.state = OrchestratorState::Idle;
    }

    async fn persist(&self) -> Result<(), CredentialError> {
        if let Some(api_key) = &self.api_key {
            let config = SessionConfiguration::new(api_key, self.persona);
            self.store
                .save(&config)
                .await
                .map_err(|err| return CredentialError::Storage(err.to_string()))?;
        }

        return Ok(());
    }

    /// Validates and stores a credential. Nothing changes when the key is
    /// rejected or cannot be saved.
    pub async fn submit_credential(&mut self, text: &str) -> Result<(), CredentialError> {
        if self.state == OrchestratorState::Sending {
            return Err(CredentialError::Busy);
        }

        let api_key = ApiKey::parse(text)?;
        let config = SessionConfiguration::new(&api_key, self.persona);
        self.store
            .save(&config)
            .await
            .map_err(|err| return CredentialError::Storage(err.to_string()))?;

        tracing::info!(api_key = ?api_key, "Credential accepted");
        self.use_api_key(api_key);

        return Ok(());
    }

    /// Appends the user turn and enters `Sending`. Returns false and changes
    /// nothing when not `Idle` or when the text is blank.
    pub fn begin_send(&mut self, text: &str) -> bool {
        if self.state != OrchestratorState::Idle {
            tracing::debug!(state = ?self.state, "Ignoring message, not idle");
            return false;
        }

        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.turns.push(Turn::user(text));
        self.state = OrchestratorState::Sending;

        return true;
    }

    /// Asks the gateway for a reply to the current turns.
    pub async fn request(&self) -> Result<String, GatewayError> {
        return self
            .gateway
            .generate(&self.model, &self.turns, self.persona.system_prompt())
            .await;
    }

    /// Appends the reply, or the error as a model turn, and goes back to
    /// `Idle`.
    pub fn complete_send(&mut self, res: Result<String, GatewayError>) {
        if self.state != OrchestratorState::Sending {
            tracing::warn!(state = ?self.state, "Dropping reply, no request in flight");
            return;
        }

        let turn = match res {
            Ok(text) => Turn::model(&text),
            Err(err) => {
                tracing::error!(error = ?err, "Gemini request failed");
                Turn::model(&format!("Error: {err}"))
            }
        };

        self.turns.push(turn);
        self.state = OrchestratorState::Idle;
    }

    /// Sends a message and waits for the reply. Returns false when the
    /// message was ignored.
    pub async fn send_message(&mut self, text: &str) -> bool {
        if !self.begin_send(text) {
            return false;
        }

        let res = self.request().await;
        self.complete_send(res);

        return true;
    }

    /// Switches persona without touching the conversation. The choice is
    /// persisted when a credential is held.
    pub async fn select_persona(&mut self, persona: Persona) -> Result<(), CredentialError> {
        self.persona = persona;
        return self.persist().await;
    }

    /// Empties the conversation if `confirm` agrees.
    pub fn clear_conversation<F>(&mut self, confirm: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        if self.state == OrchestratorState::Sending || !confirm() {
            return false;
        }

        self.turns.clear();
        return true;
    }

    /// Forgets the credential everywhere and drops the conversation.
    pub async fn reset_credential(&mut self) -> Result<(), CredentialError> {
        self.gateway.unconfigure();
        self.api_key = None;
        self.turns.clear();
        self.state = OrchestratorState::AwaitingCredential;

        self.store
            .clear()
            .await
            .map_err(|err| return CredentialError::Storage(err.to_string()))?;

        tracing::info!("Credential reset");
        return Ok(());
    }

    pub fn set_model(&mut self, model: &str) {
        self.model = model.to_string();
    }

    pub async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        return self.gateway.list_models().await;
    }
}
