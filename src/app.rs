use crate::chat_client::{strip_assistant_prefix, ChatClient};
use crate::managers::settings_panel::SettingsPanelManager;
use crate::managers::transcript::TranscriptManager;
use crate::settings::SettingsForm;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shown in place of a reply when the chat request fails.
pub const CONNECTION_ERROR_MESSAGE: &str = "Error: Could not connect to server";

/// What the page needs to redraw itself after an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub transcript: Vec<String>,
    pub settings_open: bool,
    pub form: SettingsForm,
    pub clear_input: bool,
    pub pending_replies: usize,
}

/// Chat state plus the handlers that mutate it.
///
/// Handlers may overlap freely; locks are never held across an `.await`.
pub struct ChatApp {
    client: ChatClient,
    transcript: TranscriptManager,
    settings: SettingsPanelManager,
    pending_replies: AtomicUsize,
}

impl ChatApp {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            transcript: TranscriptManager::new(),
            settings: SettingsPanelManager::new(),
            pending_replies: AtomicUsize::new(0),
        }
    }

    pub fn transcript(&self) -> &TranscriptManager {
        &self.transcript
    }

    pub fn settings(&self) -> &SettingsPanelManager {
        &self.settings
    }

    pub fn view_state(&self, clear_input: bool) -> ViewState {
        ViewState {
            transcript: self.transcript.to_html(),
            settings_open: self.settings.is_open(),
            form: self.settings.form(),
            clear_input,
            pending_replies: self.pending_replies.load(Ordering::SeqCst),
        }
    }

    /// Send a message and wait for the reply to land in the transcript.
    ///
    /// Returns `false` without touching anything if the input is blank.
    pub async fn send_message(&self, input: &str) -> bool {
        match self.submit(input) {
            Some(message) => {
                self.request_reply(message).await;
                true
            }
            None => false,
        }
    }

    /// Record the user's message. Returns the text to send, or `None` for
    /// blank input.
    pub fn submit(&self, input: &str) -> Option<String> {
        let message = input.trim();
        if message.is_empty() {
            debug!("Ignoring blank chat input");
            return None;
        }
        self.transcript.render(message, true);
        self.pending_replies.fetch_add(1, Ordering::SeqCst);
        Some(message.to_string())
    }

    /// Ask the backend for a reply to a message already passed to `submit`.
    pub async fn request_reply(&self, message: String) {
        match self.client.chat(&message).await {
            Ok(reply) => {
                let reply = strip_assistant_prefix(&reply);
                debug!("Received reply ({} chars)", reply.len());
                self.transcript.render(&reply, false);
            }
            Err(e) => {
                error!("Error: {:#}", e);
                self.transcript.render(CONNECTION_ERROR_MESSAGE, false);
            }
        }
        self.pending_replies.fetch_sub(1, Ordering::SeqCst);
    }

    /// Load the backend config into the form, then show the settings view.
    pub async fn open_settings(&self) {
        self.load_config_into_form().await;
        self.settings.open();
    }

    pub fn close_settings(&self) {
        self.settings.close();
    }

    pub async fn load_config_into_form(&self) {
        match self.client.fetch_config().await {
            Ok(remote) => self.settings.update_form(|form| form.populate(&remote)),
            Err(e) => error!("Failed to load config: {:#}", e),
        }
    }

    /// Push the form to the backend. The settings view closes only if the
    /// request got an answer.
    pub async fn save_settings(&self, form: SettingsForm) {
        let config = form.to_config();
        let rejected = form.rejected_fields(&config);
        if !rejected.is_empty() {
            warn!("Not saving invalid settings fields: {}", rejected.join(", "));
        }
        self.settings.set_form(form);

        match self.client.save_config(&config).await {
            Ok(()) => {
                info!("Saved generation settings");
                self.settings.close();
            }
            Err(e) => error!("Failed to save config: {:#}", e),
        }
    }

    /// Clear server-side history, then the local transcript. A failed request
    /// leaves the transcript as it was.
    pub async fn clear_history(&self) {
        match self.client.clear_history().await {
            Ok(()) => {
                self.transcript.clear();
                info!("Cleared chat history");
            }
            Err(e) => error!("Failed to clear history: {:#}", e),
        }
    }
}
