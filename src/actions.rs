use crate::app::ChatApp;
use crate::settings::SettingsForm;
use futures_util::future::BoxFuture;
use log::debug;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    /// The page should empty its input box.
    pub clear_input: bool,
}

// UI Action Trait
pub trait UiAction: Send + Sync {
    /// Run the action. `Err` means the payload was unusable.
    fn run(
        &self,
        app: Arc<ChatApp>,
        payload: Value,
    ) -> BoxFuture<'static, Result<ActionOutcome, String>>;
}

fn parse_payload<T: for<'de> Deserialize<'de>>(payload: Value) -> Result<T, String> {
    serde_json::from_value(payload).map_err(|e| format!("Invalid action payload: {}", e))
}

#[derive(Debug, Deserialize)]
struct SendMessagePayload {
    #[serde(default)]
    input: String,
}

#[derive(Debug, Deserialize)]
struct SaveSettingsPayload {
    #[serde(default)]
    form: SettingsForm,
}

// Send Message Action
//
// The user message is recorded before returning; the reply is fetched in
// the background and shows up through `pending_replies`.
struct SendMessageAction;

impl UiAction for SendMessageAction {
    fn run(
        &self,
        app: Arc<ChatApp>,
        payload: Value,
    ) -> BoxFuture<'static, Result<ActionOutcome, String>> {
        Box::pin(send_message(app, payload))
    }
}

async fn send_message(app: Arc<ChatApp>, payload: Value) -> Result<ActionOutcome, String> {
    let SendMessagePayload { input } = parse_payload(payload)?;
    let Some(message) = app.submit(&input) else {
        return Ok(ActionOutcome::default());
    };
    tokio::spawn(async move {
        app.request_reply(message).await;
    });
    Ok(ActionOutcome { clear_input: true })
}

// Open Settings Action
struct OpenSettingsAction;

impl UiAction for OpenSettingsAction {
    fn run(
        &self,
        app: Arc<ChatApp>,
        _payload: Value,
    ) -> BoxFuture<'static, Result<ActionOutcome, String>> {
        Box::pin(async move {
            app.open_settings().await;
            Ok(ActionOutcome::default())
        })
    }
}

// Close Settings Action
struct CloseSettingsAction;

impl UiAction for CloseSettingsAction {
    fn run(
        &self,
        app: Arc<ChatApp>,
        _payload: Value,
    ) -> BoxFuture<'static, Result<ActionOutcome, String>> {
        Box::pin(async move {
            app.close_settings();
            Ok(ActionOutcome::default())
        })
    }
}

// Save Settings Action
struct SaveSettingsAction;

impl UiAction for SaveSettingsAction {
    fn run(
        &self,
        app: Arc<ChatApp>,
        payload: Value,
    ) -> BoxFuture<'static, Result<ActionOutcome, String>> {
        Box::pin(save_settings(app, payload))
    }
}

async fn save_settings(app: Arc<ChatApp>, payload: Value) -> Result<ActionOutcome, String> {
    let SaveSettingsPayload { form } = parse_payload(payload)?;
    app.save_settings(form).await;
    Ok(ActionOutcome::default())
}

// Clear History Action
struct ClearHistoryAction;

impl UiAction for ClearHistoryAction {
    fn run(
        &self,
        app: Arc<ChatApp>,
        _payload: Value,
    ) -> BoxFuture<'static, Result<ActionOutcome, String>> {
        Box::pin(async move {
            app.clear_history().await;
            Ok(ActionOutcome::default())
        })
    }
}

// Static Action Map
pub static ACTION_MAP: Lazy<HashMap<String, Arc<dyn UiAction>>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(
        "send_message".to_string(),
        Arc::new(SendMessageAction) as Arc<dyn UiAction>,
    );
    map.insert(
        "open_settings".to_string(),
        Arc::new(OpenSettingsAction) as Arc<dyn UiAction>,
    );
    map.insert(
        "close_settings".to_string(),
        Arc::new(CloseSettingsAction) as Arc<dyn UiAction>,
    );
    map.insert(
        "save_settings".to_string(),
        Arc::new(SaveSettingsAction) as Arc<dyn UiAction>,
    );
    map.insert(
        "clear_history".to_string(),
        Arc::new(ClearHistoryAction) as Arc<dyn UiAction>,
    );
    map
});

/// Look up and run a named action. `None` if no such action exists.
pub async fn dispatch(
    name: &str,
    app: Arc<ChatApp>,
    payload: Value,
) -> Option<Result<ActionOutcome, String>> {
    let action = ACTION_MAP.get(name)?.clone();
    debug!("Running action '{}'", name);
    Some(action.run(app, payload).await)
}
