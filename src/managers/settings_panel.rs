use crate::settings::SettingsForm;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default)]
struct PanelState {
    open: bool,
    form: SettingsForm,
}

/// Visibility and contents of the settings modal.
#[derive(Clone, Default)]
pub struct SettingsPanelManager {
    state: Arc<Mutex<PanelState>>,
}

impl SettingsPanelManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn open(&self) {
        self.lock().open = true;
    }

    pub fn close(&self) {
        self.lock().open = false;
    }

    pub fn form(&self) -> SettingsForm {
        self.lock().form.clone()
    }

    pub fn set_form(&self, form: SettingsForm) {
        self.lock().form = form;
    }

    /// Apply `f` to the stored form in place.
    pub fn update_form(&self, f: impl FnOnce(&mut SettingsForm)) {
        f(&mut self.lock().form);
    }
}
