use std::{collections::BTreeMap, sync::Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyDecision {
    ShowNow,
    AlreadyShown,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationDecision {
    CreateWindow,
    FocusExisting,
}

#[derive(Debug, Default, Clone, Copy)]
struct WindowRecord {
    shown: bool,
}

/// Top-level windows created by the shell, keyed by label.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: Mutex<BTreeMap<String, WindowRecord>>,
}

impl WindowRegistry {
    /// Returns false when a live window already holds `label`.
    pub fn register(&self, label: &str) -> bool {
        let Ok(mut windows) = self.windows.lock() else {
            return false;
        };
        if windows.contains_key(label) {
            return false;
        }
        windows.insert(label.to_string(), WindowRecord::default());
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.windows
            .lock()
            .map(|windows| windows.contains_key(label))
            .unwrap_or(false)
    }

    pub fn remove(&self, label: &str) -> bool {
        self.windows
            .lock()
            .map(|mut windows| windows.remove(label).is_some())
            .unwrap_or(false)
    }

    /// One-shot transition from hidden to shown for a registered window.
    pub fn mark_ready(&self, label: &str) -> ReadyDecision {
        let Ok(mut windows) = self.windows.lock() else {
            return ReadyDecision::Unknown;
        };
        match windows.get_mut(label) {
            Some(record) if record.shown => ReadyDecision::AlreadyShown,
            Some(record) => {
                record.shown = true;
                ReadyDecision::ShowNow
            }
            None => ReadyDecision::Unknown,
        }
    }

    pub fn is_waiting_for_ready(&self, label: &str) -> bool {
        self.windows
            .lock()
            .ok()
            .and_then(|windows| windows.get(label).map(|record| !record.shown))
            .unwrap_or(false)
    }

    pub fn open_window_count(&self) -> usize {
        self.windows
            .lock()
            .map(|windows| windows.len())
            .unwrap_or(0)
    }

    pub fn decide_activation(&self) -> ActivationDecision {
        if self.open_window_count() == 0 {
            ActivationDecision::CreateWindow
        } else {
            ActivationDecision::FocusExisting
        }
    }
}
