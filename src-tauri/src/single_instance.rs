use std::{
    fs::{self, File, OpenOptions, TryLockError},
    path::PathBuf,
};

use tauri::{plugin::TauriPlugin, AppHandle, Manager, Runtime, WebviewWindow};

use crate::{
    append_desktop_log, append_startup_log, main_window, runtime_paths,
    window_registry::WindowRegistry, INSTANCE_LOCK_FILE, MAIN_WINDOW_LABEL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LockState {
    Acquired,
    HeldElsewhere,
    Unavailable(String),
}

/// Process-wide exclusive lock. Holding it makes this process the primary.
pub(crate) trait LockProvider {
    fn try_acquire(&mut self) -> LockState;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StartupDecision {
    Proceed,
    ExitSecondInstance,
    /// The lock could not be taken or checked; keep running without it.
    ProceedUnlocked(String),
}

pub(crate) fn decide_startup<L: LockProvider>(lock: &mut L) -> StartupDecision {
    match lock.try_acquire() {
        LockState::Acquired => StartupDecision::Proceed,
        LockState::HeldElsewhere => StartupDecision::ExitSecondInstance,
        LockState::Unavailable(reason) => StartupDecision::ProceedUnlocked(reason),
    }
}

/// Advisory lock on a file under the runtime root, held until the process exits.
#[derive(Debug)]
pub(crate) struct FileInstanceLock {
    path: Option<PathBuf>,
    held: Option<File>,
}

impl FileInstanceLock {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            held: None,
        }
    }

    pub(crate) fn in_runtime_root() -> Self {
        Self {
            path: runtime_paths::default_packaged_root_dir()
                .map(|root| root.join(INSTANCE_LOCK_FILE)),
            held: None,
        }
    }
}

impl LockProvider for FileInstanceLock {
    fn try_acquire(&mut self) -> LockState {
        if self.held.is_some() {
            return LockState::Acquired;
        }
        let Some(path) = self.path.as_ref() else {
            return LockState::Unavailable("runtime root directory is unknown".to_string());
        };
        if let Some(parent) = path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                return LockState::Unavailable(format!(
                    "Failed to create lock directory {}: {error}",
                    parent.display()
                ));
            }
        }
        let file = match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
        {
            Ok(file) => file,
            Err(error) => {
                return LockState::Unavailable(format!(
                    "Failed to open lock file {}: {error}",
                    path.display()
                ))
            }
        };
        match file.try_lock() {
            Ok(()) => {
                self.held = Some(file);
                LockState::Acquired
            }
            Err(TryLockError::WouldBlock) => LockState::HeldElsewhere,
            Err(TryLockError::Error(error)) => LockState::Unavailable(format!(
                "Failed to lock {}: {error}",
                path.display()
            )),
        }
    }
}

/// Returns false when another instance owns the lock and this process should
/// exit. The acquired lock is kept in managed state for the app's lifetime.
pub(crate) fn enforce_startup_lock(app_handle: &AppHandle) -> bool {
    let mut lock = FileInstanceLock::in_runtime_root();
    match decide_startup(&mut lock) {
        StartupDecision::Proceed => {
            append_startup_log("single-instance lock acquired");
        }
        StartupDecision::ExitSecondInstance => {
            append_startup_log("another instance holds the single-instance lock; exiting");
            return false;
        }
        StartupDecision::ProceedUnlocked(reason) => {
            append_startup_log(&format!(
                "single-instance lock unavailable, continuing without it: {reason}"
            ));
        }
    }
    app_handle.manage(lock);
    true
}

/// Window operations the guard needs from the primary window.
pub(crate) trait PrimaryWindow {
    fn is_minimized(&self) -> Result<bool, String>;
    fn unminimize(&self) -> Result<(), String>;
    fn show(&self) -> Result<(), String>;
    fn set_focus(&self) -> Result<(), String>;
}

impl<R: Runtime> PrimaryWindow for WebviewWindow<R> {
    fn is_minimized(&self) -> Result<bool, String> {
        WebviewWindow::is_minimized(self).map_err(|error| error.to_string())
    }

    fn unminimize(&self) -> Result<(), String> {
        WebviewWindow::unminimize(self).map_err(|error| error.to_string())
    }

    fn show(&self) -> Result<(), String> {
        WebviewWindow::show(self).map_err(|error| error.to_string())
    }

    fn set_focus(&self) -> Result<(), String> {
        WebviewWindow::set_focus(self).map_err(|error| error.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SecondInstanceAction {
    /// The primary window is still loading and shows itself once ready.
    AwaitReady,
    RestoreAndFocus,
    ShowAndFocus,
    CreateWindow,
}

pub(crate) fn decide_second_instance<W: PrimaryWindow>(
    primary: Option<&W>,
    still_loading: bool,
) -> SecondInstanceAction {
    match primary.map(PrimaryWindow::is_minimized) {
        None => SecondInstanceAction::CreateWindow,
        Some(_) if still_loading => SecondInstanceAction::AwaitReady,
        Some(Ok(true)) => SecondInstanceAction::RestoreAndFocus,
        Some(Ok(false)) | Some(Err(_)) => SecondInstanceAction::ShowAndFocus,
    }
}

pub(crate) fn bring_primary_window_forward<W, F>(window: &W, restore: bool, log: F)
where
    W: PrimaryWindow,
    F: Fn(&str),
{
    if restore {
        if let Err(error) = window.unminimize() {
            log(&format!("failed to restore primary window: {error}"));
        }
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show primary window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus primary window: {error}"));
    }
}

fn handle_second_instance(app_handle: &AppHandle, argv: Vec<String>, cwd: String) {
    append_desktop_log(&format!(
        "second instance launch blocked: argv={argv:?} cwd={cwd}"
    ));

    let primary = app_handle.get_webview_window(MAIN_WINDOW_LABEL);
    let still_loading = app_handle
        .try_state::<WindowRegistry>()
        .map(|registry| registry.is_waiting_for_ready(MAIN_WINDOW_LABEL))
        .unwrap_or(false);
    match decide_second_instance(primary.as_ref(), still_loading) {
        SecondInstanceAction::AwaitReady => {
            append_desktop_log("primary window is still loading; it will show when ready");
        }
        SecondInstanceAction::RestoreAndFocus => {
            if let Some(window) = primary.as_ref() {
                bring_primary_window_forward(window, true, append_desktop_log);
            }
        }
        SecondInstanceAction::ShowAndFocus => {
            if let Some(window) = primary.as_ref() {
                bring_primary_window_forward(window, false, append_desktop_log);
            }
        }
        SecondInstanceAction::CreateWindow => {
            if let Err(error) = main_window::open_main_window(app_handle) {
                append_desktop_log(&format!(
                    "failed to create window for second instance: {error}"
                ));
            }
        }
    }
}

/// Must be the first plugin registered. A second process notifies the primary
/// and exits inside the plugin before any window exists. `enforce_startup_lock`
/// covers launches the plugin lets through.
pub(crate) fn plugin() -> TauriPlugin<tauri::Wry> {
    tauri_plugin_single_instance::init(|app_handle, argv, cwd| {
        handle_second_instance(app_handle, argv, cwd);
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct FakeWindow {
        minimized: RefCell<Result<bool, String>>,
        calls: RefCell<Vec<&'static str>>,
        fail_focus: bool,
    }

    impl FakeWindow {
        fn new(minimized: bool) -> Self {
            Self {
                minimized: RefCell::new(Ok(minimized)),
                calls: RefCell::new(Vec::new()),
                fail_focus: false,
            }
        }
    }

    impl PrimaryWindow for FakeWindow {
        fn is_minimized(&self) -> Result<bool, String> {
            self.minimized.borrow().clone()
        }

        fn unminimize(&self) -> Result<(), String> {
            self.calls.borrow_mut().push("unminimize");
            *self.minimized.borrow_mut() = Ok(false);
            Ok(())
        }

        fn show(&self) -> Result<(), String> {
            self.calls.borrow_mut().push("show");
            Ok(())
        }

        fn set_focus(&self) -> Result<(), String> {
            self.calls.borrow_mut().push("set_focus");
            if self.fail_focus {
                return Err("window is gone".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn minimized_primary_is_restored_then_focused() {
        let window = FakeWindow::new(true);
        let action = decide_second_instance(Some(&window), false);
        assert_eq!(action, SecondInstanceAction::RestoreAndFocus);

        bring_primary_window_forward(&window, action == SecondInstanceAction::RestoreAndFocus, |_| {});
        assert_eq!(*window.calls.borrow(), vec!["unminimize", "show", "set_focus"]);
        assert_eq!(window.is_minimized(), Ok(false));
    }

    #[test]
    fn visible_primary_is_focused_without_restore() {
        let window = FakeWindow::new(false);
        assert_eq!(
            decide_second_instance(Some(&window), false),
            SecondInstanceAction::ShowAndFocus
        );

        bring_primary_window_forward(&window, false, |_| {});
        assert_eq!(*window.calls.borrow(), vec!["show", "set_focus"]);
    }

    #[test]
    fn unreadable_minimized_state_still_focuses() {
        let window = FakeWindow::new(false);
        *window.minimized.borrow_mut() = Err("no native handle".to_string());
        assert_eq!(
            decide_second_instance(Some(&window), false),
            SecondInstanceAction::ShowAndFocus
        );
    }

    #[test]
    fn missing_primary_creates_a_window() {
        assert_eq!(
            decide_second_instance::<FakeWindow>(None, false),
            SecondInstanceAction::CreateWindow
        );
    }

    #[test]
    fn loading_primary_is_left_hidden() {
        let window = FakeWindow::new(false);
        assert_eq!(
            decide_second_instance(Some(&window), true),
            SecondInstanceAction::AwaitReady
        );
        assert!(window.calls.borrow().is_empty());

        let minimized = FakeWindow::new(true);
        assert_eq!(
            decide_second_instance(Some(&minimized), true),
            SecondInstanceAction::AwaitReady
        );
    }

    #[test]
    fn missing_primary_is_created_even_while_loading_flag_is_set() {
        assert_eq!(
            decide_second_instance::<FakeWindow>(None, true),
            SecondInstanceAction::CreateWindow
        );
    }

    struct FakeLock {
        state: LockState,
        attempts: usize,
    }

    impl LockProvider for FakeLock {
        fn try_acquire(&mut self) -> LockState {
            self.attempts += 1;
            self.state.clone()
        }
    }

    fn fake_lock(state: LockState) -> FakeLock {
        FakeLock { state, attempts: 0 }
    }

    #[test]
    fn acquired_lock_proceeds() {
        let mut lock = fake_lock(LockState::Acquired);
        assert_eq!(decide_startup(&mut lock), StartupDecision::Proceed);
        assert_eq!(lock.attempts, 1);
    }

    #[test]
    fn lock_held_elsewhere_exits_second_instance() {
        let mut lock = fake_lock(LockState::HeldElsewhere);
        assert_eq!(decide_startup(&mut lock), StartupDecision::ExitSecondInstance);
    }

    #[test]
    fn unavailable_lock_proceeds_unlocked() {
        let mut lock = fake_lock(LockState::Unavailable("EACCES".to_string()));
        assert_eq!(
            decide_startup(&mut lock),
            StartupDecision::ProceedUnlocked("EACCES".to_string())
        );
    }

    #[test]
    fn file_lock_is_exclusive_until_released() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(INSTANCE_LOCK_FILE);

        let mut primary = FileInstanceLock::new(path.clone());
        assert_eq!(decide_startup(&mut primary), StartupDecision::Proceed);
        assert_eq!(primary.try_acquire(), LockState::Acquired);

        let mut second = FileInstanceLock::new(path.clone());
        assert_eq!(decide_startup(&mut second), StartupDecision::ExitSecondInstance);

        drop(primary);
        let mut third = FileInstanceLock::new(path);
        assert_eq!(decide_startup(&mut third), StartupDecision::Proceed);
    }

    #[test]
    fn file_lock_without_root_is_unavailable() {
        let mut lock = FileInstanceLock {
            path: None,
            held: None,
        };
        assert!(matches!(
            decide_startup(&mut lock),
            StartupDecision::ProceedUnlocked(_)
        ));
    }

    #[test]
    fn focus_failures_are_logged_not_fatal() {
        let mut window = FakeWindow::new(false);
        window.fail_focus = true;
        let logged = RefCell::new(Vec::new());

        bring_primary_window_forward(&window, false, |line| {
            logged.borrow_mut().push(line.to_string())
        });

        assert_eq!(
            *logged.borrow(),
            vec!["failed to focus primary window: window is gone".to_string()]
        );
    }
}
