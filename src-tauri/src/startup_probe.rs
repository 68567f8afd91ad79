use std::{
    net::{TcpStream, ToSocketAddrs},
    thread,
    time::Duration,
};

use tauri::{AppHandle, Manager};
use url::Url;

use crate::window_registry::WindowRegistry;

pub fn ping_dev_server(dev_server_url: &Url, timeout_ms: u64) -> bool {
    let Some(host) = dev_server_url.host_str() else {
        return false;
    };
    let port = dev_server_url.port_or_known_default().unwrap_or(80);
    let timeout = Duration::from_millis(timeout_ms.max(50));

    let addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs.collect::<Vec<_>>(),
        Err(_) => return false,
    };
    addrs
        .iter()
        .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
}

/// Logs an error if `label` is still hidden after `timeout`. The window is left
/// hidden; this only makes a stuck load visible in the log.
pub fn spawn_load_watchdog<F>(app_handle: AppHandle, label: String, timeout: Duration, log: F)
where
    F: Fn(&str) + Send + 'static,
{
    thread::spawn(move || {
        thread::sleep(timeout);
        let still_waiting = app_handle
            .try_state::<WindowRegistry>()
            .map(|registry| registry.is_waiting_for_ready(&label))
            .unwrap_or(false);
        if still_waiting {
            log(&format!(
                "window '{label}' content did not finish loading within {}ms; window stays hidden",
                timeout.as_millis()
            ));
        }
    });
}
