use crate::events::AppEvent;
use async_channel::Sender;
use std::thread::{self, JoinHandle};
use tokio::runtime::Runtime;

/// Control socket and config watcher running on their own tokio thread.
pub struct BackgroundServices {
    shutdown: Sender<()>,
    thread: JoinHandle<()>,
}

/// Starts the control socket and the config watcher. Everything they produce reaches the
/// ui through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>) -> BackgroundServices {
    let (shutdown, shutdown_rx) = async_channel::bounded::<()>(1);

    let thread = thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            tokio::spawn(crate::sys::server::run_server(tx.clone()));
            tokio::spawn(crate::config::run_async_watcher(tx));

            // closed or signalled, either way we are done
            let _ = shutdown_rx.recv().await;
        });
        rt.shutdown_background();
        crate::sys::server::remove_socket(std::path::Path::new(crate::sys::SOCKET_PATH));
    });

    BackgroundServices { shutdown, thread }
}

impl BackgroundServices {
    /// Stops both services and removes the socket file.
    pub fn stop(self) {
        let _ = self.shutdown.try_send(());
        if self.thread.join().is_err() {
            log::error!("Background services thread panicked");
        }
        log::debug!("Background services stopped");
    }
}
