use super::SOCKET_PATH;
use crate::events::AppEvent;
use std::io::Write;
use std::os::unix::net::UnixStream;

pub fn send_event(event: &AppEvent) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to ringmask demo at {}: {}. Is it running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", event)?;
    Ok(())
}
