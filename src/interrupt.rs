//! Ctrl+C handling.

use diplo_traits::Interrupt;
use std::time::Duration;

/// Triggers `interrupt` on the first Ctrl+C.
///
/// The signal is awaited on a small dedicated runtime thread, so the
/// pipeline itself stays synchronous.
pub fn listen_for_ctrl_c(interrupt: Interrupt) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    std::thread::Builder::new()
        .name("diplo-signal".to_string())
        .spawn(move || {
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        log::warn!("Interrupted, stopping running renders ...");
                        interrupt.trigger();
                    }
                    Err(e) => log::error!("Cannot listen for Ctrl+C: {}", e),
                }
            })
        })?;
    Ok(())
}

/// Blocks the calling thread until `interrupt` is triggered.
pub fn wait_for(interrupt: &Interrupt) {
    while !interrupt.is_triggered() {
        std::thread::sleep(Duration::from_millis(200));
    }
}
