//! Keep a simulated window on screen while the display layout changes.
//!
//! Run with: cargo run --example watch
//!
//! Unplug a monitor, change scaling, or move the taskbar to see the window
//! being re-placed. Press Ctrl+C to exit.

use screenkeep::notify::system_notifier;
use screenkeep::{MonitorEnumerator, MonitorHandle, VisibilityController, WindowRect};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

fn main() -> screenkeep::Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
        println!("\nStopping...");
    })
    .expect("Error setting Ctrl-C handler");

    let (wake_tx, wake_rx) = mpsc::channel::<()>();
    let mut window = WindowRect::new(100.0, 100.0, 800.0, 600.0);
    let mut controller = VisibilityController::new(MonitorEnumerator::system(), system_notifier())
        .with_waker(move || {
            let _ = wake_tx.send(());
        });
    controller.on_monitor_changed(|handle: MonitorHandle| {
        println!("Window moved to monitor {handle}");
    });

    controller.attach();
    controller.on_shown(&mut window)?;
    println!("Window placed at {window:?}");
    println!("Waiting for display changes, press Ctrl+C to exit.\n");

    while running.load(Ordering::SeqCst) {
        if wake_rx.recv_timeout(Duration::from_millis(250)).is_err() {
            continue;
        }
        let handled = controller.process_display_changes(&mut window);
        if handled > 0 {
            println!("Display change ({handled} queued), window now at {window:?}");
        }
    }

    controller.on_closed()?;
    Ok(())
}
