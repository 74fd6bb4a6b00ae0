//! Print the monitor snapshot on every display change, with Tokio.
//!
//! Run with: cargo run --example watch_async --features tokio

use screenkeep::MonitorEnumerator;
use screenkeep::notify::{display_change_channel, system_notifier};
use std::time::Duration;
use tokio::time::interval;

#[tokio::main]
async fn main() -> screenkeep::Result<()> {
    let enumerator = MonitorEnumerator::system();
    let (guard, mut rx) = display_change_channel(system_notifier(), 8)?;

    println!("Watching display changes, press Ctrl+C to exit.\n");

    let mut changes = 0u32;
    let mut heartbeat = interval(Duration::from_secs(30));

    loop {
        tokio::select! {
            change = rx.recv() => {
                if change.is_none() {
                    println!("Notifier closed.");
                    break;
                }
                changes += 1;
                match enumerator.enumerate() {
                    Ok(monitors) => {
                        println!("[{changes}] {} monitor(s)", monitors.len());
                        for monitor in &monitors {
                            println!("  {monitor}");
                        }
                    }
                    Err(e) => eprintln!("[{changes}] enumeration failed: {e}"),
                }
            }
            _ = heartbeat.tick() => {
                println!("... still watching ({changes} changes so far)");
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    guard.cancel()
}
