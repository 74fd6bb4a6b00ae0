//! Print the current monitor snapshot.
//!
//! Run with: cargo run --example monitors
//! JSON output: cargo run --example monitors --features serde -- --json

use screenkeep::MonitorEnumerator;

fn main() -> screenkeep::Result<()> {
    let monitors = MonitorEnumerator::system().enumerate()?;

    if std::env::args().any(|arg| arg == "--json") {
        #[cfg(feature = "serde")]
        {
            println!("{}", screenkeep::monitor::snapshot_json(&monitors)?);
            return Ok(());
        }
        #[cfg(not(feature = "serde"))]
        {
            eprintln!("JSON output requires the 'serde' feature.");
            std::process::exit(1);
        }
    }

    println!("Monitors ({})", monitors.len());
    for monitor in &monitors {
        println!("  {monitor}");
    }

    Ok(())
}
