use flip_printer::NetworkPrinter;
use mail_relay::{Config, Relay, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env) and configuration
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. Logging
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;
    tracing::info!(work_dir = %config.work_dir.display(), "mail-relay starting");

    // 3. Printer
    let printer = NetworkPrinter::new(&config.printer_host, config.printer_port)?
        .with_timeout(config.printer_timeout);
    if !printer.is_online().await {
        tracing::warn!(addr = %printer.addr(), "Printer not reachable, jobs will fail");
    }

    // 4. Relay spooled messages
    let mut relay = Relay::from_config(printer, &config)?;
    loop {
        match relay.run_once().await {
            Ok(summary) => tracing::info!(
                printed = summary.printed,
                failed = summary.failed,
                skipped = summary.skipped,
                "Relay pass finished"
            ),
            // A one-shot run reports the failure, polling keeps going
            Err(e) if config.poll_interval.is_some() => {
                tracing::error!(error = %e, "Relay pass failed");
            }
            Err(e) => return Err(e.into()),
        }

        match config.poll_interval {
            Some(interval) => tokio::time::sleep(interval).await,
            None => break,
        }
    }

    Ok(())
}
