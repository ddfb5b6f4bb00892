use anyhow::Result;
use tracing::{error, info};

use budget_app::console;
use budget_app::{BudgetSession, DirectorySink, mount_export_dir};
use budget_core::{BudgetConfig, logging};
use budget_docs::encoder_for;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    let config = BudgetConfig::load()?;
    let _log_guard = logging::init_logging(&config.log_level)?;
    info!("Starting BudgetPro v{VERSION}");

    // Without a place to save documents there is nothing to run.
    let export_dir = match mount_export_dir(&config) {
        Ok(dir) => dir,
        Err(e) => {
            error!(category = ?e.category(), "Startup aborted: {e}");
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };
    info!(
        "Exports: {} as {} (default language {})",
        export_dir.display(),
        config.export_format,
        config.default_language
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut session = BudgetSession::new(
            encoder_for(config.export_format),
            Box::new(DirectorySink::new(export_dir)),
        );
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        println!("BudgetPro v{VERSION}. Type `help` for commands.");
        console::run(&mut session, stdin, stdout, config.default_language).await
    })?;

    info!("BudgetPro shutting down");
    Ok(())
}
