pub mod console;
pub mod mount;
pub mod session;
pub mod sink;

pub use mount::mount_export_dir;
pub use session::{BudgetSession, ExportOutcome};
pub use sink::DirectorySink;
