pub mod coerce;
pub mod config;
pub mod error_handler;
pub mod locale;
pub mod logging;
pub mod model;
pub mod notifications;
pub mod rows;
pub mod totals;

pub use config::{BudgetConfig, ExportFormat};
pub use error_handler::{BudgetError, ErrorCategory};
pub use locale::Language;
pub use model::{
    BudgetState, DietInfo, Keyed, LaborItem, Material, ProjectInfo, RowKey, Signatures, Unit,
    WorkerInfo, WorkerRole,
};
pub use notifications::{AppNotification, NotificationStore, NotificationType};
pub use rows::{DietField, FormEvent, LaborField, MaterialField, ProjectField, SignatureField};
pub use totals::Totals;
