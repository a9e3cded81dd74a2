//! Application services: the occupancy and billing engine plus the thin
//! inventory, identity and reporting services around it.

pub mod billing;
pub mod identity;
pub mod inventory;
pub mod occupancy;
pub mod reports;

pub use billing::{billable_hours, BillingService, Charge};
pub use identity::{IdentityService, NewOperator};
pub use inventory::InventoryService;
pub use occupancy::OccupancyService;
pub use reports::{
    receipt_file_name, report_file_name, DailyReport, DailyStats, OperatorSummary, Receipt,
    ReportService,
};
