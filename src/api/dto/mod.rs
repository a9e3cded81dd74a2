pub mod common;
pub mod payment;
pub mod record;
pub mod report;
pub mod slot;
pub mod vehicle;

pub use common::{ApiResponse, EmptyData};
pub use payment::{PayAndReleaseRequest, PaymentDto, RecordPaymentRequest};
pub use record::{AssignVehicleRequest, ChargeDto, ParkingRecordDto};
pub use report::{DailyReportDto, DailyStatsDto, OperatorSummaryDto, ReceiptDto};
pub use slot::{ProvisionSlotsRequest, SlotDto};
pub use vehicle::{CreateVehicleRequest, UpdateVehicleRequest, VehicleDto};
