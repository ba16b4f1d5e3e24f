// Domain models

mod pages;
mod stats;
mod violation;

pub use pages::{Analytics, DATA_UNAVAILABLE, DailyDashboard, LiveBoard, LiveMessage, Overview};
pub use stats::{DailyCount, DurationStats, HourlyCount, PlateCount, Summary, VehicleTypeCount};
pub use violation::{
    NewViolation, ResolveOutcome, UNKNOWN_VEHICLE_TYPE, ViolationRecord, ViolationStatus,
    normalize_duration, normalize_text, normalize_vehicle_type,
};
