pub mod congestion_report;

pub use congestion_report::{log_to_csv, CongestionReport, RouteCongestionRecord};
