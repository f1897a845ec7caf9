//! Maps domain errors to tenki_core::AppError for consistent user-facing messages.

mod jma;

pub use jma::JmaErrorExt;
