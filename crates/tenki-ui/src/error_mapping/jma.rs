use tenki_core::{AppError, FormatError, ReqwestErrorExt, RusqliteErrorExt};
use tenki_jma::JmaError;

pub trait JmaErrorExt {
    fn into_app_error(self) -> AppError;
}

impl JmaErrorExt for JmaError {
    fn into_app_error(self) -> AppError {
        match self {
            JmaError::Network(e) => AppError::Network(e.into_network_error()),
            JmaError::Format(msg) => AppError::Format(FormatError::UnexpectedShape(msg)),
            JmaError::Storage(e) => AppError::Storage(e.into_storage_error()),
        }
    }
}
