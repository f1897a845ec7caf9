//! Centralized error types for the Tenki application.
//!
//! Every failure the controller can surface is convertible to [`AppError`].
//! Use `user_message()` for a short display-ready message.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Format(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
        }
    }
}

/// Transport or HTTP status failures.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => "接続できません。ネットワークを確認してください。",
            NetworkError::Timeout => "リクエストがタイムアウトしました。",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "サーバーで問題が発生しています。しばらくしてから再試行してください。"
            }
            NetworkError::ServerError { .. } => "リクエストに失敗しました。",
        }
    }
}

/// The response did not have the expected JSON shape.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),
}

impl FormatError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FormatError::UnexpectedShape(_) => "応答の形式が想定と異なります。",
        }
    }
}

/// Local store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store could not be opened: {0}")]
    OpenFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Data corruption detected: {0}")]
    Corruption(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::OpenFailed(_) => "ローカルデータを開けません。",
            StorageError::QueryFailed(_) => "ローカルデータの操作に失敗しました。",
            StorageError::Corruption(_) => "ローカルデータが破損している可能性があります。",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "設定が正しくありません。",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

/// Extension trait for converting rusqlite errors to our error types.
pub trait RusqliteErrorExt {
    fn into_storage_error(self) -> StorageError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_storage_error(self) -> StorageError {
        match &self {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("corrupt") => {
                StorageError::Corruption(self.to_string())
            }
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::CannotOpen =>
            {
                StorageError::OpenFailed(self.to_string())
            }
            rusqlite::Error::FromSqlConversionFailure(..) => {
                StorageError::Corruption(self.to_string())
            }
            _ => StorageError::QueryFailed(self.to_string()),
        }
    }
}
