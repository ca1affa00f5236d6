use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum QrtrackError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    /// 校验失败：字段名 + 错误信息
    Validation {
        field: String,
        message: String,
    },
    Unauthorized(String),
    NotFound(String),
    SlugExhausted(String),
    Internal(String),
}

impl QrtrackError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            QrtrackError::DatabaseConfig(_) => "E001",
            QrtrackError::DatabaseConnection(_) => "E002",
            QrtrackError::DatabaseOperation(_) => "E003",
            QrtrackError::Validation { .. } => "E004",
            QrtrackError::Unauthorized(_) => "E005",
            QrtrackError::NotFound(_) => "E006",
            QrtrackError::SlugExhausted(_) => "E007",
            QrtrackError::Internal(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            QrtrackError::DatabaseConfig(_) => "Database Configuration Error",
            QrtrackError::DatabaseConnection(_) => "Database Connection Error",
            QrtrackError::DatabaseOperation(_) => "Database Operation Error",
            QrtrackError::Validation { .. } => "Validation Error",
            QrtrackError::Unauthorized(_) => "Unauthorized",
            QrtrackError::NotFound(_) => "Resource Not Found",
            QrtrackError::SlugExhausted(_) => "Slug Generation Exhausted",
            QrtrackError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            QrtrackError::DatabaseConfig(msg) => msg,
            QrtrackError::DatabaseConnection(msg) => msg,
            QrtrackError::DatabaseOperation(msg) => msg,
            QrtrackError::Validation { message, .. } => message,
            QrtrackError::Unauthorized(msg) => msg,
            QrtrackError::NotFound(msg) => msg,
            QrtrackError::SlugExhausted(msg) => msg,
            QrtrackError::Internal(msg) => msg,
        }
    }

    /// 校验错误对应的字段名（仅 Validation 变体）
    pub fn field(&self) -> Option<&str> {
        match self {
            QrtrackError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// 映射为 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            QrtrackError::Validation { .. } => StatusCode::BAD_REQUEST,
            QrtrackError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            QrtrackError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for QrtrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for QrtrackError {}

// 便捷的构造函数
impl QrtrackError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        QrtrackError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        QrtrackError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        QrtrackError::DatabaseOperation(msg.into())
    }

    pub fn validation<F: Into<String>, M: Into<String>>(field: F, msg: M) -> Self {
        QrtrackError::Validation {
            field: field.into(),
            message: msg.into(),
        }
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        QrtrackError::Unauthorized(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        QrtrackError::NotFound(msg.into())
    }

    pub fn slug_exhausted<T: Into<String>>(msg: T) -> Self {
        QrtrackError::SlugExhausted(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        QrtrackError::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, QrtrackError>;
