use sqlx::{Database, Error as SqlxError, Transaction, error::ErrorKind};
use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum DatabaseError {
    NotFound(String),
    Validation(String),
    Conflict(String),
    ForeignKeyViolation(String),
    ConstraintViolation(String),
    CommunicationError,
    ConnectionFailed,
    ConnectionNotAvailable,
    QueryFailed(String),
    ColumnNotFound(String),
    ProtocolNotSupported,
    Unknown(String),
    DatabaseInconsistence(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            DatabaseError::Validation(msg) => write!(f, "Validation Failed: {msg}"),
            DatabaseError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            DatabaseError::ForeignKeyViolation(msg) => {
                write!(f, "Foreign Key Violation: {msg}")
            }
            DatabaseError::ConstraintViolation(msg) => write!(f, "Constraint Violation: {msg}"),
            DatabaseError::CommunicationError => write!(f, "Communication Error"),
            DatabaseError::ConnectionFailed => write!(f, "Connection Failed"),
            DatabaseError::ConnectionNotAvailable => write!(f, "Connection Not Available"),
            DatabaseError::QueryFailed(msg) => write!(f, "Query Failed: {msg}"),
            DatabaseError::ColumnNotFound(column) => write!(f, "Column Not Found: {column}"),
            DatabaseError::ProtocolNotSupported => write!(f, "Protocol Not Supported"),
            DatabaseError::Unknown(msg) => write!(f, "Unknown Error: {msg}"),
            DatabaseError::DatabaseInconsistence(msg) => {
                write!(f, "Database Inconsistency: {msg}")
            }
        }
    }
}

impl std::error::Error for DatabaseError {}

impl From<SqlxError> for DatabaseError {
    fn from(value: SqlxError) -> Self {
        match value {
            SqlxError::RowNotFound => Self::NotFound("No rows returned".to_string()),
            SqlxError::ColumnNotFound(column_name) => Self::ColumnNotFound(column_name),
            SqlxError::Io(_) | SqlxError::Tls(_) => Self::CommunicationError,
            SqlxError::PoolTimedOut => Self::ConnectionNotAvailable,
            SqlxError::Database(e) => match e.kind() {
                ErrorKind::UniqueViolation => Self::Conflict(e.message().to_string()),
                ErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(e.message().to_string()),
                ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                    Self::ConstraintViolation(e.message().to_string())
                }
                _ => Self::QueryFailed(e.to_string()),
            },
            SqlxError::Protocol(_) => Self::ProtocolNotSupported,
            SqlxError::TypeNotFound { type_name } => {
                Self::DatabaseInconsistence(format!("TypeNotFound {type_name}"))
            }
            SqlxError::ColumnDecode { index, source } => {
                Self::DatabaseInconsistence(format!("ColumnDecode {index}: {source}"))
            }
            _ => Self::ConnectionFailed,
        }
    }
}

/// Storage operations shared by every entity.
///
/// Each operation runs inside the caller's transaction so a handler decides
/// where the unit of work begins and ends.
#[async_trait::async_trait]
pub trait EntityRepository {
    type Db: Database;
    type Entity: Send;
    type CreateInput: Send;
    type UpdateInput: Send;
    type QueryOne: Send + Sync;
    type QueryMany: Send + Sync;

    async fn insert(
        tx: &mut Transaction<'_, Self::Db>,
        input: Self::CreateInput,
    ) -> Result<Self::Entity, DatabaseError>;
    async fn delete(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Self::Entity, DatabaseError>;
    async fn update(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
        update: Self::UpdateInput,
    ) -> Result<Self::Entity, DatabaseError>;
    async fn get(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Self::Entity, DatabaseError>;
    async fn try_get(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<Option<Self::Entity>, DatabaseError>;
    async fn get_all(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryMany,
    ) -> Result<Vec<Self::Entity>, DatabaseError>;

    async fn exists(
        tx: &mut Transaction<'_, Self::Db>,
        key: Self::QueryOne,
    ) -> Result<bool, DatabaseError>;
}
