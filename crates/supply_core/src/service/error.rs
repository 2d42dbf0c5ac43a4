//! Errors reported to view callers.

use crate::model::order::{OrderId, OrderValidationError};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;
pub type ImportResult<T> = Result<T, ImportError>;

/// Reasons an import payload is rejected as a whole.
#[derive(Debug)]
pub enum ImportError {
    /// The payload file could not be read.
    Io(std::io::Error),
    /// The payload is not JSON.
    Parse(serde_json::Error),
    /// The payload root is not a JSON object.
    NotAnObject,
    /// A required top-level collection is absent or not an array.
    MissingCollection(&'static str),
    /// A record inside a collection could not be accepted.
    InvalidRecord {
        collection: &'static str,
        index: usize,
    },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read import file: {err}"),
            Self::Parse(err) => write!(f, "import payload is not valid JSON: {err}"),
            Self::NotAnObject => write!(
                f,
                "invalid JSON structure; expected {{ buildings: [], orders: [], inventory: [] }}"
            ),
            Self::MissingCollection(key) => {
                write!(f, "invalid JSON structure; `{key}` must be an array")
            }
            Self::InvalidRecord { collection, index } => {
                write!(f, "invalid record at {collection}[{index}]")
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Failure of a mutation or view operation.
#[derive(Debug)]
pub enum ServiceError {
    Validation(OrderValidationError),
    OrderNotFound(OrderId),
    ItemNotFound(String),
    /// The order is delivered; its status is terminal.
    OrderDelivered(OrderId),
    /// The largest order id is already `OrderId::MAX`.
    OrderIdsExhausted,
    Import(ImportError),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::OrderNotFound(id) => write!(f, "order not found: #{id}"),
            Self::ItemNotFound(name) => write!(f, "inventory item not found: `{name}`"),
            Self::OrderDelivered(id) => write!(f, "order #{id} is already delivered"),
            Self::OrderIdsExhausted => write!(f, "no order id left after #{}", OrderId::MAX),
            Self::Import(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Stable code for log lines and caller-side message lookup.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::OrderNotFound(_) => "order_not_found",
            Self::ItemNotFound(_) => "item_not_found",
            Self::OrderDelivered(_) => "order_terminal",
            Self::OrderIdsExhausted => "order_ids_exhausted",
            Self::Import(_) => "import_rejected",
            Self::Store(_) => "store_failed",
        }
    }
}

impl From<OrderValidationError> for ServiceError {
    fn from(value: OrderValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ImportError> for ServiceError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
