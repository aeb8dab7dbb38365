//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use batchq_core::error::AppError;
use batchq_core::QueueError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const QUEUE_FULL: i32 = 4004;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERIALIZATION_ERROR: i32 = 5003;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Queue(e @ QueueError::QueueFull { .. }) => {
            ErrorObjectOwned::owned(code::QUEUE_FULL, e.to_string(), None::<()>)
        }
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::SERIALIZATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Config(msg) | AppError::Internal(msg) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>)
        }
    }
}
