//! User Service
//!
//! gRPC service for the user directory. Exposes list/get/upsert/delete,
//! each backed by exactly one parameterized SQL statement against the
//! `users` table.
//!
//! Re-exports the tonic-generated types, the storage trait and its
//! Postgres and in-memory implementations, and the gRPC service wrapper
//! for use by the gateway and by tests.

pub mod grpc;
pub mod storage;

/// tonic-generated types for the `user` proto package.
pub mod proto {
    tonic::include_proto!("user");
}

pub use grpc::UserServiceGrpcService;
pub use storage::{MemoryUserStorage, PgUserStorage, StorageError, UserStorage};
