//! Reunion Service
//!
//! gRPC service for meetings ("reunions"). CRUD mirrors the user
//! service; two extra operations manage participant membership, which is
//! persisted as a single comma-joined `user_ids` text column.

pub mod grpc;
pub mod participants;
pub mod storage;

/// tonic-generated types for the `reunion` proto package.
pub mod proto {
    tonic::include_proto!("reunion");
}

pub use grpc::ReunionServiceGrpcService;
pub use storage::{MemoryReunionStorage, PgReunionStorage, ReunionStorage, StorageError};
