// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Persistent storage drivers

pub mod memory;
#[cfg(feature = "sled-backend")]
pub mod sled_driver;
pub mod traits;
pub mod types;

pub use memory::MemoryDriver;
pub use traits::{StorageDriver, StorageTree};
pub use types::StorageType;

use std::path::Path;

use crate::storage::types::{StorageError, StorageResult};

/// Open a driver of the requested type
pub fn create_driver(
    storage_type: StorageType,
    path: Option<&Path>,
) -> StorageResult<Box<dyn StorageDriver>> {
    match storage_type {
        StorageType::Memory => Ok(Box::new(MemoryDriver::new())),
        #[cfg(feature = "sled-backend")]
        StorageType::Sled => {
            let path = path.ok_or_else(|| {
                StorageError::Configuration("sled storage requires a database path".to_string())
            })?;
            Ok(Box::new(sled_driver::SledDriver::open(path)?))
        }
        #[cfg(not(feature = "sled-backend"))]
        StorageType::Sled => {
            let _ = path;
            Err(StorageError::Configuration(
                "sled support was not compiled in (enable the 'sled-backend' feature)".to_string(),
            ))
        }
    }
}
