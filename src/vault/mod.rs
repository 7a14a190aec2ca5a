//! Vault storage: the store seam, the on-disk vault, and an in-memory fake.

pub mod fs_store;
pub mod memory;
pub mod store;
