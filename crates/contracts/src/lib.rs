//! Types shared between the Billed frontend (wasm) and backend.

pub mod domain;
pub mod system;
