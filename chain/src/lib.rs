//! Explorer defaults shared by the client, the sync engine and the binary.

pub mod config;
