//! Input validation ahead of flow computation
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod network;

pub use self::network::{NetworkError, NetworkValidator};
