//! NETFLOW Algorithm Framework
//! Maximum flow and the assignment problems reduced to it
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod traits;
pub mod graph;

pub use self::traits::*;
pub use self::graph::*;
