//! 部屋の保管（Repository）の実装
//!
//! ## 実装
//!
//! - `inmemory`: HashMap を使ったインメモリ実装

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
