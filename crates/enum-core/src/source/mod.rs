// # Subscriber Source Implementations
//
// This module provides implementations of the SubscriberSource trait for
// different ways of handing the subscriber population to the engine.

pub mod file;
pub mod memory;

pub use file::FileSubscriberSource;
pub use memory::MemorySubscriberSource;
