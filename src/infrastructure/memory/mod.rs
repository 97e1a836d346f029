//! In-Memory Implementations
//!
//! JobTracker 的内存实现

mod job_tracker;

pub use job_tracker::InMemoryJobTracker;
