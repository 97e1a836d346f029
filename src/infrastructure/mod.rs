//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod extractor;
pub mod http;
pub mod memory;
pub mod worker;

pub use extractor::FormatDocumentExtractor;
pub use memory::InMemoryJobTracker;
pub use worker::{ConversionWorker, ConversionWorkerConfig};
