//! Background Worker - 有声书转换后台处理

mod conversion_worker;

pub use conversion_worker::{ConversionWorker, ConversionWorkerConfig};
