//! Application Ports - 端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_storage;
mod document_extractor;
mod job_tracker;
mod tts_engine;

pub use audio_storage::{AudioStorageError, AudioStoragePort};
pub use document_extractor::{resolve_format, DocumentExtractorPort, ExtractError};
pub use job_tracker::{ConversionJob, JobError, JobStatus, JobTrackerPort};
pub use tts_engine::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
