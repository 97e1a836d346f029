//! Application Queries - CQRS 查询

mod conversion_queries;
pub mod handlers;

pub use conversion_queries::{GetChapterAudioQuery, GetJobResultQuery, GetJobStatusQuery};
