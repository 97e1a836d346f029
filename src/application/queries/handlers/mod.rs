//! Query Handlers

mod conversion_handlers;

pub use conversion_handlers::{
    GetChapterAudioHandler, GetJobResultHandler, GetJobStatusHandler, ListJobsHandler,
};
