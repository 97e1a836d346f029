//! Command Handlers

mod conversion_handlers;

pub use conversion_handlers::{
    CancelConversionHandler, SubmitConfig, SubmitConversionHandler,
};
