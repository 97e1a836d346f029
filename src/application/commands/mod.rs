//! Application Commands - CQRS 命令

mod conversion_commands;
pub mod handlers;

pub use conversion_commands::{
    CancelConversionCommand, SubmitConversionCommand, SubmitConversionResponse,
};
