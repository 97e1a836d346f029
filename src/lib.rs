//! Voxbook - 文档转有声书服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Document: 文档格式与规范化文本
//! - Chapter / Segmenter: 章节切分
//! - Tier: 访问层级截断策略
//! - Audiobook: 结果装配与转换统计
//!
//! 应用层 (application/):
//! - Ports: 端口定义（DocumentExtractor, TtsEngine, AudioStorage, JobTracker）
//! - Commands: CQRS 命令处理器（提交、取消）
//! - Queries: CQRS 查询处理器（状态、结果、音频）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API（轮询式作业接口）
//! - Extractor: PDF / EPUB / TXT 文本提取
//! - Memory: JobTracker 内存实现
//! - Worker: ConversionWorker 后台章节合成
//! - Adapters: TTS Client, 音频文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
