//! 与卡片协议层共用的定义和声明
//!
//! 包含打开模式、seek 起点和日志子系统标签，确保文件存储层和协议层的一致性

#![no_std]

pub mod fcntl;
pub mod log;
