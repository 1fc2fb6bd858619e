//! 键值 flash 存储接口
//!
//! 此 crate 定义文件存储层消费的底层键值存储接口：
//!
//! - [`FlashStore`] trait - 日志结构键值存储的操作接口
//! - [`RegionDescriptor`] - flash 分区几何描述
//! - [`StoreError`] - 存储层错误类型
//! - [`RamFlashStore`] - 内存模拟实现，用于测试和开发
//!
//! 磨损均衡和 flash 几何管理由具体实现负责，对上层不可见。

#![no_std]

extern crate alloc;

mod error;
mod ram;
mod store;

pub use error::StoreError;
pub use ram::RamFlashStore;
pub use store::{FlashStore, RegionDescriptor};
