//! 键值存储操作接口
//!
//! 此模块定义文件存储层依赖的外部存储接口，通过 trait 抽象与具体的
//! flash 驱动解耦。键为固定宽度的 16 位标识符，值为完整的字节块；
//! 每个键下至多存在一个条目，写入总是整体覆盖。

use crate::StoreError;

/// flash 分区几何描述
///
/// 挂载时传入，描述键值存储可使用的 flash 区域。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionDescriptor {
    /// 区域在 flash 中的起始偏移
    pub offset: usize,
    /// 扇区大小（字节）
    pub sector_size: usize,
    /// 扇区数量
    pub sector_count: usize,
}

impl RegionDescriptor {
    /// 创建区域描述
    pub const fn new(offset: usize, sector_size: usize, sector_count: usize) -> Self {
        Self {
            offset,
            sector_size,
            sector_count,
        }
    }

    /// 区域总大小（字节）
    pub const fn len(&self) -> usize {
        self.sector_size * self.sector_count
    }

    /// 区域是否为空
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 日志结构键值存储的操作接口
///
/// 所有操作都是有界的同步调用；实现不得在内部挂起。
/// 挂载前的任何读写操作返回 [`StoreError::NotMounted`]。
pub trait FlashStore {
    /// 挂载存储区域
    ///
    /// 重复挂载是幂等的；已有条目在重新挂载后仍然可见（flash 持久语义）。
    fn mount(&mut self, region: &RegionDescriptor) -> Result<(), StoreError>;

    /// 读取键下的条目，最多复制 `dest.len()` 字节
    ///
    /// # 返回值
    /// 实际复制的字节数（条目长度与 `dest.len()` 的较小值）
    fn read(&mut self, id: u16, dest: &mut [u8]) -> Result<usize, StoreError>;

    /// 查询键下条目的长度，不传输内容
    fn length(&mut self, id: u16) -> Result<usize, StoreError>;

    /// 将条目整体写入键下，覆盖已有内容
    fn write(&mut self, id: u16, data: &[u8]) -> Result<(), StoreError>;

    /// 删除键下的条目
    ///
    /// 键不存在时返回 [`StoreError::NotFound`]，由调用方决定是否视为成功。
    fn delete(&mut self, id: u16) -> Result<(), StoreError>;
}
