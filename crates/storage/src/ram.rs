//! 内存模拟键值存储

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use uapi::log::Subsystem;

use crate::store::{FlashStore, RegionDescriptor};
use crate::StoreError;

const TAG: &str = Subsystem::Storage.as_str();

/// 内存模拟的键值 flash 存储
///
/// 用于测试和开发。条目在挂载之间保留，模拟 flash 的持久语义；
/// 容量按区域大小约束，写入超出时返回 [`StoreError::NoSpace`]。
pub struct RamFlashStore {
    /// 键 -> 条目内容
    entries: BTreeMap<u16, Vec<u8>>,

    /// 区域总容量（挂载时确定）
    capacity: usize,

    /// 是否已挂载
    mounted: bool,
}

impl RamFlashStore {
    /// 创建未挂载的空存储
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity: 0,
            mounted: false,
        }
    }

    /// 获取条目内容（用于调试）
    pub fn entry(&self, id: u16) -> Option<&[u8]> {
        self.entries.get(&id).map(|e| e.as_slice())
    }

    /// 当前条目数量
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// 已占用的字节数
    pub fn used_bytes(&self) -> usize {
        self.entries.values().map(|e| e.len()).sum()
    }

    fn ensure_mounted(&self) -> Result<(), StoreError> {
        if self.mounted {
            Ok(())
        } else {
            Err(StoreError::NotMounted)
        }
    }
}

impl Default for RamFlashStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashStore for RamFlashStore {
    fn mount(&mut self, region: &RegionDescriptor) -> Result<(), StoreError> {
        if region.is_empty() {
            return Err(StoreError::InvalidRegion);
        }

        // 重复挂载幂等；已有条目保留
        self.capacity = region.len();
        self.mounted = true;
        log::info!(
            target: TAG,
            "ram store mounted: offset={:#x} sector_size={} sector_count={}",
            region.offset,
            region.sector_size,
            region.sector_count
        );
        Ok(())
    }

    fn read(&mut self, id: u16, dest: &mut [u8]) -> Result<usize, StoreError> {
        self.ensure_mounted()?;

        let entry = self.entries.get(&id).ok_or(StoreError::NotFound)?;
        let n = dest.len().min(entry.len());
        dest[..n].copy_from_slice(&entry[..n]);
        Ok(n)
    }

    fn length(&mut self, id: u16) -> Result<usize, StoreError> {
        self.ensure_mounted()?;

        self.entries
            .get(&id)
            .map(|e| e.len())
            .ok_or(StoreError::NotFound)
    }

    fn write(&mut self, id: u16, data: &[u8]) -> Result<(), StoreError> {
        self.ensure_mounted()?;

        let old = self.entries.get(&id).map(|e| e.len()).unwrap_or(0);
        let used = self.used_bytes();
        if used - old + data.len() > self.capacity {
            log::warn!(target: TAG, "write rejected: id={:#06x} len={} used={}", id, data.len(), used);
            return Err(StoreError::NoSpace);
        }

        self.entries.insert(id, data.to_vec());
        Ok(())
    }

    fn delete(&mut self, id: u16) -> Result<(), StoreError> {
        self.ensure_mounted()?;

        self.entries
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
