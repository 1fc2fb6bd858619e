//! 文件句柄和句柄池
//!
//! 句柄池是容量固定的 slot 数组；open 通过线性扫描认领第一个空闲
//! slot，close 归还。每个 slot 携带代数计数：归还时代数递增，使得
//! 已释放句柄的 [`FileId`] 永远无法再解析到复用后的 slot。

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::{FsConfig, FsError};

/// 打开文件的不透明引用
///
/// 由句柄池在认领 slot 时签发；close 之后失效，继续使用返回
/// [`FsError::BadHandle`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileId {
    slot: usize,
    generation: u32,
}

/// 一个打开文件的内存状态
#[derive(Debug)]
pub(crate) struct FileHandle {
    /// 键值存储中的标识符
    pub storage_id: u16,

    /// 文件内容缓冲区（容量固定为配置的最大文件大小）
    pub buf: Vec<u8>,

    /// 当前逻辑大小（≤ 缓冲区容量）
    pub size: usize,

    /// 当前读写位置
    pub pos: usize,

    /// 原始路径
    pub path: String,

    /// 打开以来是否被写入过
    pub modified: bool,
}

impl FileHandle {
    /// 创建新句柄，缓冲区按配置的擦除字节初始化
    pub(crate) fn new(storage_id: u16, path: &str, config: &FsConfig) -> Self {
        Self {
            storage_id,
            buf: vec![config.erase_byte; config.max_file_size],
            size: 0,
            pos: 0,
            path: String::from(path),
            modified: false,
        }
    }
}

/// 句柄池 slot
struct Slot {
    /// 代数计数，归还时递增
    generation: u32,

    /// 占用此 slot 的句柄
    handle: Option<FileHandle>,
}

/// 容量固定的文件句柄池
pub(crate) struct HandleArena {
    slots: Vec<Slot>,
}

impl fmt::Debug for HandleArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleArena")
            .field("slots", &self.slots.len())
            .field("used", &self.open_count())
            .finish()
    }
}

impl HandleArena {
    /// 创建指定容量的句柄池
    pub(crate) fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            slots.push(Slot {
                generation: 0,
                handle: None,
            });
        }
        Self { slots }
    }

    /// 当前打开的句柄数量
    pub(crate) fn open_count(&self) -> usize {
        self.slots.iter().filter(|s| s.handle.is_some()).count()
    }

    /// 是否已没有空闲 slot
    pub(crate) fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.handle.is_some())
    }

    /// 认领第一个空闲 slot
    ///
    /// 除"某个空闲 slot"外不保证任何顺序。池满时返回
    /// [`FsError::NoFreeHandles`]。
    pub(crate) fn claim(&mut self, handle: FileHandle) -> Result<FileId, FsError> {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.handle.is_none() {
                entry.handle = Some(handle);
                return Ok(FileId {
                    slot,
                    generation: entry.generation,
                });
            }
        }
        Err(FsError::NoFreeHandles)
    }

    /// 解析句柄引用，代数不匹配或 slot 空闲时拒绝
    pub(crate) fn get_mut(&mut self, id: FileId) -> Result<&mut FileHandle, FsError> {
        let entry = self.slots.get_mut(id.slot).ok_or(FsError::BadHandle)?;
        if entry.generation != id.generation {
            return Err(FsError::BadHandle);
        }
        entry.handle.as_mut().ok_or(FsError::BadHandle)
    }

    /// 归还 slot，返回其中的句柄供调用方收尾
    ///
    /// slot 代数随归还递增，之前签发的 [`FileId`] 全部失效。
    pub(crate) fn release(&mut self, id: FileId) -> Result<FileHandle, FsError> {
        let entry = self.slots.get_mut(id.slot).ok_or(FsError::BadHandle)?;
        if entry.generation != id.generation {
            return Err(FsError::BadHandle);
        }
        let handle = entry.handle.take().ok_or(FsError::BadHandle)?;
        entry.generation = entry.generation.wrapping_add(1);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FsConfig {
        FsConfig {
            max_file_size: 16,
            max_open_files: 2,
            ..FsConfig::default()
        }
    }

    fn new_handle(config: &FsConfig) -> FileHandle {
        FileHandle::new(0x1234, "/test", config)
    }

    #[test]
    fn test_buffer_erase_pattern() {
        let config = test_config();
        let handle = new_handle(&config);
        assert_eq!(handle.buf.len(), 16);
        assert!(handle.buf.iter().all(|&b| b == config.erase_byte));
        assert_eq!(handle.size, 0);
        assert!(!handle.modified);
    }

    #[test]
    fn test_claim_until_full() {
        let config = test_config();
        let mut arena = HandleArena::new(2);

        let a = arena.claim(new_handle(&config)).unwrap();
        let b = arena.claim(new_handle(&config)).unwrap();
        assert_ne!(a, b);
        assert!(arena.is_full());
        assert_eq!(
            arena.claim(new_handle(&config)).unwrap_err(),
            FsError::NoFreeHandles
        );

        arena.release(a).unwrap();
        assert!(!arena.is_full());
        arena.claim(new_handle(&config)).unwrap();
    }

    #[test]
    fn test_stale_id_rejected_after_release() {
        let config = test_config();
        let mut arena = HandleArena::new(1);

        let old = arena.claim(new_handle(&config)).unwrap();
        arena.release(old).unwrap();

        // slot 被复用后，旧 id 必须失效
        let fresh = arena.claim(new_handle(&config)).unwrap();
        assert_eq!(arena.get_mut(old).unwrap_err(), FsError::BadHandle);
        assert_eq!(arena.release(old).unwrap_err(), FsError::BadHandle);
        assert!(arena.get_mut(fresh).is_ok());
    }

    #[test]
    fn test_double_release_rejected() {
        let config = test_config();
        let mut arena = HandleArena::new(1);

        let id = arena.claim(new_handle(&config)).unwrap();
        arena.release(id).unwrap();
        assert_eq!(arena.release(id).unwrap_err(), FsError::BadHandle);
    }
}
