//! 存储相关操作的 Mock 实现
//!
//! [`FaultyStore`] 包装任意 [`FlashStore`] 实现并按开关注入故障，
//! 用于验证文件存储层的错误路径（挂载失败阻塞操作、关闭时写回
//! 失败被吞掉等）。

use storage::{FlashStore, RegionDescriptor, StoreError};

/// 可注入故障的键值存储包装
pub struct FaultyStore<S> {
    /// 被包装的存储
    inner: S,

    /// 挂载时返回 [`StoreError::IoError`]
    pub fail_mount: bool,

    /// 读取和长度查询返回 [`StoreError::IoError`]
    pub fail_reads: bool,

    /// 写入返回 [`StoreError::IoError`]
    pub fail_writes: bool,

    /// 删除返回 [`StoreError::IoError`]
    pub fail_deletes: bool,

    /// 挂载调用计数（含失败的）
    pub mount_attempts: usize,

    /// 写入调用计数（含失败的）
    pub write_attempts: usize,
}

impl<S> FaultyStore<S> {
    /// 包装一个存储，所有故障开关初始为关闭
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_mount: false,
            fail_reads: false,
            fail_writes: false,
            fail_deletes: false,
            mount_attempts: 0,
            write_attempts: 0,
        }
    }

    /// 访问被包装的存储
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// 拆出被包装的存储
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: FlashStore> FlashStore for FaultyStore<S> {
    fn mount(&mut self, region: &RegionDescriptor) -> Result<(), StoreError> {
        self.mount_attempts += 1;
        if self.fail_mount {
            return Err(StoreError::IoError);
        }
        self.inner.mount(region)
    }

    fn read(&mut self, id: u16, dest: &mut [u8]) -> Result<usize, StoreError> {
        if self.fail_reads {
            return Err(StoreError::IoError);
        }
        self.inner.read(id, dest)
    }

    fn length(&mut self, id: u16) -> Result<usize, StoreError> {
        if self.fail_reads {
            return Err(StoreError::IoError);
        }
        self.inner.length(id)
    }

    fn write(&mut self, id: u16, data: &[u8]) -> Result<(), StoreError> {
        self.write_attempts += 1;
        if self.fail_writes {
            return Err(StoreError::IoError);
        }
        self.inner.write(id, data)
    }

    fn delete(&mut self, id: u16) -> Result<(), StoreError> {
        if self.fail_deletes {
            return Err(StoreError::IoError);
        }
        self.inner.delete(id)
    }
}
