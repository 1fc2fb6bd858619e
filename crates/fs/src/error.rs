//! 文件存储层错误类型
//!
//! 定义了文件存储层的错误码，可通过 [`FsError::to_errno()`] 转换为协议层使用的负数错误码。

use storage::StoreError;

/// 文件存储层错误类型
///
/// 各错误码对应标准 POSIX errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// 文件不存在 (-ENOENT)
    NotFound,
    /// 无效或过期的文件句柄 (-EBADF)
    BadHandle,
    /// 没有空闲的句柄槽位 (-EMFILE)
    NoFreeHandles,
    /// 无效参数 (-EINVAL)
    InvalidArgument,
    /// 路径超过最大长度 (-ENAMETOOLONG)
    NameTooLong,
    /// 写入超出缓冲区容量或存储空间不足 (-ENOSPC)
    NoSpace,
    /// 存储区域挂载失败 (-ENODEV)
    NoDevice,
    /// 底层存储 I/O 失败 (-EIO)
    IoError,
}

impl FsError {
    /// 转换为协议层错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            FsError::NotFound => -2,
            FsError::IoError => -5,
            FsError::BadHandle => -9,
            FsError::NoDevice => -19,
            FsError::InvalidArgument => -22,
            FsError::NoFreeHandles => -24,
            FsError::NoSpace => -28,
            FsError::NameTooLong => -36,
        }
    }
}

impl From<StoreError> for FsError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => FsError::NotFound,
            StoreError::NotMounted | StoreError::InvalidRegion => FsError::NoDevice,
            StoreError::NoSpace => FsError::NoSpace,
            StoreError::IoError => FsError::IoError,
        }
    }
}
