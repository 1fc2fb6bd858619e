//! 存储层错误类型

/// 键值存储操作的错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// 存储区域尚未挂载
    NotMounted,
    /// 指定键下没有条目
    NotFound,
    /// 存储区域空间不足
    NoSpace,
    /// 区域描述无效，无法挂载
    InvalidRegion,
    /// 底层 I/O 失败
    IoError,
}
