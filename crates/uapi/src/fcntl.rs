//! 文件打开模式和 seek 起点定义
//!
//! 打开模式沿用 stdio 的模式字符串约定：
//!
//! - `r` = 读取已有文件（文件必须存在，除非同时给出 `w` 或 `+`）
//! - `w` = 截断/创建
//! - `+` = 同时允许读和写
//!
//! 未识别的字符被忽略，与 stdio 实现的宽松处理一致。

use bitflags::bitflags;

bitflags! {
    /// 解析后的文件打开模式
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenMode: u8 {
        /// 允许读取，打开时加载已有内容
        const READ = 1 << 0;
        /// 允许写入
        const WRITE = 1 << 1;
        /// 打开时将逻辑大小截断为 0
        const TRUNCATE = 1 << 2;
    }
}

impl OpenMode {
    /// 从 stdio 风格的模式字符串解析打开模式
    ///
    /// 逐字符扫描：`r` 置位 [`READ`](OpenMode::READ)，`w` 置位
    /// [`WRITE`](OpenMode::WRITE) 和 [`TRUNCATE`](OpenMode::TRUNCATE)，
    /// `+` 同时置位读写。其余字符忽略。
    pub fn parse(mode: &str) -> Self {
        let mut flags = OpenMode::empty();
        for c in mode.bytes() {
            match c {
                b'r' => flags |= OpenMode::READ,
                b'w' => flags |= OpenMode::WRITE | OpenMode::TRUNCATE,
                b'+' => flags |= OpenMode::READ | OpenMode::WRITE,
                _ => {}
            }
        }
        flags
    }

    /// 是否需要在打开时加载已有内容
    pub fn loads_existing(self) -> bool {
        self.contains(OpenMode::READ)
    }

    /// 是否为严格只读模式（目标不存在时打开必须失败）
    pub fn is_strict_read(self) -> bool {
        self.contains(OpenMode::READ) && !self.contains(OpenMode::WRITE)
    }
}

/// seek 操作的起点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekWhence {
    /// 从文件开头
    Set,
    /// 从当前位置
    Cur,
    /// 从逻辑末尾
    End,
}
