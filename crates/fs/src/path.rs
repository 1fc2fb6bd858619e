//! 路径到存储标识符的映射
//!
//! 路径字符串通过确定性 hash 折叠到配置的标识符区间内，作为键值存储的键。
//! 映射是纯函数：同一路径在任意进程生命周期内（以及重启之后）总是得到
//! 同一标识符，没有任何持久化状态。
//!
//! 不同路径可能 hash 到同一标识符，此时两个逻辑文件会别名到同一存储
//! 条目。映射层不检测也不解决碰撞；卡片配置的路径集合小且固定，碰撞
//! 风险由集成方确认。

use crate::FsError;

/// 将路径字符串映射到 `[base, base + span)` 内的存储标识符
///
/// hash 规则：种子 5381，逐字节 `hash = hash * 33 + byte`（32 位回绕），
/// 最后对 `span` 取模并加上 `base`。任何语法合法的字符串都能得到结果，
/// 没有错误路径。
pub fn path_to_id(path: &str, base: u16, span: u16) -> u16 {
    let mut hash: u32 = 5381;
    for &b in path.as_bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(u32::from(b));
    }
    base + (hash % u32::from(span)) as u16
}

/// 检查路径字符串是否满足长度约束
///
/// 空路径返回 [`FsError::InvalidArgument`]，达到或超过 `max_len` 返回
/// [`FsError::NameTooLong`]。
pub fn check_path(path: &str, max_len: usize) -> Result<(), FsError> {
    if path.is_empty() {
        return Err(FsError::InvalidArgument);
    }
    if path.len() >= max_len {
        return Err(FsError::NameTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: u16 = 0x1000;
    const SPAN: u16 = 0x0FFF;

    #[test]
    fn test_id_is_stable() {
        let a = path_to_id("/adf0/6f07", BASE, SPAN);
        let b = path_to_id("/adf0/6f07", BASE, SPAN);
        assert_eq!(a, b);
    }

    #[test]
    fn test_id_within_range() {
        for path in ["/", "/mf", "/adf0/6f07", "/a/very/long/path/to/a/file"] {
            let id = path_to_id(path, BASE, SPAN);
            assert!(id >= BASE);
            assert!(id < BASE + SPAN);
        }
    }

    #[test]
    fn test_distinct_paths_usually_distinct_ids() {
        // 碰撞是允许的，但这些代表性路径不应互相碰撞
        let ids = [
            path_to_id("/mf", BASE, SPAN),
            path_to_id("/adf0", BASE, SPAN),
            path_to_id("/adf0/6f07", BASE, SPAN),
            path_to_id("/adf0/6f08", BASE, SPAN),
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_check_path_bounds() {
        assert_eq!(check_path("", 8), Err(FsError::InvalidArgument));
        assert_eq!(check_path("1234567", 8), Ok(()));
        assert_eq!(check_path("12345678", 8), Err(FsError::NameTooLong));
    }
}
