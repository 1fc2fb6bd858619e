//! 文件存储核心
//!
//! [`FileStore`] 是文件存储层的上下文对象，独占持有底层键值存储、
//! 挂载状态、句柄池和存储基路径。打开的文件完整驻留在内存缓冲区中，
//! 关闭时按需整体写回键值存储。
//!
//! 并发模型：所有操作都是同步执行到完成的有界调用，修改一律经过
//! `&mut self`，由借用检查器保证单一调用方。需要多线程共享时，由
//! 集成方将整个 [`FileStore`] 包进自己的锁，slot 的认领和归还随之
//! 保持原子。

use alloc::string::String;

use storage::{FlashStore, RegionDescriptor, StoreError};
use uapi::fcntl::{OpenMode, SeekWhence};
use uapi::log::Subsystem;

use crate::handle::{FileHandle, HandleArena};
use crate::path::{check_path, path_to_id};
use crate::{FileId, FsConfig, FsError};

const TAG: &str = Subsystem::Fs.as_str();

/// 文件存储层上下文
///
/// 持有一个 [`FlashStore`] 实现和容量固定的句柄池。挂载是惰性的：
/// 首个需要存储的操作触发挂载并缓存结果，挂载失败会阻塞后续所有
/// 操作。多个互相独立的实例可以共存（各自拥有各自的存储）。
pub struct FileStore<S: FlashStore> {
    /// 底层键值存储
    store: S,

    /// flash 分区几何
    region: RegionDescriptor,

    /// 固定配置
    config: FsConfig,

    /// 挂载是否已成功（惰性，只尝试缓存成功结果）
    mounted: bool,

    /// 句柄池
    arena: HandleArena,

    /// 存储基路径
    storage_path: String,
}

impl<S: FlashStore> core::fmt::Debug for FileStore<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FileStore")
            .field("mounted", &self.mounted)
            .field("open_files", &self.arena.open_count())
            .field("storage_path", &self.storage_path)
            .finish()
    }
}

impl<S: FlashStore> FileStore<S> {
    /// 创建文件存储上下文
    ///
    /// 不触碰底层存储；挂载推迟到第一个需要它的操作。
    pub fn new(store: S, region: RegionDescriptor, config: FsConfig) -> Self {
        let arena = HandleArena::new(config.max_open_files);
        Self {
            store,
            region,
            config,
            mounted: false,
            arena,
            storage_path: String::from(crate::config::DEFAULT_STORAGE_PATH),
        }
    }

    /// 当前配置
    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// 当前打开的文件数量
    pub fn open_files(&self) -> usize {
        self.arena.open_count()
    }

    /// 拆出底层存储（丢弃所有未关闭的句柄）
    pub fn into_inner(self) -> S {
        self.store
    }

    /// 获取存储基路径
    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    /// 设置存储基路径
    ///
    /// 协议层在该前缀下解析自己的文件树。空路径或超长路径被拒绝。
    pub fn set_storage_path(&mut self, path: &str) -> Result<(), FsError> {
        check_path(path, self.config.max_path_len)?;
        self.storage_path = String::from(path);
        Ok(())
    }

    /// 惰性挂载底层存储
    fn ensure_mounted(&mut self) -> Result<(), FsError> {
        if self.mounted {
            return Ok(());
        }

        log::info!(
            target: TAG,
            "mounting store: offset={:#x} sector_size={} sector_count={}",
            self.region.offset,
            self.region.sector_size,
            self.region.sector_count
        );

        match self.store.mount(&self.region) {
            Ok(()) => {
                self.mounted = true;
                log::info!(target: TAG, "store mounted");
                Ok(())
            }
            Err(err) => {
                log::error!(target: TAG, "store mount failed: {:?}", err);
                Err(err.into())
            }
        }
    }

    fn id_for(&self, path: &str) -> u16 {
        path_to_id(path, self.config.id_base, self.config.id_span)
    }

    // ========== 句柄生命周期 ==========

    /// 按模式打开路径
    ///
    /// 模式字符串遵循 stdio 语义（见 [`OpenMode::parse`]）。模式含读
    /// 时加载已有条目；严格只读模式下目标不存在则打开失败。模式含
    /// `w` 时逻辑大小强制为 0 并标记已修改，之后的任何写入都会在
    /// 关闭时整体替换旧条目。
    ///
    /// 任何失败路径都不会泄漏半开句柄。
    pub fn open(&mut self, path: &str, mode: &str) -> Result<FileId, FsError> {
        check_path(path, self.config.max_path_len)?;
        let mode = OpenMode::parse(mode);
        self.ensure_mounted()?;

        // 池满时提前失败，省掉缓冲区分配
        if self.arena.is_full() {
            log::error!(target: TAG, "open {}: no free handles", path);
            return Err(FsError::NoFreeHandles);
        }

        let id = self.id_for(path);
        let mut handle = FileHandle::new(id, path, &self.config);

        if mode.loads_existing() {
            match self.store.read(id, &mut handle.buf) {
                Ok(len) => {
                    handle.size = len;
                    log::debug!(target: TAG, "loaded {} (id={:#06x}, size={})", path, id, len);
                }
                Err(StoreError::NotFound) => {
                    if mode.is_strict_read() {
                        log::debug!(target: TAG, "open {}: not found (id={:#06x})", path, id);
                        return Err(FsError::NotFound);
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }

        if mode.contains(OpenMode::TRUNCATE) {
            handle.size = 0;
            handle.modified = true;
        }

        let file = self.arena.claim(handle)?;
        log::debug!(target: TAG, "opened {} (id={:#06x})", path, id);
        Ok(file)
    }

    /// 关闭句柄
    ///
    /// 若句柄被修改且逻辑大小大于 0，将缓冲区前 `size` 字节写回键值
    /// 存储。写回失败只记录日志，不影响句柄回收：返回值只反映句柄
    /// 本身是否有效。
    pub fn close(&mut self, file: FileId) -> Result<(), FsError> {
        let handle = self.arena.release(file)?;

        if handle.modified && handle.size > 0 {
            match self.store.write(handle.storage_id, &handle.buf[..handle.size]) {
                Ok(()) => {
                    log::debug!(
                        target: TAG,
                        "flushed {} (id={:#06x}, size={})",
                        handle.path,
                        handle.storage_id,
                        handle.size
                    );
                }
                Err(err) => {
                    // 写回失败不致命：优先回收句柄池资源
                    log::error!(
                        target: TAG,
                        "flush failed for {} (id={:#06x}): {:?}",
                        handle.path,
                        handle.storage_id,
                        err
                    );
                }
            }
        }

        Ok(())
    }

    // ========== 读写和定位 ==========

    /// 从当前位置读取，最多填满 `dest`
    ///
    /// 读取量被钳制到当前位置和逻辑大小之间的可用字节数；越过文件
    /// 末尾的读取返回 0 字节，不是错误。
    pub fn read(&mut self, file: FileId, dest: &mut [u8]) -> Result<usize, FsError> {
        let handle = self.arena.get_mut(file)?;

        let available = handle.size.saturating_sub(handle.pos);
        let n = dest.len().min(available);
        if n == 0 {
            return Ok(0);
        }

        dest[..n].copy_from_slice(&handle.buf[handle.pos..handle.pos + n]);
        handle.pos += n;
        Ok(n)
    }

    /// 按记录读取，返回完整记录数
    ///
    /// 读取的字节数与 [`read`](FileStore::read) 一致；返回值为
    /// 整除后的完整记录数，短读只计完整记录。
    pub fn read_records(
        &mut self,
        file: FileId,
        record_size: usize,
        dest: &mut [u8],
    ) -> Result<usize, FsError> {
        if record_size == 0 {
            return Err(FsError::InvalidArgument);
        }
        let bytes = self.read(file, dest)?;
        Ok(bytes / record_size)
    }

    /// 在当前位置写入整个 `src`
    ///
    /// 若 `pos + src.len()` 超出缓冲区容量，整个写入被拒绝，零字节
    /// 写入；容量是硬边界，不做扩容。写入越过逻辑大小时扩展大小，
    /// 中间未写过的字节保持分配时的擦除字节。
    pub fn write(&mut self, file: FileId, src: &[u8]) -> Result<usize, FsError> {
        let handle = self.arena.get_mut(file)?;

        let end = match handle.pos.checked_add(src.len()) {
            Some(end) if end <= handle.buf.len() => end,
            _ => {
                log::error!(
                    target: TAG,
                    "write to {} exceeds capacity (pos={}, len={})",
                    handle.path,
                    handle.pos,
                    src.len()
                );
                return Err(FsError::NoSpace);
            }
        };

        handle.buf[handle.pos..end].copy_from_slice(src);
        handle.pos = end;
        if handle.pos > handle.size {
            handle.size = handle.pos;
        }
        handle.modified = true;
        Ok(src.len())
    }

    /// 按记录写入，返回完整记录数
    pub fn write_records(
        &mut self,
        file: FileId,
        record_size: usize,
        src: &[u8],
    ) -> Result<usize, FsError> {
        if record_size == 0 {
            return Err(FsError::InvalidArgument);
        }
        let bytes = self.write(file, src)?;
        Ok(bytes / record_size)
    }

    /// 移动读写位置，返回新位置
    ///
    /// 结果为负时拒绝且位置不变。新位置不按逻辑大小或容量钳制：
    /// 越过大小的位置是允许的，后续读取得到 0 字节，后续写入仍按
    /// 容量检查。
    pub fn seek(
        &mut self,
        file: FileId,
        offset: isize,
        whence: SeekWhence,
    ) -> Result<usize, FsError> {
        let handle = self.arena.get_mut(file)?;

        let base = match whence {
            SeekWhence::Set => 0,
            SeekWhence::Cur => handle.pos as isize,
            SeekWhence::End => handle.size as isize,
        };

        let new_pos = base.checked_add(offset).ok_or(FsError::InvalidArgument)?;
        if new_pos < 0 {
            return Err(FsError::InvalidArgument);
        }

        handle.pos = new_pos as usize;
        Ok(handle.pos)
    }

    // ========== 元数据操作 ==========

    /// 查询路径对应条目的大小，不传输内容
    ///
    /// 条目不存在返回 [`FsError::NotFound`]，与大小为 0 的条目（返回
    /// `Ok(0)`）相区分。
    pub fn size(&mut self, path: &str) -> Result<usize, FsError> {
        check_path(path, self.config.max_path_len)?;
        self.ensure_mounted()?;

        let id = self.id_for(path);
        let len = self.store.length(id)?;
        log::debug!(target: TAG, "size {} (id={:#06x}) = {}", path, id, len);
        Ok(len)
    }

    /// 检查路径是否存在
    ///
    /// 任何已存储条目（包括长度 0）都算存在。
    pub fn exists(&mut self, path: &str) -> Result<bool, FsError> {
        check_path(path, self.config.max_path_len)?;
        self.ensure_mounted()?;

        let id = self.id_for(path);
        let mut probe = [0u8; 1];
        match self.store.read(id, &mut probe) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// 删除路径对应的条目
    ///
    /// 删除不存在的条目不是错误（幂等删除）。
    pub fn remove(&mut self, path: &str) -> Result<(), FsError> {
        check_path(path, self.config.max_path_len)?;
        self.ensure_mounted()?;

        let id = self.id_for(path);
        match self.store.delete(id) {
            Ok(()) | Err(StoreError::NotFound) => {
                log::debug!(target: TAG, "removed {} (id={:#06x})", path, id);
                Ok(())
            }
            Err(err) => {
                log::error!(target: TAG, "remove {} failed: {:?}", path, err);
                Err(err.into())
            }
        }
    }

    /// 创建目录：空操作
    ///
    /// 存储层没有真实层级，路径是不透明的键。
    pub fn create_dir(&mut self, path: &str) -> Result<(), FsError> {
        check_path(path, self.config.max_path_len)?;
        Ok(())
    }

    /// 删除目录：空操作
    pub fn remove_dir(&mut self, path: &str) -> Result<(), FsError> {
        check_path(path, self.config.max_path_len)?;
        Ok(())
    }
}
