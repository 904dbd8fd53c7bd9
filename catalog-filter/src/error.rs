use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("无法读取数据源 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("第 {line} 行解析失败: {message}")]
    Parse { line: usize, message: String },
    #[error("表头缺少必需列: {0}")]
    MissingColumn(&'static str),
    #[error("快照处理失败: {0}")]
    Snapshot(#[from] io::Error),
    #[error("目录未初始化")]
    NotInitialized,
    #[error("资源不存在: {0}")]
    NotFound(String),
}
