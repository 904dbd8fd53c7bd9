pub mod compression;
pub mod models;

// 重新导出常用模块和函数，方便直接使用
pub use compression::{to_compressed, from_compressed, read_snapshot, write_snapshot, validate_compressed_data};
pub use models::{CatalogMetadata, CatalogSnapshot, FilterData, FilterOption, Resource};
