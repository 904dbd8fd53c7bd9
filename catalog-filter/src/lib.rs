use wasm_bindgen::prelude::*;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt::Display;
use std::sync::{Arc, RwLock};
use web_sys::console;
use catalog_common::compression as utils;
use catalog_common::models::{CatalogMetadata, CatalogSnapshot, FilterData, Resource};

// 导出模块
pub mod builder;
pub mod csv;
pub mod detail;
pub mod engine;
pub mod error;
pub mod loader;
pub mod models;

pub use builder::CatalogBuilder;
pub use detail::AnswerKeyLayout;
pub use engine::{apply_filters, find_resource, related_resources, RELATED_LIMIT};
pub use error::CatalogError;
pub use loader::{load_catalog, parse_catalog, try_load_catalog, LoadReport};
pub use models::{Facet, FilterQuery, FilterOutcome, SelectedFacets};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// 全局目录快照，重新加载时整体替换
static CATALOG: OnceCell<RwLock<Option<Arc<CatalogFilter>>>> = OnceCell::new();

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 目录过滤器 - 持有不可变的目录快照
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    data: FilterData,
}

impl CatalogFilter {
    pub fn new(data: FilterData) -> Self {
        Self { data }
    }

    /// 从压缩的快照数据恢复
    pub fn from_snapshot(bytes: &[u8]) -> Result<(Self, CatalogMetadata), CatalogError> {
        let snapshot: CatalogSnapshot = utils::from_compressed(bytes)?;
        Ok((Self::new(snapshot.data), snapshot.metadata))
    }

    pub fn data(&self) -> &FilterData {
        &self.data
    }

    /// 获取四个分面的选项列表
    pub fn facets(&self) -> models::FacetLists<'_> {
        models::FacetLists {
            resource_types: &self.data.resource_types,
            grades: &self.data.grades,
            subjects: &self.data.subjects,
            topics: &self.data.topics,
        }
    }

    /// 筛选资源
    pub fn filter(&self, query: &FilterQuery) -> FilterOutcome {
        let resources: Vec<Resource> = apply_filters(&self.data.resources, query)
            .into_iter()
            .cloned()
            .collect();

        FilterOutcome {
            matched: resources.len(),
            total: self.data.resources.len(),
            resources,
        }
    }

    /// 按ID获取资源
    pub fn resource(&self, id: &str) -> Result<&Resource, CatalogError> {
        find_resource(&self.data.resources, id).ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// 获取相关资源
    pub fn related(&self, id: &str) -> Result<Vec<&Resource>, CatalogError> {
        let target = self.resource(id)?;
        Ok(related_resources(&self.data.resources, target, RELATED_LIMIT))
    }

    /// 生成答案导出版面
    pub fn answer_key(&self, id: &str, answers: &str) -> Result<AnswerKeyLayout, CatalogError> {
        let resource = self.resource(id)?;
        Ok(AnswerKeyLayout::new(&resource.title, answers))
    }

    /// 安装为当前全局快照
    pub fn install(self) {
        let cell = CATALOG.get_or_init(|| RwLock::new(None));
        let mut guard = cell.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::new(self));
    }

    /// 获取当前全局快照
    pub fn current() -> Result<Arc<CatalogFilter>, CatalogError> {
        let cell = CATALOG.get().ok_or(CatalogError::NotInitialized)?;
        let guard = cell.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clone().ok_or(CatalogError::NotInitialized)
    }
}

fn js_error<E: Display>(e: E) -> JsValue {
    let message = e.to_string();
    console::log_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

// 缺失的可选字段输出为 null 而不是 undefined
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_missing_as_null(true);
    value
        .serialize(&serializer)
        .map_err(|e| js_error(format!("序列化结果失败: {}", e)))
}

/// 目录过滤器JS接口 - 提供给页面使用的API
#[wasm_bindgen]
pub struct CatalogFilterJS;

#[wasm_bindgen]
impl CatalogFilterJS {
    /// 加载快照并返回其元数据
    #[wasm_bindgen]
    pub fn init(snapshot_data: &[u8]) -> Result<JsValue, JsValue> {
        console_error_panic_hook::set_once();

        let (filter, metadata) = CatalogFilter::from_snapshot(snapshot_data)
            .map_err(|e| js_error(format!("初始化过滤器失败: {}", e)))?;
        filter.install();
        to_js(&metadata)
    }

    /// 获取所有分面选项
    #[wasm_bindgen]
    pub fn facets() -> Result<JsValue, JsValue> {
        let catalog = CatalogFilter::current().map_err(js_error)?;
        to_js(&catalog.facets())
    }

    /// 筛选资源
    #[wasm_bindgen]
    pub fn filter_resources(query_json: &str) -> Result<JsValue, JsValue> {
        let query: FilterQuery = serde_json::from_str(query_json)
            .map_err(|e| js_error(format!("解析参数失败: {}", e)))?;

        let catalog = CatalogFilter::current().map_err(js_error)?;
        to_js(&catalog.filter(&query))
    }

    /// 获取单个资源
    #[wasm_bindgen]
    pub fn resource(id: &str) -> Result<JsValue, JsValue> {
        let catalog = CatalogFilter::current().map_err(js_error)?;
        let resource = catalog.resource(id).map_err(js_error)?;
        to_js(resource)
    }

    /// 获取相关资源
    #[wasm_bindgen]
    pub fn related(id: &str) -> Result<JsValue, JsValue> {
        let catalog = CatalogFilter::current().map_err(js_error)?;
        let related = catalog.related(id).map_err(js_error)?;
        to_js(&related)
    }

    /// 资源下载文件名
    #[wasm_bindgen]
    pub fn download_filename(id: &str) -> Result<String, JsValue> {
        let catalog = CatalogFilter::current().map_err(js_error)?;
        let resource = catalog.resource(id).map_err(js_error)?;
        Ok(detail::download_filename(&resource.title))
    }

    /// 答案或提示面板的编号条目
    #[wasm_bindgen]
    pub fn panel_entries(text: &str) -> Result<JsValue, JsValue> {
        to_js(&detail::panel_entries(text))
    }

    /// 补充内容获取失败时显示的占位文本
    #[wasm_bindgen]
    pub fn content_fallback() -> String {
        detail::CONTENT_FALLBACK.to_string()
    }

    /// 生成答案导出版面
    #[wasm_bindgen]
    pub fn answer_key(id: &str, answers: &str) -> Result<JsValue, JsValue> {
        let catalog = CatalogFilter::current().map_err(js_error)?;
        let layout = catalog.answer_key(id, answers).map_err(js_error)?;
        to_js(&layout)
    }
}
