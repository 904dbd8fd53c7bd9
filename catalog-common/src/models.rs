use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 学习资源 - 目录中的一条记录，加载后不可变
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// 资源唯一标识符，同时作为详情页路由键
    pub id: String,
    /// 资源类型（工作表、游戏等）
    pub resource_type: String,
    /// 年级
    pub grade: String,
    /// 学科
    pub subject: String,
    /// 主题
    pub topic: String,
    /// 资源标题
    pub title: String,
    /// 资源描述
    pub description: String,
    /// 缩略图地址
    pub image_url: String,
    /// 主文档地址
    pub resource_url: String,
    /// 答案文本地址，为空时隐藏答案功能
    pub answers_url: Option<String>,
    /// 解题提示地址，为空时隐藏提示功能
    pub tips_url: Option<String>,
}

/// 筛选选项 - 某个分面中出现过的一个取值
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FilterOption {
    pub id: String,
    pub name: String,
}

impl FilterOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// 目录快照 - 四个分面选项列表加上全部资源
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterData {
    pub resource_types: Vec<FilterOption>,
    pub grades: Vec<FilterOption>,
    pub subjects: Vec<FilterOption>,
    pub topics: Vec<FilterOption>,
    pub resources: Vec<Resource>,
}

impl FilterData {
    /// 空目录：数据源不可用时返回的合法状态
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
            && self.resource_types.is_empty()
            && self.grades.is_empty()
            && self.subjects.is_empty()
            && self.topics.is_empty()
    }
}

/// 快照元数据 - 记录快照的基本信息
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMetadata {
    /// 资源数量
    pub resource_count: usize,
    /// 资源类型选项数量
    pub resource_type_count: usize,
    /// 年级选项数量
    pub grade_count: usize,
    /// 学科选项数量
    pub subject_count: usize,
    /// 主题选项数量
    pub topic_count: usize,
    /// 加载时被跳过的行数
    pub skipped_rows: usize,
    /// 快照创建时间
    pub created_at: DateTime<Utc>,
    /// 生成快照的程序版本
    pub version: String,
}

impl CatalogMetadata {
    /// 根据目录数据统计元数据
    pub fn describe(data: &FilterData, skipped_rows: usize, version: &str) -> Self {
        Self {
            resource_count: data.resources.len(),
            resource_type_count: data.resource_types.len(),
            grade_count: data.grades.len(),
            subject_count: data.subjects.len(),
            topic_count: data.topics.len(),
            skipped_rows,
            created_at: Utc::now(),
            version: version.to_string(),
        }
    }
}

/// 写入磁盘的完整快照
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CatalogSnapshot {
    pub metadata: CatalogMetadata,
    pub data: FilterData,
}
