use serde::{Deserialize, Serialize};
use catalog_common::models::{FilterOption, Resource};

/// 分面 - 四个可筛选的分类维度
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    ResourceType,
    Grade,
    Subject,
    Topic,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::ResourceType, Facet::Grade, Facet::Subject, Facet::Topic];

    /// 数据源中对应的列名
    pub fn column(self) -> &'static str {
        match self {
            Facet::ResourceType => "resource_type",
            Facet::Grade => "grade",
            Facet::Subject => "subject",
            Facet::Topic => "topic",
        }
    }

    /// 读取资源在该分面上的取值
    pub fn value_of(self, resource: &Resource) -> &str {
        match self {
            Facet::ResourceType => &resource.resource_type,
            Facet::Grade => &resource.grade,
            Facet::Subject => &resource.subject,
            Facet::Topic => &resource.topic,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// 分面选择 - 空字符串表示不限制
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectedFacets {
    pub resource_type: String,
    pub grade: String,
    pub subject: String,
    pub topic: String,
}

impl SelectedFacets {
    pub fn get(&self, facet: Facet) -> &str {
        match facet {
            Facet::ResourceType => &self.resource_type,
            Facet::Grade => &self.grade,
            Facet::Subject => &self.subject,
            Facet::Topic => &self.topic,
        }
    }

    pub fn set(&mut self, facet: Facet, value: impl Into<String>) {
        let slot = match facet {
            Facet::ResourceType => &mut self.resource_type,
            Facet::Grade => &mut self.grade,
            Facet::Subject => &mut self.subject,
            Facet::Topic => &mut self.topic,
        };
        *slot = value.into();
    }

    /// 当前生效的分面条件
    pub fn active(&self) -> impl Iterator<Item = (Facet, &str)> + '_ {
        Facet::ALL
            .into_iter()
            .map(move |facet| (facet, self.get(facet)))
            .filter(|(_, value)| !value.is_empty())
    }
}

/// 筛选参数 - 由调用方持有并在每次交互时传入
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterQuery {
    /// 全文搜索关键词
    pub search_text: String,
    /// 分面选择
    pub selected: SelectedFacets,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_facet(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.selected.set(facet, value);
        self
    }

    /// 恢复到初始的空状态
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 仅含空白的关键词视为未设置
    pub fn has_search(&self) -> bool {
        !self.search_text.trim().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_search() && self.selected.active().next().is_none()
    }

    /// 用于子串匹配的小写关键词
    pub(crate) fn search_needle(&self) -> Option<String> {
        self.has_search().then(|| self.search_text.to_lowercase())
    }
}

/// 筛选结果 - 返回给页面的结果
#[derive(Serialize, Debug)]
pub struct FilterOutcome {
    /// 匹配的资源，保持目录顺序
    pub resources: Vec<Resource>,
    /// 匹配数量
    pub matched: usize,
    /// 目录中的资源总数
    pub total: usize,
}

/// 分面选项列表 - 下拉框使用
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FacetLists<'a> {
    pub resource_types: &'a [FilterOption],
    pub grades: &'a [FilterOption],
    pub subjects: &'a [FilterOption],
    pub topics: &'a [FilterOption],
}
