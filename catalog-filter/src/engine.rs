use catalog_common::models::Resource;
use crate::models::{FilterQuery, SelectedFacets};

/// 详情页默认展示的相关资源数量
pub const RELATED_LIMIT: usize = 3;

/// 应用筛选条件，结果保持输入顺序
///
/// 关键词条件：小写关键词是标题、描述、学科、主题、年级、类型任一字段（均转小写）的子串。
/// 分面条件：字段值与选择值完全相等（区分大小写）。所有生效条件取交集。
pub fn apply_filters<'a>(resources: &'a [Resource], query: &FilterQuery) -> Vec<&'a Resource> {
    let needle = query.search_needle();
    resources
        .iter()
        .filter(|resource| {
            needle.as_deref().map_or(true, |needle| matches_text(resource, needle))
                && matches_facets(resource, &query.selected)
        })
        .collect()
}

/// 单个资源是否满足查询
pub fn matches_query(resource: &Resource, query: &FilterQuery) -> bool {
    query.search_needle().map_or(true, |needle| matches_text(resource, &needle))
        && matches_facets(resource, &query.selected)
}

fn matches_text(resource: &Resource, needle: &str) -> bool {
    [
        &resource.title,
        &resource.description,
        &resource.subject,
        &resource.topic,
        &resource.grade,
        &resource.resource_type,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn matches_facets(resource: &Resource, selected: &SelectedFacets) -> bool {
    selected
        .active()
        .all(|(facet, value)| facet.value_of(resource) == value)
}

/// 按ID查找资源
pub fn find_resource<'a>(resources: &'a [Resource], id: &str) -> Option<&'a Resource> {
    resources.iter().find(|r| r.id == id)
}

/// 相关资源：学科或主题相同，排除自身，按目录顺序最多 `limit` 个
pub fn related_resources<'a>(resources: &'a [Resource], target: &Resource, limit: usize) -> Vec<&'a Resource> {
    resources
        .iter()
        .filter(|r| r.id != target.id && (r.subject == target.subject || r.topic == target.topic))
        .take(limit)
        .collect()
}

/// 所有资源ID，供静态路径生成使用
pub fn resource_ids(resources: &[Resource]) -> Vec<&str> {
    resources.iter().map(|r| r.id.as_str()).collect()
}
