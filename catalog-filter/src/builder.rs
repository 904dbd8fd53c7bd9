use catalog_common::models::{FilterData, FilterOption, Resource};
use crate::models::Facet;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub(crate) static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// 由分面名称生成选项ID：转小写，连续空白替换为下划线
pub fn facet_option_id(name: &str) -> String {
    WHITESPACE.replace_all(&name.to_lowercase(), "_").into_owned()
}

/// 按首次出现顺序去重的分面取值
#[derive(Default)]
struct FacetValues {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl FacetValues {
    fn insert(&mut self, name: &str) {
        // 空值即"全部"，不生成选项
        if name.is_empty() || self.seen.contains(name) {
            return;
        }
        self.seen.insert(name.to_string());
        self.names.push(name.to_string());
    }

    fn to_options(&self, facet: Facet) -> Vec<FilterOption> {
        let mut used_ids = HashSet::new();
        self.names
            .iter()
            .map(|name| {
                let base = facet_option_id(name);
                let mut id = base.clone();
                let mut suffix = 2;
                while used_ids.contains(&id) {
                    id = format!("{}_{}", base, suffix);
                    suffix += 1;
                }
                if id != base {
                    warn!("分面 {} 的选项ID冲突: '{}' 改用 '{}'", facet.column(), name, id);
                }
                used_ids.insert(id.clone());
                FilterOption::new(id, name.clone())
            })
            .collect()
    }
}

/// 目录构建器
#[derive(Default)]
pub struct CatalogBuilder {
    resources: Vec<Resource>,
    ids: HashSet<String>,
    facets: [FacetValues; 4],
}

impl CatalogBuilder {
    /// 创建新的目录构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加资源；ID重复时拒绝并返回 false
    pub fn add_resource(&mut self, resource: Resource) -> bool {
        if !self.ids.insert(resource.id.clone()) {
            return false;
        }
        for facet in Facet::ALL {
            self.facets[facet.index()].insert(facet.value_of(&resource));
        }
        self.resources.push(resource);
        true
    }

    /// 构建目录快照
    pub fn build(&self) -> FilterData {
        let options = |facet: Facet| self.facets[facet.index()].to_options(facet);
        let data = FilterData {
            resource_types: options(Facet::ResourceType),
            grades: options(Facet::Grade),
            subjects: options(Facet::Subject),
            topics: options(Facet::Topic),
            resources: self.resources.clone(),
        };

        info!("目录构建完成，资源数量: {}, 类型: {}, 年级: {}, 学科: {}, 主题: {}",
              data.resources.len(), data.resource_types.len(), data.grades.len(),
              data.subjects.len(), data.topics.len());

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: &str, subject: &str) -> Resource {
        Resource {
            id: id.into(),
            resource_type: "Worksheet".into(),
            grade: "Grade 5".into(),
            subject: subject.into(),
            topic: String::new(),
            title: format!("Title {}", id),
            description: String::new(),
            image_url: String::new(),
            resource_url: String::new(),
            answers_url: None,
            tips_url: None,
        }
    }

    #[test]
    fn option_ids_collapse_whitespace() {
        assert_eq!(facet_option_id("Grade 5"), "grade_5");
        assert_eq!(facet_option_id("Social  Studies\tII"), "social_studies_ii");
        assert_eq!(facet_option_id("Math"), "math");
    }

    #[test]
    fn facets_keep_first_seen_order() {
        let mut builder = CatalogBuilder::new();
        for (i, subject) in ["B", "A", "B", "C"].iter().enumerate() {
            assert!(builder.add_resource(resource(&i.to_string(), subject)));
        }
        let data = builder.build();
        assert_eq!(
            data.subjects,
            vec![FilterOption::new("b", "B"), FilterOption::new("a", "A"), FilterOption::new("c", "C")]
        );
        assert_eq!(data.grades, vec![FilterOption::new("grade_5", "Grade 5")]);
        // 空主题不产生选项
        assert!(data.topics.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut builder = CatalogBuilder::new();
        assert!(builder.add_resource(resource("x", "Math")));
        assert!(!builder.add_resource(resource("x", "Science")));
        let data = builder.build();
        assert_eq!(data.resources.len(), 1);
        assert_eq!(data.subjects, vec![FilterOption::new("math", "Math")]);
    }

    #[test]
    fn colliding_ids_get_suffixes() {
        let mut builder = CatalogBuilder::new();
        builder.add_resource(resource("1", "Grade 5"));
        builder.add_resource(resource("2", "grade  5"));
        builder.add_resource(resource("3", "GRADE 5"));
        let ids: Vec<_> = builder.build().subjects.into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["grade_5", "grade_5_2", "grade_5_3"]);
    }
}
