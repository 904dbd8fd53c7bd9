use std::fs;
use std::path::Path;
use log::{debug, error, info, warn};
use catalog_common::models::{CatalogMetadata, CatalogSnapshot, FilterData, Resource};

use crate::builder::CatalogBuilder;
use crate::csv::{parse_records, CsvRecord};
use crate::error::CatalogError;

/// 数据源的默认位置（相对站点根目录）
pub const DEFAULT_SOURCE: &str = "public/data/filters.csv";

/// 加载结果 - 目录数据以及被跳过的行数
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub data: FilterData,
    pub skipped: usize,
}

impl LoadReport {
    /// 生成可写入磁盘的快照
    pub fn snapshot(&self, version: &str) -> CatalogSnapshot {
        CatalogSnapshot {
            metadata: CatalogMetadata::describe(&self.data, self.skipped, version),
            data: self.data.clone(),
        }
    }
}

/// 表头中各列的位置
struct Columns {
    width: usize,
    id: usize,
    resource_type: usize,
    grade: usize,
    subject: usize,
    topic: usize,
    title: usize,
    description: usize,
    image_url: usize,
    resource_url: usize,
    answers_url: Option<usize>,
    tips_url: Option<usize>,
}

impl Columns {
    fn from_header(header: &CsvRecord) -> Result<Self, CatalogError> {
        let names: Vec<&str> = header.fields.iter().map(|f| f.trim()).collect();
        let find = |name: &str| names.iter().position(|n| *n == name);
        let require = |name: &'static str| find(name).ok_or(CatalogError::MissingColumn(name));

        Ok(Self {
            width: names.len(),
            id: require("id")?,
            resource_type: require("resource_type")?,
            grade: require("grade")?,
            subject: require("subject")?,
            topic: require("topic")?,
            title: require("title")?,
            description: require("description")?,
            image_url: require("image_url")?,
            resource_url: require("resource_url")?,
            answers_url: find("answers_url"),
            tips_url: find("tips_url"),
        })
    }

    fn resource(&self, fields: &[String]) -> Resource {
        let cell = |i: usize| fields[i].clone();
        let optional = |i: Option<usize>| i.map(|i| &fields[i]).filter(|v| !v.is_empty()).cloned();

        Resource {
            id: cell(self.id),
            resource_type: cell(self.resource_type),
            grade: cell(self.grade),
            subject: cell(self.subject),
            topic: cell(self.topic),
            title: cell(self.title),
            description: cell(self.description),
            image_url: cell(self.image_url),
            resource_url: cell(self.resource_url),
            answers_url: optional(self.answers_url),
            tips_url: optional(self.tips_url),
        }
    }
}

/// 从文本解析目录
pub fn parse_catalog(text: &str) -> Result<LoadReport, CatalogError> {
    let mut records = parse_records(text)?.into_iter();

    let header = match records.next() {
        Some(header) => header,
        None => return Ok(LoadReport::default()),
    };
    let columns = Columns::from_header(&header)?;

    let mut builder = CatalogBuilder::new();
    let mut skipped = 0;

    for record in records {
        if record.fields.len() != columns.width {
            warn!("跳过第 {} 行: 列数 {} 与表头 {} 不一致", record.line, record.fields.len(), columns.width);
            skipped += 1;
            continue;
        }

        let resource = columns.resource(&record.fields);
        if resource.id.is_empty() {
            warn!("跳过第 {} 行: 缺少 id", record.line);
            skipped += 1;
            continue;
        }

        let id = resource.id.clone();
        if !builder.add_resource(resource) {
            warn!("跳过第 {} 行: id '{}' 重复", record.line, id);
            skipped += 1;
            continue;
        }
        debug!("加载资源: {}", id);
    }

    Ok(LoadReport {
        data: builder.build(),
        skipped,
    })
}

/// 读取并解析数据源，失败时返回错误
pub fn try_load_catalog(path: &Path) -> Result<LoadReport, CatalogError> {
    info!("读取数据源: {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let report = parse_catalog(&text)?;

    info!("数据源加载完成，资源: {}，跳过: {} 行", report.data.resources.len(), report.skipped);
    Ok(report)
}

/// 读取并解析数据源；任何失败都退化为空目录
pub fn load_catalog(path: &Path) -> FilterData {
    load_catalog_report(path).data
}

/// 同 [`load_catalog`]，同时保留跳过行数
pub fn load_catalog_report(path: &Path) -> LoadReport {
    match try_load_catalog(path) {
        Ok(report) => report,
        Err(e) => {
            error!("加载目录失败，使用空目录: {}", e);
            LoadReport::default()
        }
    }
}
