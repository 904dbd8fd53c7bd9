//! 详情页辅助：下载文件名、答案/提示面板条目，以及答案导出的版面规划。
//!
//! 获取文本和绘制 PDF 由页面层负责，这里只产出它们需要的纯数据。

use serde::Serialize;

use crate::builder::WHITESPACE;

/// 文本获取失败时显示的占位内容
pub const CONTENT_FALLBACK: &str = "Content could not be loaded.";

/// 导出文档的标题
pub const ANSWER_KEY_HEADING: &str = "Answer Key";
/// 导出文档的副标题
pub const ANSWER_KEY_SUBTITLE: &str = "Generated from Edu Modes";

/// 左边距
pub const LEFT_MARGIN: u32 = 20;
/// 第一页答案条目的起始纵坐标
pub const FIRST_ENTRY_Y: u32 = 60;
/// 续页的起始纵坐标
pub const PAGE_TOP_Y: u32 = 20;
/// 行距
pub const LINE_STEP: u32 = 10;
/// 纵坐标超过该值时换页
pub const PAGE_BREAK_Y: u32 = 270;

fn title_slug(title: &str) -> String {
    WHITESPACE.replace_all(&title.to_lowercase(), "-").into_owned()
}

/// 资源下载时使用的文件名
pub fn download_filename(title: &str) -> String {
    format!("{}.pdf", title_slug(title))
}

/// 答案导出时使用的文件名
pub fn answers_filename(title: &str) -> String {
    format!("{}-answers.pdf", title_slug(title))
}

/// 面板中的一条编号内容
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PanelEntry {
    pub number: usize,
    pub text: String,
}

/// 按行拆分为编号条目
pub fn panel_entries(text: &str) -> Vec<PanelEntry> {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| PanelEntry {
            number: i + 1,
            text: line.trim_end_matches('\r').to_string(),
        })
        .collect()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineStyle {
    Heading,
    Subtitle,
    Body,
}

/// 页面上定位好的一行
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub x: u32,
    pub y: u32,
    pub style: LineStyle,
    pub text: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutPage {
    pub lines: Vec<PlacedLine>,
}

/// 答案导出版面
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerKeyLayout {
    pub filename: String,
    pub pages: Vec<LayoutPage>,
}

impl AnswerKeyLayout {
    pub fn new(title: &str, answers: &str) -> Self {
        let place = |y: u32, style: LineStyle, text: &str| PlacedLine {
            x: LEFT_MARGIN,
            y,
            style,
            text: text.to_string(),
        };

        let mut page = LayoutPage {
            lines: vec![
                place(20, LineStyle::Heading, ANSWER_KEY_HEADING),
                place(35, LineStyle::Heading, title),
                place(45, LineStyle::Subtitle, ANSWER_KEY_SUBTITLE),
            ],
        };
        let mut pages = Vec::new();
        let mut y = FIRST_ENTRY_Y;

        for entry in panel_entries(answers) {
            if y > PAGE_BREAK_Y {
                pages.push(std::mem::take(&mut page));
                y = PAGE_TOP_Y;
            }
            page.lines.push(place(y, LineStyle::Body, &format!("{}. {}", entry.number, entry.text)));
            y += LINE_STEP;
        }
        pages.push(page);

        Self {
            filename: answers_filename(title),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
