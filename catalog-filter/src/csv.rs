//! 逗号分隔表格的解析。
//!
//! 支持双引号字段（可包含逗号、换行和 `""` 转义）、CRLF 换行以及开头的 UTF-8 BOM。
//! 空行会被跳过。

use crate::error::CatalogError;

/// 一条记录及其在源文本中的起始行号（从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

/// 将文本解析为有序记录序列
pub fn parse_records(text: &str) -> Result<Vec<CsvRecord>, CatalogError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_quoted = false;
    let mut record_quoted = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !field_quoted => {
                in_quotes = true;
                field_quoted = true;
                record_quoted = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                field_quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                finish_record(&mut records, &mut fields, record_line, record_quoted);
                field_quoted = false;
                record_quoted = false;
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CatalogError::Parse {
            line: record_line,
            message: "引号字段未闭合".to_string(),
        });
    }

    if !field.is_empty() || !fields.is_empty() || record_quoted {
        fields.push(field);
        finish_record(&mut records, &mut fields, record_line, record_quoted);
    }

    Ok(records)
}

fn finish_record(records: &mut Vec<CsvRecord>, fields: &mut Vec<String>, line: usize, quoted: bool) {
    let fields = std::mem::take(fields);
    // 空行
    if !quoted && fields.len() == 1 && fields[0].is_empty() {
        return;
    }
    records.push(CsvRecord { line, fields });
}
