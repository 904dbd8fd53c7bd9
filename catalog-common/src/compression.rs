use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use flate2::{Compression, write::GzEncoder, read::GzDecoder};

use crate::models::CatalogSnapshot;

/// 魔数常量 - 用于标识快照文件格式
pub const MAGIC_BYTES: &[u8] = b"EMCAT"; // Edu Modes Catalog

/// 当前快照格式版本 (主版本, 次版本)
pub const SNAPSHOT_VERSION: [u8; 2] = [1, 0];

/// 头部长度：魔数 + 版本号 + 原始数据大小
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>, io::Error> {
    bincode::serde::encode_to_vec(obj, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("序列化失败: {}", e)))
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    bincode::serde::decode_from_slice(data, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("反序列化失败: {}", e)))
        .map(|(value, _)| value)
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, io::Error> {
    let binary = to_binary(obj)?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);

    let data_len = u32::try_from(binary.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "数据过大，无法写入快照"))?;
    output.extend_from_slice(&data_len.to_le_bytes());

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&binary)?;
    output.extend_from_slice(&encoder.finish()?);

    Ok(output)
}

/// 从压缩的二进制格式反序列化对象，使用当前主版本作为最大版本
pub fn from_compressed<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    from_compressed_with_max_version(data, SNAPSHOT_VERSION[0])
}

/// 从压缩的二进制格式反序列化对象，允许指定支持的最大版本
pub fn from_compressed_with_max_version<T: for<'a> serde::de::Deserialize<'a>>(
    data: &[u8],
    max_version: u8,
) -> Result<T, io::Error> {
    validate_compressed_data_with_max_version(data, max_version)?;

    let size_offset = MAGIC_BYTES.len() + 2;
    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[size_offset..HEADER_LEN]);
    let original_size = u32::from_le_bytes(size_bytes) as usize;

    let mut decoder = GzDecoder::new(&data[HEADER_LEN..]);
    let mut decompressed_data = Vec::with_capacity(original_size);
    decoder.read_to_end(&mut decompressed_data)?;

    if decompressed_data.len() != original_size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节",
                   original_size, decompressed_data.len())
        ));
    }

    from_binary(&decompressed_data)
}

/// 验证压缩数据是否有效
pub fn validate_compressed_data(data: &[u8]) -> Result<[u8; 2], io::Error> {
    validate_compressed_data_with_max_version(data, SNAPSHOT_VERSION[0])
}

/// 验证压缩数据是否有效，允许指定支持的最大版本
pub fn validate_compressed_data_with_max_version(data: &[u8], max_version: u8) -> Result<[u8; 2], io::Error> {
    if data.len() < HEADER_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("数据太短，无法解析: {} 字节", data.len())
        ));
    }

    if &data[0..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "无效的文件格式：魔数不匹配"
        ));
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];

    if version[0] > max_version {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("不支持的版本: {}.{}", version[0], version[1])
        ));
    }

    Ok(version)
}

/// 将快照写入文件
pub fn write_snapshot(path: &Path, snapshot: &CatalogSnapshot) -> Result<usize, io::Error> {
    let bytes = to_compressed(snapshot, SNAPSHOT_VERSION)?;
    fs::write(path, &bytes)?;
    Ok(bytes.len())
}

/// 从文件读取快照
pub fn read_snapshot(path: &Path) -> Result<CatalogSnapshot, io::Error> {
    let bytes = fs::read(path)?;
    from_compressed(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogMetadata, FilterData, FilterOption, Resource};

    fn sample_data() -> FilterData {
        FilterData {
            resource_types: vec![FilterOption::new("worksheet", "Worksheet")],
            grades: vec![FilterOption::new("grade_5", "Grade 5")],
            subjects: vec![FilterOption::new("math", "Math")],
            topics: vec![FilterOption::new("fractions", "Fractions")],
            resources: vec![Resource {
                id: "frac-1".into(),
                resource_type: "Worksheet".into(),
                grade: "Grade 5".into(),
                subject: "Math".into(),
                topic: "Fractions".into(),
                title: "Adding Fractions".into(),
                description: "Practice, with commas".into(),
                image_url: "/img/frac.png".into(),
                resource_url: "/pdf/frac.pdf".into(),
                answers_url: Some("/txt/frac-answers.txt".into()),
                tips_url: None,
            }],
        }
    }

    #[test]
    fn snapshot_survives_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.bin");
        let data = sample_data();
        let snapshot = CatalogSnapshot {
            metadata: CatalogMetadata::describe(&data, 2, "test"),
            data: data.clone(),
        };

        let written = write_snapshot(&path, &snapshot).unwrap();
        assert!(written > HEADER_LEN);

        let restored = read_snapshot(&path).unwrap();
        assert_eq!(restored.data, data);
        assert_eq!(restored.metadata.skipped_rows, 2);
        assert_eq!(restored.metadata.resource_count, 1);
    }

    #[test]
    fn rejects_foreign_magic() {
        let mut bytes = to_compressed(&sample_data(), SNAPSHOT_VERSION).unwrap();
        bytes[0] = b'X';
        let err = from_compressed::<FilterData>(&bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_newer_major_version() {
        let bytes = to_compressed(&sample_data(), [SNAPSHOT_VERSION[0] + 1, 0]).unwrap();
        assert!(validate_compressed_data(&bytes).is_err());
        assert!(from_compressed::<FilterData>(&bytes).is_err());
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(validate_compressed_data(b"EMCA").is_err());
    }
}
