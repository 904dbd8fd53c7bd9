//! 浏览器中的绑定测试
//!
//! 运行: wasm-pack test --headless --chrome catalog-filter

#![cfg(target_arch = "wasm32")]

use catalog_common::compression::{to_compressed, SNAPSHOT_VERSION};
use catalog_filter::{parse_catalog, CatalogFilterJS};
use serde_json::Value;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const CSV: &str = "id,resource_type,grade,subject,topic,title,description,image_url,resource_url,answers_url,tips_url\n\
                   f1,Worksheet,Grade 5,Math,Fractions,Adding Fractions,Like denominators,/f1.png,/f1.pdf,/f1.txt,\n\
                   f2,Game,Grade 5,Math,Decimals,Decimal Dash,Race to one,/f2.png,/f2.pdf,,\n\
                   s1,Worksheet,Grade 6,Science,Plants,Plant Cells,Label the cell,/s1.png,/s1.pdf,,/s1-tips.txt\n";

fn snapshot_bytes() -> Vec<u8> {
    let report = parse_catalog(CSV).expect("catalog parses");
    to_compressed(&report.snapshot("web-test"), SNAPSHOT_VERSION).expect("snapshot encodes")
}

fn init() -> Value {
    let metadata = CatalogFilterJS::init(&snapshot_bytes()).expect("init succeeds");
    serde_wasm_bindgen::from_value(metadata).expect("metadata is an object")
}

fn to_json(value: JsValue) -> Value {
    serde_wasm_bindgen::from_value(value).expect("value converts to JSON")
}

fn field(object: &JsValue, name: &str) -> JsValue {
    js_sys::Reflect::get(object, &JsValue::from_str(name)).expect("object has properties")
}

#[wasm_bindgen_test]
fn init_returns_metadata() {
    let metadata = init();
    assert_eq!(metadata["resourceCount"].as_f64(), Some(3.0));
    assert_eq!(metadata["subjectCount"].as_f64(), Some(2.0));
    assert_eq!(metadata["version"], "web-test");
}

#[wasm_bindgen_test]
fn corrupt_snapshot_is_rejected() {
    assert!(CatalogFilterJS::init(b"not a snapshot").is_err());
}

#[wasm_bindgen_test]
fn facets_list_first_seen_options() {
    init();
    let facets = to_json(CatalogFilterJS::facets().unwrap());
    assert_eq!(facets["subjects"][0]["id"], "math");
    assert_eq!(facets["subjects"][1]["name"], "Science");
    assert_eq!(facets["resourceTypes"].as_array().map(Vec::len), Some(2));
    assert_eq!(facets["topics"].as_array().map(Vec::len), Some(3));
}

#[wasm_bindgen_test]
fn filter_accepts_partial_query() {
    init();
    let outcome = to_json(CatalogFilterJS::filter_resources(r#"{"selected":{"subject":"Math"}}"#).unwrap());
    assert_eq!(outcome["matched"].as_f64(), Some(2.0));
    assert_eq!(outcome["total"].as_f64(), Some(3.0));
    assert_eq!(outcome["resources"][1]["id"], "f2");

    let outcome = to_json(CatalogFilterJS::filter_resources(r#"{"searchText":"PLANT"}"#).unwrap());
    assert_eq!(outcome["matched"].as_f64(), Some(1.0));
    assert_eq!(outcome["resources"][0]["id"], "s1");

    let outcome = to_json(CatalogFilterJS::filter_resources("{}").unwrap());
    assert_eq!(outcome["matched"].as_f64(), Some(3.0));
}

#[wasm_bindgen_test]
fn malformed_query_is_an_error() {
    init();
    assert!(CatalogFilterJS::filter_resources("{\"selected\":").is_err());
}

#[wasm_bindgen_test]
fn missing_resource_is_an_error() {
    init();
    assert!(CatalogFilterJS::resource("missing").is_err());
    assert!(CatalogFilterJS::related("missing").is_err());
    assert!(CatalogFilterJS::download_filename("missing").is_err());
    assert!(CatalogFilterJS::answer_key("missing", "a").is_err());
}

#[wasm_bindgen_test]
fn absent_urls_are_null() {
    init();
    let resource = CatalogFilterJS::resource("f1").unwrap();
    assert_eq!(field(&resource, "answersUrl").as_string().as_deref(), Some("/f1.txt"));
    assert!(field(&resource, "tipsUrl").is_null());

    let related = CatalogFilterJS::related("f1").unwrap();
    let first = js_sys::Reflect::get_u32(&related, 0).unwrap();
    assert_eq!(field(&first, "id").as_string().as_deref(), Some("f2"));
    assert!(field(&first, "answersUrl").is_null());
}

#[wasm_bindgen_test]
fn detail_helpers() {
    init();
    assert_eq!(CatalogFilterJS::download_filename("s1").unwrap(), "plant-cells.pdf");
    assert_eq!(CatalogFilterJS::content_fallback(), "Content could not be loaded.");

    let entries = to_json(CatalogFilterJS::panel_entries("b\nc").unwrap());
    assert_eq!(entries[1]["number"].as_f64(), Some(2.0));
    assert_eq!(entries[1]["text"], "c");

    let layout = to_json(CatalogFilterJS::answer_key("f1", "1/2\n3/4").unwrap());
    assert_eq!(layout["filename"], "adding-fractions-answers.pdf");
    assert_eq!(layout["pages"][0]["lines"][1]["text"], "Adding Fractions");
    assert_eq!(layout["pages"][0]["lines"][3]["style"], "body");
}
