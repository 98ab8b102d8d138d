use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use taric_match::services::batch::{self, BatchOptions, BatchReport};
use taric_match::{ClientConfig, TaricClient, TaricError, TradeMovement};

fn options(dir: &Path, column: &str) -> BatchOptions {
    BatchOptions {
        input: dir.join("codes.csv"),
        output: dir.join("out.csv"),
        column: column.to_string(),
        country_code: Some("cn".to_string()),
        trade_movement: TradeMovement::Import,
        reference_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15),
    }
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn batch_writes_one_row_per_measure_and_placeholders() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("codes.csv"),
        "name, Goods_Code \nCar,87032319\nShirt,61091000.0\nBlank,\nHorse,01012100\n",
    )
    .unwrap();

    let client = TaricClient::new(ClientConfig::substitute()).unwrap();
    let opts = options(dir.path(), "goods_code");
    let report = batch::run(&client, &opts).unwrap();

    assert_eq!(
        report,
        BatchReport {
            codes: 4,
            rows: 6,
            placeholders: 2,
            substituted: 5,
        }
    );

    let mut reader = csv::Reader::from_path(&opts.output).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers[0], "goods_code");
    assert_eq!(headers.last().map(String::as_str), Some("error"));

    let rows = read_rows(&opts.output);
    assert_eq!(rows.len(), 6);

    // 87032319: third country duty first
    assert_eq!(rows[0][0], "87032319");
    assert_eq!(rows[0][1], "CN");
    assert_eq!(rows[0][4], "103");
    assert_eq!(rows[0][6], "10%");
    assert_eq!(rows[0][10], "R(2024)1234");
    assert_eq!(rows[0][12], "substitute");

    // float-suffixed cell normalised
    assert_eq!(rows[2][0], "61091000");
    assert_eq!(rows[3][11], "091234");

    // blank cell
    assert_eq!(rows[4][0], "");
    assert_eq!(rows[4][4], "-");
    assert_eq!(rows[4][13], "empty goods code");

    // unknown code, no measures
    assert_eq!(rows[5][0], "01012100");
    assert_eq!(rows[5][4], "-");
    assert_eq!(rows[5][13], "");
}

#[test]
fn missing_column_is_a_configuration_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("codes.csv"), "hs,name\n8703,Car\n").unwrap();

    let client = TaricClient::new(ClientConfig::substitute()).unwrap();
    let opts = options(dir.path(), "goods_code");

    match batch::run(&client, &opts) {
        Err(TaricError::MissingColumn { column, available }) => {
            assert_eq!(column, "goods_code");
            assert_eq!(available, vec!["hs".to_string(), "name".to_string()]);
        }
        other => panic!("expected missing column, got {other:?}"),
    }
    assert!(!opts.output.exists());
}

#[test]
fn batch_completes_when_service_is_unreachable() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("codes.csv"), "code\n87032319\n85171300\n").unwrap();

    let cfg = ClientConfig::default()
        .with_api_url(Some("http://127.0.0.1:9/taric"))
        .with_timeout(std::time::Duration::from_secs(2))
        .with_max_requests_per_second(0);
    let client = TaricClient::new(cfg).unwrap();
    let report = batch::run(&client, &options(dir.path(), "CODE")).unwrap();

    assert_eq!(report.codes, 2);
    assert_eq!(report.rows, 3);
    assert_eq!(report.substituted, 3);
}

#[test]
fn gbk_encoded_input_is_read() {
    let dir = tempdir().unwrap();
    let (bytes, _, _) = encoding_rs::GBK.encode("商品名称,goods_code\n小汽车,87032319\n智能手机,85171300\n");
    fs::write(dir.path().join("codes.csv"), &bytes).unwrap();

    let codes = batch::read_codes(&dir.path().join("codes.csv"), "goods_code").unwrap();
    assert_eq!(codes, vec!["87032319".to_string(), "85171300".to_string()]);
}
