//! Integration tests for loading input tables from a data directory.

use euler_data::{DataError, DataSource, InputFile, StockListRecord};
use rstest::rstest;
use std::fs;
use std::path::Path;

fn write_inputs(dir: &Path) {
    fs::write(
        dir.join(InputFile::Exchange.file_name()),
        "MIC|name|domicile|city\nXNYS|New York Stock Exchange|United States|New York\nXLON|London Stock Exchange|United Kingdom|London\n",
    )
    .unwrap();
    fs::write(
        dir.join(InputFile::StockList.file_name()),
        "RequestId,Symbol,QUEUESIP,MIC\nR1,AAPL,,XNYS\nR2,,4711,XLON\n",
    )
    .unwrap();
    fs::write(
        dir.join(InputFile::SecurityMaster.file_name()),
        "Ticker,QUEUESIP,Strong Oak Identifier\nAAPLp,,SO1\n,4711,SO2\n",
    )
    .unwrap();
    fs::write(
        dir.join(InputFile::Attributes.file_name()),
        "RequestId,Asset Class,Inception Date,Security Name,Return Since Inception\nR1,Domestic Equity,1980-12-12,Apple Inc,12.5\n",
    )
    .unwrap();
}

#[test]
fn test_load_all_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let tables = DataSource::new(dir.path()).load_all().unwrap();

    assert_eq!(tables.exchanges.len(), 2);
    assert_eq!(tables.stock_list.len(), 2);
    assert_eq!(tables.security_master.len(), 2);
    assert_eq!(tables.attributes.len(), 1);

    assert_eq!(
        tables.stock_list[1],
        StockListRecord::new("R2", None, Some("4711"), "XLON")
    );
    assert_eq!(tables.security_master[0].symbol.as_deref(), Some("AAPLp"));
    assert_eq!(
        tables.attributes[0].security_name.as_deref(),
        Some("Apple Inc")
    );
}

#[test]
fn test_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();

    let err = DataSource::new(dir.path()).exchanges().unwrap_err();

    assert!(matches!(err, DataError::Open { .. }));
    assert!(err.to_string().contains("exchange.data"));
}

#[test]
fn test_malformed_row_names_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(InputFile::StockList.file_name()),
        "RequestId,Symbol,QUEUESIP,MIC\nR1,AAPL,,XNYS,extra\n",
    )
    .unwrap();

    let err = DataSource::new(dir.path()).stock_list().unwrap_err();

    assert!(matches!(err, DataError::Read { .. }));
    assert!(err.to_string().contains("stock.data"));
}

#[test]
fn test_stock_list_requires_request_id() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(InputFile::StockList.file_name()),
        "RequestId,Symbol,QUEUESIP,MIC\n,AAPL,,XNYS\n",
    )
    .unwrap();

    let err = DataSource::new(dir.path()).stock_list().unwrap_err();

    assert!(matches!(err, DataError::Parse(_)));
    assert!(err.to_string().contains("RequestId"));
}

#[test]
fn test_stock_list_keeps_blank_mic() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(InputFile::StockList.file_name()),
        "RequestId,Symbol,QUEUESIP,MIC\nR1,AAPL,,XNYS\nR2,VOD,,\n",
    )
    .unwrap();

    let rows = DataSource::new(dir.path()).stock_list().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], StockListRecord::new("R2", Some("VOD"), None, ""));
}

#[rstest]
#[case(
    InputFile::Exchange,
    "MIC|name|domicile|city\nXNYS|New York Stock Exchange|United States|New York\n|Unlisted|Canada|Toronto\n"
)]
#[case(
    InputFile::Attributes,
    "RequestId,Asset Class,Inception Date,Security Name,Return Since Inception\nR1,ETF,,,\n,ETF,,,\n"
)]
fn test_keyless_lookup_rows_are_skipped(#[case] file: InputFile, #[case] contents: &str) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(file.file_name()), contents).unwrap();
    let source = DataSource::new(dir.path());

    let rows = match file {
        InputFile::Exchange => source.exchanges().unwrap().len(),
        InputFile::Attributes => source.attributes().unwrap().len(),
        InputFile::StockList | InputFile::SecurityMaster => unreachable!(),
    };

    assert_eq!(rows, 1);
}
