//! Integration tests for writing the upload files.

use euler_output::{
    ExportFormat, Exporter, InputCounts, Operator, ReportBuilder, UploadFile, summarize,
};
use euler_reconcile::{AttributeName, AttributeRow, AttributeValue, EulerId, ReconciledSecurity};

fn securities() -> Vec<ReconciledSecurity> {
    vec![
        ReconciledSecurity {
            euler_id: EulerId::from(1),
            request_id: "R1".to_string(),
            symbol: Some("AAPL".to_string()),
            queuesip: None,
            mic: "XNYS".to_string(),
        },
        ReconciledSecurity {
            euler_id: EulerId::from(2),
            request_id: "R2".to_string(),
            symbol: Some("BF,B".to_string()),
            queuesip: Some("12345".to_string()),
            mic: "XNYS".to_string(),
        },
    ]
}

fn attributes() -> Vec<AttributeRow> {
    vec![
        AttributeRow {
            euler_id: EulerId::from(1),
            name: AttributeName::ExchangeName,
            value: AttributeValue::Text("New York Stock Exchange".to_string()),
        },
        AttributeRow {
            euler_id: EulerId::from(1),
            name: AttributeName::AssetClass,
            value: AttributeValue::Text("Domestic Equity".to_string()),
        },
        AttributeRow {
            euler_id: EulerId::from(2),
            name: AttributeName::AssetClass,
            value: AttributeValue::Text("Domestic Equity".to_string()),
        },
    ]
}

#[test]
fn test_write_upload_files() {
    let dir = tempfile::tempdir().unwrap();
    let operator = Operator::new("Ada", "Lovelace");

    let section1 = UploadFile::SecurityUpload.path(dir.path(), &operator);
    let section2 = UploadFile::AttributeUpload.path(dir.path(), &operator);
    securities()
        .export_to_file(&section1, UploadFile::SecurityUpload.format())
        .unwrap();
    attributes()
        .export_to_file(&section2, UploadFile::AttributeUpload.format())
        .unwrap();

    assert!(dir.path().join("Ada_Lovelace_section1.csv").exists());
    assert!(dir.path().join("Ada_Lovelace_section2.csv").exists());

    // Fields containing the delimiter are quoted.
    let content = std::fs::read_to_string(&section1).unwrap();
    assert_eq!(
        content,
        "EulerId,RequestId,Symbol,QUEUESIP,MIC\n1,R1,AAPL,,XNYS\n2,R2,\"BF,B\",12345,XNYS\n"
    );
}

#[test]
fn test_upload_reads_back() {
    let csv = attributes().export_to_string(ExportFormat::Csv).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<AttributeRow> = reader.deserialize().map(|r| r.unwrap()).collect();

    assert_eq!(rows, attributes());
}

#[test]
fn test_summary_report_file() {
    let dir = tempfile::tempdir().unwrap();
    let operator = Operator::new("Ada", "Lovelace");
    let counts = InputCounts {
        stock_list: 3,
        filtered_stock_list: 3,
        security_master: 2,
        eligible_master: 2,
    };
    let summary = summarize(counts, &securities(), &attributes());
    assert_eq!(summary.asset_classes[0].count, 2);
    assert_eq!(summary.unloadable(), 1);

    let path = UploadFile::Summary.path(dir.path(), &operator);
    ReportBuilder::new()
        .operator(operator.clone())
        .file(UploadFile::SecurityUpload.file_name(&operator))
        .summary(summary)
        .build()
        .unwrap()
        .write_to(&path)
        .unwrap();

    let json = std::fs::read_to_string(dir.path().join("Ada_Lovelace_summary.json")).unwrap();
    assert!(json.contains("Domestic Equity"));
    assert!(json.contains("Ada_Lovelace_section1.csv"));
}
