//! Integration tests for the shelter loading pipeline
//!
//! Drive the library end to end over temporary CSV files. Persistence goes
//! through the in-memory store or a store that fails on demand, so no
//! database is needed.

use async_trait::async_trait;
use shelter_loader::pipeline::{self, ShelterDocument, load_rows};
use shelter_loader::report::Reporter;
use shelter_loader::{
    ColumnMap, Loader, LoaderConfig, LoaderError, MemoryStore, PlaceRow, RowExtractor,
    ShelterStore, StoreError,
};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

const HEADER: &str = "全国地方公共団体コード,ID,地方公共団体名,名称,名称_カナ,名称_通称,名称_通称_カナ,\
所在地_全国地方公共団体コード,所在地_連結表記,所在地_都道府県,所在地_市区町村,所在地_町字,所在地_番地以下,\
建物名等(方書),緯度,経度,高度,電話番号,内線番号,連絡先メールアドレス,連絡先FormURL,連絡先備考(その他),\
郵便番号,施設ID,災害種別_洪水,災害種別_崖崩れ等,災害種別_土石流,災害種別_地滑り,災害種別_高潮,\
災害種別_地震,災害種別_津波,災害種別_大規模な火事,災害種別_内水氾濫,URL";

/// Store that fails the insert for rows with chosen names, like a constraint violation would
///
/// `attempts` is shared so it can be read even when the run never hands the
/// store back.
struct RefusingStore {
    refused: Vec<String>,
    rows: Vec<PlaceRow>,
    attempts: Arc<AtomicUsize>,
}

impl RefusingStore {
    fn new(refused: &[&str]) -> Self {
        Self {
            refused: refused.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ShelterStore for RefusingStore {
    async fn insert(&mut self, row: &PlaceRow) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.refused.contains(&row.name) {
            return Err(StoreError::rejected(format!(
                "check constraint violated for '{}'",
                row.name
            )));
        }
        self.rows.push(row.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "refusing test store".to_string()
    }
}

fn shelter_line(name: &str, latitude: &str, longitude: &str, telephone: &str, url: &str) -> String {
    let mut cells = vec![String::new(); 34];
    cells[0] = "172014".to_string();
    cells[2] = "富山市".to_string();
    cells[3] = name.to_string();
    cells[4] = format!("{}カナ", name);
    cells[8] = format!("富山県富山市{}", name);
    cells[14] = latitude.to_string();
    cells[15] = longitude.to_string();
    cells[17] = telephone.to_string();
    cells[33] = url.to_string();
    cells.join(",")
}

fn write_document(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn config_for(file: &NamedTempFile) -> LoaderConfig {
    LoaderConfig::default()
        .with_input_path(file.path())
        .with_dry_run()
}

#[test]
fn test_header_has_expected_width() {
    assert_eq!(HEADER.split(',').count(), 34);
}

#[tokio::test]
async fn test_valid_then_invalid_latitude() {
    let file = write_document(&[
        shelter_line("A", "35.0", "139.0", "", ""),
        shelter_line("B", "xx", "139.0", "", ""),
    ]);

    let (store, outcome) =
        pipeline::run(&config_for(&file), MemoryStore::new(), &mut Reporter::hidden())
            .await
            .unwrap();

    assert_eq!(store.rows().len(), 1);
    assert_eq!(store.rows()[0].id, "0001");
    assert_eq!(store.rows()[0].name, "A");
    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.error_count, 1);
}

#[tokio::test]
async fn test_identifiers_track_persisted_rows_only() {
    let file = write_document(&[
        shelter_line("一", "36.1", "137.1", "", ""),
        shelter_line("二", "abc", "137.2", "", ""),
        shelter_line("三", "36.3", "137.3", "", ""),
        shelter_line("四", "36.4", "137.4", "", ""),
        shelter_line("五", "36.5", "", "", ""),
        shelter_line("六", "36.6", "137.6", "", ""),
    ]);

    let (store, outcome) = pipeline::run(
        &config_for(&file),
        RefusingStore::new(&["四"]),
        &mut Reporter::hidden(),
    )
    .await
    .unwrap();

    let persisted: Vec<_> = store
        .rows
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str()))
        .collect();
    assert_eq!(persisted, vec![("0001", "一"), ("0002", "三"), ("0003", "六")]);

    // Validation failures never reach the store
    assert_eq!(store.attempts.load(Ordering::SeqCst), 4);

    // N = 6, K = 2, M = 1
    assert_eq!(outcome.success_count, 3);
    assert_eq!(outcome.error_count, 3);
    assert_eq!(outcome.total_processed(), 6);
}

#[tokio::test]
async fn test_contact_fields_null_other_text_kept() {
    let file = write_document(&[
        shelter_line("", "36.7", "137.2", "", ""),
        shelter_line(
            "市民プラザ",
            "36.7",
            "137.2",
            "076-000-1111",
            "https://example.jp/plaza",
        ),
    ]);

    let (store, _) =
        pipeline::run(&config_for(&file), MemoryStore::new(), &mut Reporter::hidden())
            .await
            .unwrap();

    let empty = &store.rows()[0];
    assert_eq!(empty.name, "");
    assert_eq!(empty.name_kana, "カナ");
    assert_eq!(empty.tel, None);
    assert_eq!(empty.url, None);

    let full = &store.rows()[1];
    assert_eq!(full.tel.as_deref(), Some("076-000-1111"));
    assert_eq!(full.url.as_deref(), Some("https://example.jp/plaza"));
    assert_eq!(full.address, "富山県富山市市民プラザ");
}

#[tokio::test]
async fn test_header_only_document_performs_no_inserts() {
    let file = write_document(&[]);
    let store = RefusingStore::new(&[]);
    let attempts = Arc::clone(&store.attempts);

    let result = pipeline::run(&config_for(&file), store, &mut Reporter::hidden()).await;

    assert!(matches!(result, Err(LoaderError::NoDataRows { .. })));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_badly_encoded_row_fails_alone() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "{}", shelter_line("A", "36.1", "137.1", "", "")).unwrap();
    let mut bad = vec![0xFF];
    bad.extend_from_slice(shelter_line("B", "36.2", "137.2", "", "").as_bytes());
    bad.push(b'\n');
    file.write_all(&bad).unwrap();
    writeln!(file, "{}", shelter_line("C", "36.3", "137.3", "", "")).unwrap();

    let store = RefusingStore::new(&[]);
    let attempts = Arc::clone(&store.attempts);
    let (store, outcome) = pipeline::run(&config_for(&file), store, &mut Reporter::hidden())
        .await
        .unwrap();

    let persisted: Vec<_> = store
        .rows
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str()))
        .collect();
    assert_eq!(persisted, vec![("0001", "A"), ("0002", "C")]);
    // The undecodable row never reaches the store
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.error_count, 1);
}

#[tokio::test]
async fn test_unreadable_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoaderConfig::default()
        .with_input_path(dir.path())
        .with_dry_run();
    let store = RefusingStore::new(&[]);
    let attempts = Arc::clone(&store.attempts);

    let result = pipeline::run(&config, store, &mut Reporter::hidden()).await;

    assert!(matches!(result, Err(LoaderError::CsvRead { .. })));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_input_is_fatal() {
    let config = LoaderConfig::default()
        .with_input_path("/nonexistent/172014_evacuation_space.csv")
        .with_dry_run();

    let result = pipeline::run(&config, MemoryStore::new(), &mut Reporter::hidden()).await;

    assert!(matches!(result, Err(LoaderError::InputNotFound { .. })));
}

#[tokio::test]
async fn test_quoted_fields_with_commas() {
    let mut cells = vec![String::new(); 34];
    cells[3] = "\"公民館, 別館\"".to_string();
    cells[14] = "36.7".to_string();
    cells[15] = "137.2".to_string();
    let file = write_document(&[cells.join(",")]);

    let (store, outcome) =
        pipeline::run(&config_for(&file), MemoryStore::new(), &mut Reporter::hidden())
            .await
            .unwrap();

    assert_eq!(outcome.success_count, 1);
    assert_eq!(store.rows()[0].name, "公民館, 別館");
}

#[tokio::test]
async fn test_custom_column_map_from_config() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "name,lat,lon,tel,url,kana,address").unwrap();
    writeln!(file, "集会所,35.5,139.5,,,シュウカイジョ,どこか").unwrap();

    let config = LoaderConfig::default()
        .with_input_path(file.path())
        .with_columns(ColumnMap {
            name: 0,
            latitude: 1,
            longitude: 2,
            telephone: 3,
            url: 4,
            name_kana: 5,
            address: 6,
        })
        .with_dry_run();

    let (store, outcome) = pipeline::run(&config, MemoryStore::new(), &mut Reporter::hidden())
        .await
        .unwrap();

    assert_eq!(outcome.success_count, 1);
    let row = &store.rows()[0];
    assert_eq!(row.name, "集会所");
    assert_eq!(row.name_kana, "シュウカイジョ");
    assert_eq!(row.lat, 35.5);
    assert_eq!(row.lon, 139.5);
}

#[tokio::test]
async fn test_load_rows_reports_source_lines() {
    let file = write_document(&[
        shelter_line("A", "36.1", "137.1", "", ""),
        shelter_line("B", "bad", "137.2", "", ""),
    ]);
    let document = ShelterDocument::read(file.path()).unwrap();

    assert_eq!(document.rows[1].line, 3);

    let (store, outcome) = load_rows(
        &document.rows,
        &RowExtractor::default(),
        Loader::new(MemoryStore::new()),
        &Reporter::hidden(),
    )
    .await;

    assert_eq!(store.rows().len(), 1);
    assert_eq!(outcome.error_count, 1);
}
