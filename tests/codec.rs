// tests/codec.rs
//
// Artifact text format and schema resolution over decoded artifacts.

use chrono::{TimeZone, Utc};

use ibbi_scrape::csv::{decode, decode_keyed, decode_records, encode, encode_records};
use ibbi_scrape::model::{Assignment, PublicAnnouncement, RawRow, RecordKind};
use ibbi_scrape::normalize::{Batch, Normalizer};
use ibbi_scrape::schema::{Field, Mapping, SchemaMapper};
use ibbi_scrape::store::DataSet;

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn awkward_assignments() -> Vec<Assignment> {
    vec![
        Assignment {
            id: "assign_1_0".into(),
            corporate_debtor: "Acme, Pvt. Ltd.".into(),
            resolution_professional: "Jane \"JD\" Doe".into(),
            date: "2024-01-05".into(),
            status: "Active".into(),
            form_g_link: "https://ibbi.gov.in/docs/formg.pdf".into(),
            scraped_at: "2024-01-05T06:00:00.000Z".into(),
        },
        Assignment {
            id: "assign_1_1".into(),
            corporate_debtor: "Multi\nLine\r\nDebtor".into(),
            resolution_professional: "\"\"".into(),
            date: "".into(),
            status: "Closed".into(),
            form_g_link: "".into(),
            scraped_at: "2024-01-05T06:00:00.000Z".into(),
        },
    ]
}

#[test]
fn records_with_separators_quotes_and_newlines_round_trip() {
    let records = awkward_assignments();
    let text = encode_records(&records);
    assert!(text.starts_with("ID,Corporate Debtor,Resolution Professional,Date,Status,Form G Link,Scraped At\n"));
    assert_eq!(decode_records::<Assignment>(&text), records);
}

#[test]
fn dataset_round_trips_exactly() {
    let ds = DataSet {
        headers: strings(&["ID", "Title", "Note"]),
        rows: vec![
            strings(&["1", "a,b", "say \"hi\""]),
            strings(&["2", "", "trailing\n"]),
            strings(&["3", " padded ", "\"quoted\""]),
        ],
    };
    assert_eq!(decode(&encode(&ds)), ds);

    let single = DataSet {
        headers: strings(&["Note"]),
        rows: vec![strings(&[""]), strings(&["x"]), strings(&[""])],
    };
    assert_eq!(decode(&encode(&single)), single);
}

#[test]
fn empty_batch_round_trips_to_header_only() {
    let text = encode_records::<PublicAnnouncement>(&[]);
    assert_eq!(text, "ID,Title,Date,Link,Category,Scraped At\n");
    assert!(decode_records::<PublicAnnouncement>(&text).is_empty());
    assert_eq!(decode(&text).headers, RecordKind::PublicAnnouncements.header_row());
}

#[test]
fn header_precedence_follows_column_order() {
    let first = Mapping::resolve(RecordKind::Assignments, &strings(&["Company Name", "Corporate Debtor"]));
    let second = Mapping::resolve(RecordKind::Assignments, &strings(&["Corporate Debtor", "Company Name"]));
    assert_eq!(first.column(Field::Primary), Some(0));
    assert_eq!(second.column(Field::Primary), Some(0));
    assert_eq!(first.header(Field::Primary), Some("Company Name"));
    assert_eq!(second.header(Field::Primary), Some("Corporate Debtor"));

    // values follow the winning header
    let text = "Company Name,Corporate Debtor\nFrom Company,From Debtor\n";
    let (headers, rows) = decode_keyed(text);
    let mapper = SchemaMapper::new("https://ibbi.gov.in");
    assert_eq!(mapper.assignments(&headers, &rows)[0].corporate_debtor, "From Company");

    let text = "Corporate Debtor,Company Name\nFrom Debtor,From Company\n";
    let (headers, rows) = decode_keyed(text);
    assert_eq!(mapper.assignments(&headers, &rows)[0].corporate_debtor, "From Debtor");
}

#[test]
fn rows_without_a_usable_debtor_are_dropped() {
    let text = "\
Corporate Debtor,Resolution Professional,Status,Form G
,Nobody,Active,/a.pdf
Unknown,Someone,Active,/b.pdf
   ,Blank,,
Real Debtor,,,
";
    let mapper = SchemaMapper::new("https://ibbi.gov.in");
    let (headers, rows) = decode_keyed(text);
    let out = mapper.assignments(&headers, &rows);

    assert_eq!(out.len(), 1);
    let only = &out[0];
    assert_eq!(only.corporate_debtor, "Real Debtor");
    assert_eq!(only.resolution_professional, "");
    assert_eq!(only.date, "");
    assert_eq!(only.form_g_link, "");
    assert_eq!(only.scraped_at, "");
    assert_eq!(only.status, "Active");
}

#[test]
fn positional_artifact_rows_map_like_keyed_ones() {
    let text = encode_records(&awkward_assignments());
    let ds = decode(&text);
    let (headers, keyed) = decode_keyed(&text);
    let mapper = SchemaMapper::new("https://ibbi.gov.in");
    assert_eq!(mapper.assignments(&ds.headers, &ds.raw_rows()), mapper.assignments(&headers, &keyed));
}

#[test]
fn repeated_header_resolves_to_its_first_column() {
    let text = "Company,Company,Status\nFirst,Second,Closed\n";
    let headers = strings(&["Company", "Company", "Status"]);
    assert_eq!(Mapping::resolve(RecordKind::Assignments, &headers).column(Field::Primary), Some(0));

    let mapper = SchemaMapper::new("https://ibbi.gov.in");
    let (keyed_headers, keyed) = decode_keyed(text);
    let from_keyed = mapper.assignments(&keyed_headers, &keyed);
    let ds = decode(text);
    let from_positional = mapper.assignments(&ds.headers, &ds.raw_rows());

    assert_eq!(from_keyed.len(), 1);
    assert_eq!(from_keyed[0].corporate_debtor, "First");
    assert_eq!(from_keyed, from_positional);
}

#[test]
fn example_assignment_row_normalizes() {
    let started = Utc.with_ymd_and_hms(2024, 1, 5, 6, 0, 0).unwrap();
    let n = Normalizer::new("https://ibbi.gov.in", Batch::new(RecordKind::Assignments, started));
    let row = RawRow::Positional(strings(&[
        "Acme Pvt Ltd",
        "Jane Doe",
        "",
        "2024-01-05",
        "",
        "<a onclick=\"window.open('/docs/formg.pdf')\">",
    ]));

    let a = n.assignment(0, &row).unwrap();
    assert_eq!(a.corporate_debtor, "Acme Pvt Ltd");
    assert_eq!(a.resolution_professional, "Jane Doe");
    assert_eq!(a.date, "2024-01-05");
    assert_eq!(a.status, "Active");
    assert_eq!(a.form_g_link, "https://ibbi.gov.in/docs/formg.pdf");
}
