mod common;

use common::{Cell, TestWorkspace, xlsx_bytes};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use estate_insight::{
    areas::detect_areas,
    heuristics::Heuristics,
    ingest::{LoadOptions, load_bytes, load_path},
    query::{QueryRequest, run_query},
    schema::infer_schema,
    series::SeriesPoint,
    value::Scalar,
};

fn listing_workbook() -> Vec<u8> {
    xlsx_bytes(&[
        (
            "Listings",
            vec![
                vec![
                    Cell::Text("Area"),
                    Cell::Text("Year"),
                    Cell::Text("Price (₹)"),
                ],
                vec![
                    Cell::Text("Koregaon Park"),
                    Cell::Text("2020"),
                    Cell::Text("50,00,000"),
                ],
                vec![
                    Cell::Text("Baner"),
                    Cell::Number(2021.0),
                    Cell::Number(6_500_000.0),
                ],
            ],
        ),
        ("Notes", Vec::new()),
    ])
}

#[test]
fn workbook_upload_flows_through_query() {
    let dataset = load_bytes(listing_workbook(), "listings.xlsx", &LoadOptions::default())
        .expect("parse workbook");
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.columns(), vec!["area", "year", "price (₹)"]);

    let heuristics = Heuristics::default();
    let roles = infer_schema(&dataset, &heuristics);
    assert_eq!(roles.price, vec!["price (₹)"]);
    assert!(roles.demand.is_empty());

    let result = run_query(&dataset, &QueryRequest::text("koregaon"), &heuristics);
    assert_eq!(result.records.len(), 1);
    assert_eq!(
        result.price_series,
        vec![SeriesPoint {
            year: 2020,
            value: 5_000_000.0
        }]
    );
    assert!(
        result
            .summary
            .starts_with("Analysis for koregaon: 1 records, years: 2020–2020, avg price ≈ ₹5,000,000"),
        "unexpected summary: {}",
        result.summary
    );
}

#[test]
fn workbook_on_disk_matches_in_memory_upload() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_bytes("listings.xlsx", &listing_workbook());
    let from_disk = load_path(&path, &LoadOptions::default()).expect("load xlsx");
    let from_memory =
        load_bytes(listing_workbook(), "listings.xlsx", &LoadOptions::default()).expect("parse");
    assert_eq!(from_disk.records(), from_memory.records());
}

#[test]
fn sheets_are_concatenated_with_their_own_headers() {
    let bytes = xlsx_bytes(&[
        (
            "2020",
            vec![
                vec![Cell::Text("Locality"), Cell::Text("Rate")],
                vec![Cell::Text("Wakad"), Cell::Number(540.0)],
            ],
        ),
        (
            "2021",
            vec![
                vec![Cell::Text("Locality"), Cell::Text("Rate"), Cell::Blank, Cell::Text("FY")],
                vec![
                    Cell::Text("Wakad"),
                    Cell::Number(5900.0),
                    Cell::Text("new launch"),
                    Cell::Text("FY2021-22"),
                ],
            ],
        ),
    ]);
    let dataset = load_bytes(bytes, "rates.xlsx", &LoadOptions::default()).expect("parse");
    assert_eq!(dataset.len(), 2);

    let first = &dataset.records()[0];
    assert_eq!(first.get("rate"), Some(&Scalar::Number(540.0)));
    assert!(!first.contains_key("year"), "no four-digit field to infer from");

    let second = &dataset.records()[1];
    assert_eq!(second.get("col_2"), Some(&Scalar::Text("new launch".into())));
    assert_eq!(second.get("fy"), Some(&Scalar::Text("FY2021-22".into())));
    // The first field carrying four digits wins, even when it is a rate.
    assert_eq!(second.get("year"), Some(&Scalar::Number(5900.0)));
}

#[test]
fn delimited_upload_infers_year_from_first_date_like_field() {
    let csv = "Locality,Period,Sales\nHinjewadi,2019 Q1,\"1,200\"\nHinjewadi,2019 Q2,\n";
    let dataset =
        load_bytes(csv.as_bytes().to_vec(), "sales.csv", &LoadOptions::default()).expect("parse");
    assert_eq!(dataset.len(), 2);
    let record = &dataset.records()[0];
    assert_eq!(record.get("year"), Some(&Scalar::Number(2019.0)));
    assert_eq!(record.get("sales"), Some(&Scalar::Number(1200.0)));
    assert_eq!(dataset.records()[1].get("sales"), Some(&Scalar::Null));
}

#[test]
fn short_rows_are_padded_and_long_rows_get_positional_keys() {
    let csv = "Area,Price\nBaner\nAundh,100,extra\n";
    let dataset =
        load_bytes(csv.as_bytes().to_vec(), "ragged.csv", &LoadOptions::default()).expect("parse");
    let short = &dataset.records()[0];
    assert_eq!(short.get("price"), Some(&Scalar::Null));
    let long = &dataset.records()[1];
    assert_eq!(long.get("col_2"), Some(&Scalar::Text("extra".into())));
}

#[test]
fn unreadable_workbook_is_a_parse_error() {
    let err = load_bytes(b"not a workbook".to_vec(), "broken.xlsx", &LoadOptions::default())
        .expect_err("garbage should not parse");
    assert!(err.to_string().contains("broken.xlsx"), "{err}");
}

#[test]
fn schema_falls_back_to_first_mostly_numeric_column() {
    let csv = "locality,price_inr,notes\n\
               Baner,on request,12\n\
               Wakad,call,15\n\
               Aundh,on request,18\n\
               Kothrud,tbd,20\n\
               Undri,call,n/a\n";
    let dataset =
        load_bytes(csv.as_bytes().to_vec(), "notes.csv", &LoadOptions::default()).expect("parse");
    let heuristics = Heuristics::default();
    let roles = infer_schema(&dataset, &heuristics);
    assert_eq!(roles.price, vec!["notes"]);
    assert!(roles.demand.is_empty());

    let areas = detect_areas(&dataset, 3, &heuristics);
    assert_eq!(areas, vec!["Baner", "Wakad", "Aundh"]);
}

#[test]
fn date_and_time_cells_become_iso_text() {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let time_format = Format::new().set_num_format("hh:mm:ss");
    let listed = ExcelDateTime::from_ymd(2021, 3, 4).expect("date");
    let opens = ExcelDateTime::from_hms(12, 0, 0).expect("time");
    worksheet.write_string(0, 0, "Area").expect("header");
    worksheet.write_string(0, 1, "Listed").expect("header");
    worksheet.write_string(0, 2, "Opens").expect("header");
    worksheet.write_string(1, 0, "Baner").expect("area");
    worksheet
        .write_datetime_with_format(1, 1, &listed, &date_format)
        .expect("date cell");
    worksheet
        .write_datetime_with_format(1, 2, &opens, &time_format)
        .expect("time cell");
    let bytes = workbook.save_to_buffer().expect("serialize workbook");

    let dataset = load_bytes(bytes, "dates.xlsx", &LoadOptions::default()).expect("parse");
    let record = &dataset.records()[0];
    assert_eq!(
        record.get("listed"),
        Some(&Scalar::Text("2021-03-04T00:00:00".into()))
    );
    assert_eq!(record.get("opens"), Some(&Scalar::Text("12:00:00".into())));
    assert_eq!(record.get("year"), Some(&Scalar::Number(2021.0)));
}
