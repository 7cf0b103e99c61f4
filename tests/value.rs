use chrono::NaiveDate;
use estate_insight::value::{RawCell, Scalar, normalize};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn raw_cell() -> impl Strategy<Value = RawCell> {
    prop_oneof![
        Just(RawCell::Empty),
        any::<bool>().prop_map(RawCell::Bool),
        any::<i64>().prop_map(RawCell::Int),
        (-1.0e12f64..1.0e12f64).prop_map(RawCell::Float),
        (any::<i64>(), 0u32..8).prop_map(|(m, s)| RawCell::Decimal(Decimal::new(m, s))),
        (1900i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
            RawCell::Date(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
        }),
        "[ ₹$,%0-9.a-zA-Z-]{0,12}".prop_map(RawCell::Text),
    ]
}

proptest! {
    #[test]
    fn normalization_is_idempotent(cell in raw_cell()) {
        let once = normalize(&cell);
        let twice = normalize(&RawCell::from(once.clone()));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn decorated_integers_parse_to_their_value(n in 0i64..1_000_000_000) {
        let decorated = format!(" ₹{} ", group_indian(n));
        prop_assert_eq!(normalize(&RawCell::Text(decorated)), Scalar::Number(n as f64));
    }
}

/// Lakh-style grouping: last three digits, then pairs.
fn group_indian(n: i64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

#[test]
fn documented_normalization_cases() {
    let cases = [
        ("50,00,000", Scalar::Number(5_000_000.0)),
        ("₹ 1,234.50", Scalar::Number(1234.5)),
        ("12%", Scalar::Number(12.0)),
        ("  ", Scalar::Null),
        ("N/A", Scalar::Text("N/A".to_string())),
        ("₹", Scalar::Text("₹".to_string())),
        ("  Baner  ", Scalar::Text("Baner".to_string())),
        ("1.2.3", Scalar::Text("1.2.3".to_string())),
    ];
    for (input, expected) in cases {
        assert_eq!(normalize(&RawCell::from(input)), expected, "input {input:?}");
    }
}

#[test]
fn native_cells_keep_their_numbers() {
    assert_eq!(normalize(&RawCell::Int(2020)), Scalar::Number(2020.0));
    assert_eq!(normalize(&RawCell::Float(12.75)), Scalar::Number(12.75));
    assert_eq!(normalize(&RawCell::Bool(true)), Scalar::Number(1.0));
    assert_eq!(normalize(&RawCell::Empty), Scalar::Null);
    assert_eq!(
        normalize(&RawCell::Date(NaiveDate::from_ymd_opt(2021, 3, 4).expect("date"))),
        Scalar::Text("2021-03-04".to_string())
    );
}
