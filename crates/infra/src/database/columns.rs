//! Column codecs shared by the SQLite repositories
//!
//! Decimals are stored as their canonical text so a value reads back with
//! the exact digits and scale it was written with.

use std::str::FromStr;

use rust_decimal::Decimal;
use rusqlite::types::Type;
use rusqlite::Row;

pub(crate) fn decimal_text(value: &Decimal) -> String {
    value.to_string()
}

pub(crate) fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

/// Parse a text column through the type's `FromStr` (status enums).
pub(crate) fn parsed_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse::<T>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use siteledger_domain::BillStatus;

    use super::*;

    #[test]
    fn decimal_text_keeps_scale() {
        let conn = Connection::open_in_memory().unwrap();
        let value = Decimal::new(1_408_750, 2);

        let back = conn
            .query_row("SELECT ?1", [decimal_text(&value)], |row| decimal_column(row, 0))
            .unwrap();

        assert_eq!(back, value);
        assert_eq!(back.to_string(), "14087.50");
    }

    #[test]
    fn malformed_text_is_a_conversion_failure() {
        let conn = Connection::open_in_memory().unwrap();

        let err = conn.query_row("SELECT 'twelve'", [], |row| decimal_column(row, 0)).unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _)));

        let err = conn
            .query_row("SELECT 'paid'", [], |row| parsed_column::<BillStatus>(row, 0))
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _)));
    }
}
