//! The immutable flight lookup table.
//!
//! A [`FlightTable`] is built once at startup, either from the reference
//! data or from a JSON file, and is only ever read afterwards. Sharing it
//! across request handlers therefore needs no locking: wrap it in an `Arc`
//! and hand out clones of the pointer.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::status;
use crate::error::TableError;
use crate::record::{normalize_flight_id, FlightRecord};

/// Mapping from normalized flight id to its simulated delay record.
///
/// Entries keep the order they were supplied in so that operator listings
/// are stable; lookups go through a hash index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightTable {
    records: Vec<FlightRecord>,
    index: HashMap<String, usize>,
}

impl FlightTable {
    /// The demo table used by the oracle integration scenarios.
    ///
    /// Covers the three outcomes a payout oracle must handle: eligible
    /// delays, delays under the threshold, and on-time flights.
    pub fn reference() -> Self {
        let records = [
            // Eligible for payout
            ("BF1234", 210, status::DELAYED),
            ("BA001", 45, status::DELAYED),
            ("LH888", 120, status::DELAYED),
            // Delayed, but under the threshold
            ("AF777", 15, status::DELAYED),
            ("KL002", 29, status::DELAYED),
            // On time
            ("QA999", 0, status::ON_TIME),
            ("US101", 5, status::ON_TIME),
        ]
        .into_iter()
        .map(|(id, delay, label)| FlightRecord::new(id, delay, label))
        .collect::<Vec<_>>();

        let index = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.flight_id.clone(), i))
            .collect();

        Self { records, index }
    }

    /// Builds a table from arbitrary records, normalizing every flight id.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::EmptyFlightId`] for an empty id and
    /// [`TableError::DuplicateFlight`] when two ids collide after normalization.
    pub fn from_records<I>(records: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = FlightRecord>,
    {
        let mut table = Self {
            records: Vec::new(),
            index: HashMap::new(),
        };

        for mut record in records {
            if record.flight_id.is_empty() {
                return Err(TableError::EmptyFlightId);
            }
            record.flight_id = normalize_flight_id(&record.flight_id);
            if table.index.contains_key(&record.flight_id) {
                return Err(TableError::DuplicateFlight(record.flight_id));
            }
            table
                .index
                .insert(record.flight_id.clone(), table.records.len());
            table.records.push(record);
        }

        Ok(table)
    }

    /// Parses a JSON array of records in the same shape the service responds with.
    ///
    /// ```json
    /// [{"flightId": "BF1234", "delay_minutes": 210, "status": "Delayed"}]
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let records: Vec<FlightRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Reads and parses a table file. See [`FlightTable::from_json_str`] for the format.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Looks up the delay status of a flight.
    ///
    /// The identifier is uppercased before lookup. Unknown identifiers,
    /// including the empty string, yield an on-time record with zero delay
    /// rather than an error.
    pub fn get_status(&self, flight_id: &str) -> FlightRecord {
        let flight_id = normalize_flight_id(flight_id);
        match self.index.get(&flight_id) {
            Some(&i) => self.records[i].clone(),
            None => FlightRecord::on_time(flight_id),
        }
    }

    /// Whether the (normalized) flight id has an explicit entry.
    pub fn contains(&self, flight_id: &str) -> bool {
        self.index.contains_key(&normalize_flight_id(flight_id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FlightRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_keys_are_normalized() {
        let table = FlightTable::reference();
        assert_eq!(table.len(), 7);
        for record in table.iter() {
            assert_eq!(record.flight_id, normalize_flight_id(&record.flight_id));
        }
    }

    #[test]
    fn reference_keeps_declaration_order() {
        let ids: Vec<_> = FlightTable::reference()
            .iter()
            .map(|r| r.flight_id.clone())
            .collect();
        assert_eq!(
            ids,
            ["BF1234", "BA001", "LH888", "AF777", "KL002", "QA999", "US101"]
        );
    }

    #[test]
    fn known_flight_is_returned_as_stored() {
        let table = FlightTable::reference();
        assert_eq!(
            table.get_status("lh888"),
            FlightRecord::new("LH888", 120, "Delayed")
        );
    }

    #[test]
    fn unknown_flight_falls_back_to_on_time() {
        let table = FlightTable::reference();
        assert_eq!(table.get_status("xx1"), FlightRecord::on_time("XX1"));
    }

    #[test]
    fn from_records_normalizes_keys() {
        let table =
            FlightTable::from_records([FlightRecord::new("ab12", 40, "Delayed")]).unwrap();
        assert!(table.contains("AB12"));
        assert_eq!(table.get_status("Ab12").flight_id, "AB12");
    }

    #[test]
    fn from_records_rejects_case_duplicates() {
        let err = FlightTable::from_records([
            FlightRecord::new("ba001", 45, "Delayed"),
            FlightRecord::new("BA001", 10, "Delayed"),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicateFlight(id) if id == "BA001"));
    }

    #[test]
    fn from_records_rejects_empty_id() {
        let err = FlightTable::from_records([FlightRecord::new("", 0, "On Time")]).unwrap_err();
        assert!(matches!(err, TableError::EmptyFlightId));
    }

    #[test]
    fn from_json_str_accepts_wire_shape() {
        let table = FlightTable::from_json_str(
            r#"[{"flightId": "ek7", "delay_minutes": 90, "status": "Delayed"}]"#,
        )
        .unwrap();
        assert_eq!(table.get_status("EK7"), FlightRecord::new("EK7", 90, "Delayed"));
    }

    #[test]
    fn from_json_str_rejects_negative_delay() {
        let err = FlightTable::from_json_str(
            r#"[{"flightId": "EK7", "delay_minutes": -5, "status": "Delayed"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::Parse(_)));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = FlightTable::from_path("/nonexistent/flights.json").unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn empty_table_answers_everything_on_time() {
        let table = FlightTable::from_records(Vec::<FlightRecord>::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.get_status("bf1234"), FlightRecord::on_time("BF1234"));
    }
}
