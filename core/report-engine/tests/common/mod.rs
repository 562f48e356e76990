//! FILENAME: tests/common/mod.rs
//! Fixtures for report engine integration tests.

#![allow(dead_code)]

use query_model::{Cell, Field, QueryResult, Row, Schema};

/// Visit data for three subjects, with a cohort that is only recorded on
/// some visits.
pub struct VisitFixture;

impl VisitFixture {
    pub fn fields() -> Vec<Field> {
        vec![
            Field::new("ParticipantId").with_caption("Participant"),
            Field::new("Cohort").demographic(),
            Field::new("Visit"),
            Field::new("Weight"),
            Field::new("Temperature"),
        ]
    }

    /// (participant, cohort, visit, weight, temperature)
    pub fn data() -> Vec<(&'static str, Option<&'static str>, &'static str, f64, f64)> {
        vec![
            ("PT-101", None, "Screening", 71.2, 36.6),
            ("PT-102", Some("Placebo"), "Screening", 80.5, 36.9),
            ("PT-101", Some("Vaccine"), "Week 2", 70.8, 37.1),
            ("PT-103", None, "Screening", 64.0, 36.5),
            ("PT-101", Some("Vaccine"), "Week 4", 70.1, 36.7),
            ("PT-102", Some("Placebo"), "Week 2", 81.0, 36.8),
        ]
    }

    pub fn result() -> QueryResult {
        let schema = Schema::new(Self::fields()).expect("fixture schema");
        let rows = Self::data()
            .into_iter()
            .map(|(pt, cohort, visit, weight, temp)| {
                Row::new(vec![
                    Cell::text(pt),
                    cohort.map(Cell::text).unwrap_or_else(Cell::null),
                    Cell::text(visit),
                    Cell::number(weight),
                    Cell::number(temp),
                ])
            })
            .collect();
        QueryResult::new(schema, rows)
    }
}

/// Resolves field names against a schema, panicking on unknown names.
pub fn fields(schema: &Schema, names: &[&str]) -> Vec<Field> {
    names
        .iter()
        .map(|n| schema.field(n).unwrap_or_else(|| panic!("no field {n}")).clone())
        .collect()
}

/// Builds a (Subject, Visit, Val) schema and rows from tuples.
pub fn subject_rows(data: &[(&str, &str, f64)]) -> (Schema, Vec<Row>) {
    let schema = Schema::new(vec![Field::new("Subject"), Field::new("Visit"), Field::new("Val")])
        .expect("schema");
    let rows = data
        .iter()
        .map(|(s, v, x)| Row::new(vec![Cell::text(*s), Cell::text(*v), Cell::number(*x)]))
        .collect();
    (schema, rows)
}
