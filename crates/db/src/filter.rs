//! Dynamic WHERE-clause builder shared by the list, count and stats queries.
//!
//! Every list endpoint accepts a handful of optional equality filters plus
//! an inclusive date range. [`Filter`] accumulates the active conditions with
//! numbered placeholders and replays the bind values onto a sqlx query in
//! the same order.

use hrms_core::types::{Date, DbId, Timestamp};
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// Typed bind value for dynamically-built queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(i64),
    Bool(bool),
    Text(String),
    Date(Date),
    Timestamp(Timestamp),
}

/// Accumulated filter conditions and their bind values.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, condition: String, value: BindValue) {
        self.conditions.push(condition);
        self.binds.push(value);
    }

    /// Placeholder number the next pushed value will take.
    fn placeholder(&self) -> usize {
        self.binds.len() + 1
    }

    /// `column = $n` on an id column.
    pub fn eq_id(&mut self, column: &str, value: Option<DbId>) -> &mut Self {
        if let Some(v) = value {
            let idx = self.placeholder();
            self.push(format!("{column} = ${idx}"), BindValue::BigInt(v));
        }
        self
    }

    pub fn eq_bool(&mut self, column: &str, value: Option<bool>) -> &mut Self {
        if let Some(v) = value {
            let idx = self.placeholder();
            self.push(format!("{column} = ${idx}"), BindValue::Bool(v));
        }
        self
    }

    /// `column = $n` on a text column. Blank values are ignored.
    pub fn eq_text(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            let idx = self.placeholder();
            self.push(format!("{column} = ${idx}"), BindValue::Text(v.to_string()));
        }
        self
    }

    /// Inclusive lower bound on a DATE column.
    pub fn date_from(&mut self, column: &str, value: Option<Date>) -> &mut Self {
        if let Some(v) = value {
            let idx = self.placeholder();
            self.push(format!("{column} >= ${idx}"), BindValue::Date(v));
        }
        self
    }

    /// Inclusive upper bound on a DATE column.
    pub fn date_to(&mut self, column: &str, value: Option<Date>) -> &mut Self {
        if let Some(v) = value {
            let idx = self.placeholder();
            self.push(format!("{column} <= ${idx}"), BindValue::Date(v));
        }
        self
    }

    /// Inclusive lower bound on a TIMESTAMPTZ column.
    pub fn since(&mut self, column: &str, value: Option<Timestamp>) -> &mut Self {
        if let Some(v) = value {
            let idx = self.placeholder();
            self.push(format!("{column} >= ${idx}"), BindValue::Timestamp(v));
        }
        self
    }

    /// Inclusive upper bound on a TIMESTAMPTZ column.
    pub fn until(&mut self, column: &str, value: Option<Timestamp>) -> &mut Self {
        if let Some(v) = value {
            let idx = self.placeholder();
            self.push(format!("{column} <= ${idx}"), BindValue::Timestamp(v));
        }
        self
    }

    /// Case-insensitive substring match across several text columns.
    pub fn search(&mut self, columns: &[&str], term: Option<&str>) -> &mut Self {
        if let Some(t) = term.map(str::trim).filter(|t| !t.is_empty()) {
            let idx = self.placeholder();
            let ors: Vec<String> = columns
                .iter()
                .map(|c| format!("{c} ILIKE ${idx}"))
                .collect();
            self.push(
                format!("({})", ors.join(" OR ")),
                BindValue::Text(format!("%{t}%")),
            );
        }
        self
    }

    /// `WHERE a AND b ...`, or an empty string when no filter is active.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Index of the first placeholder after the filter values, for
    /// `LIMIT`/`OFFSET`.
    pub fn next_index(&self) -> usize {
        self.placeholder()
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// Bind the filter values onto a `QueryAs`.
    pub fn bind_as<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for val in &self.binds {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Date(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }

    /// Bind the filter values onto a `QueryScalar`.
    pub fn bind_scalar<'q, T>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, T, PgArguments>,
    ) -> QueryScalar<'q, Postgres, T, PgArguments> {
        for val in &self.binds {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Date(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let f = Filter::new();
        assert_eq!(f.where_clause(), "");
        assert_eq!(f.next_index(), 1);
    }

    #[test]
    fn placeholders_are_numbered_in_order() {
        let mut f = Filter::new();
        f.eq_id("employee_id", Some(4))
            .eq_text("status", Some("present"))
            .date_from("date", Date::from_ymd_opt(2024, 1, 1))
            .date_to("date", None);
        assert_eq!(
            f.where_clause(),
            "WHERE employee_id = $1 AND status = $2 AND date >= $3"
        );
        assert_eq!(f.next_index(), 4);
        assert_eq!(f.binds()[1], BindValue::Text("present".into()));
    }

    #[test]
    fn blank_text_filters_are_ignored() {
        let mut f = Filter::new();
        f.eq_text("status", Some("  ")).search(&["first_name"], Some(""));
        assert_eq!(f.where_clause(), "");
    }

    #[test]
    fn search_shares_one_placeholder() {
        let mut f = Filter::new();
        f.search(&["first_name", "last_name"], Some("ann"));
        assert_eq!(
            f.where_clause(),
            "WHERE (first_name ILIKE $1 OR last_name ILIKE $1)"
        );
        assert_eq!(f.binds(), &[BindValue::Text("%ann%".into())]);
    }
}
