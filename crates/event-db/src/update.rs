//! Parameterized partial updates over a closed set of columns.
//!
//! Column names come only from [`Column::name`], which implementors back
//! with a fixed enum. Every value is bound as a statement parameter.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rusqlite::types::Value;

use crate::{DbError, timestamp};

/// A column that partial updates are allowed to assign.
pub trait Column: Copy + PartialEq {
    /// Table the column belongs to.
    const TABLE: &'static str;

    fn name(self) -> &'static str;
}

/// Accumulates `column = value` assignments for one row.
#[derive(Debug, Clone)]
pub struct UpdateBuilder<C: Column> {
    assignments: Vec<(C, Value)>,
}

impl<C: Column> Default for UpdateBuilder<C> {
    fn default() -> Self {
        Self {
            assignments: Vec::new(),
        }
    }
}

impl<C: Column> UpdateBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `column`, replacing an earlier assignment to it.
    pub fn set(&mut self, column: C, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.assignments.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.assignments.push((column, value)),
        }
        self
    }

    /// Render the statement. `updated_at` is always stamped and the row is
    /// selected by `id`.
    pub fn build(self, updated_at: &DateTime<Utc>, id: i64) -> (String, Vec<Value>) {
        let mut sets = Vec::with_capacity(self.assignments.len() + 1);
        let mut values = Vec::with_capacity(self.assignments.len() + 2);

        for (column, value) in self.assignments {
            values.push(value);
            sets.push(format!("{} = ?{}", column.name(), values.len()));
        }

        values.push(Value::Text(timestamp::to_db(updated_at)));
        sets.push(format!("updated_at = ?{}", values.len()));

        values.push(Value::Integer(id));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            C::TABLE,
            sets.join(", "),
            values.len()
        );
        (sql, values)
    }

    /// Execute against `conn`, returning the number of rows changed.
    pub fn execute(
        self,
        conn: &Connection,
        updated_at: &DateTime<Utc>,
        id: i64,
    ) -> Result<usize, DbError> {
        let (sql, values) = self.build(updated_at, id);
        let changed = conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(changed)
    }
}
