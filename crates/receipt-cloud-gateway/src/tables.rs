//! Table operations over the backend's REST dialect.
//!
//! Filters are plain query pairs in the backend's operator syntax, e.g.
//! `("serial_number", "eq.2026-N-0001")`, `("order", "created_at.desc")`,
//! `("limit", "5")`. Higher layers own the filter strings; this module
//! owns transport, auth headers and error mapping.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::GatewayError;
use crate::gateway::Gateway;

impl Gateway {
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Fetch rows from `table`, filtered and ordered by `query` pairs.
    ///
    /// An empty result set is a valid answer and yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or a backend error
    /// response.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, GatewayError> {
        self.select_columns(table, "*", query).await
    }

    /// Fetch rows from `table`, projecting only `columns`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or a backend error
    /// response.
    pub async fn select_columns<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, GatewayError> {
        tracing::debug!(table, columns, "select");
        let response = self
            .request(Method::GET, self.table_url(table))
            .query(&[("select", columns)])
            .query(query)
            .send()
            .await?;

        let response = self.check(response, table).await?;
        Ok(response.json().await?)
    }

    /// Fetch exactly one row; zero rows maps to [`GatewayError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when no row matches, or any other
    /// [`GatewayError`] on failure.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let mut rows: Vec<T> = self
            .select(
                table,
                &[query, &[("limit", "1".to_string())]].concat(),
            )
            .await?;

        match rows.pop() {
            Some(row) => Ok(row),
            None => Err(GatewayError::NotFound { what: table.into() }),
        }
    }

    /// Insert one row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Conflict`] when the row collides with an
    /// existing unique key, or any other [`GatewayError`] on failure.
    pub async fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<(), GatewayError> {
        tracing::debug!(table, "insert");
        let response = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        self.check(response, table).await?;
        Ok(())
    }

    /// Insert-or-update one row, keyed on the `on_conflict` column.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or a backend error
    /// response.
    pub async fn upsert<T: Serialize>(
        &self,
        table: &str,
        row: &T,
        on_conflict: &str,
    ) -> Result<(), GatewayError> {
        tracing::debug!(table, on_conflict, "upsert");
        let response = self
            .request(Method::POST, self.table_url(table))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;

        self.check(response, table).await?;
        Ok(())
    }

    /// Apply a partial update to every row matching `query`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on transport failure or a backend error
    /// response.
    pub async fn update<P: Serialize>(
        &self,
        table: &str,
        patch: &P,
        query: &[(&str, String)],
    ) -> Result<(), GatewayError> {
        tracing::debug!(table, "update");
        let response = self
            .request(Method::PATCH, self.table_url(table))
            .query(query)
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;

        self.check(response, table).await?;
        Ok(())
    }
}
