use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, params};

use crate::model::Document;
use crate::semantic::format_embedding_vector;

const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let connection = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open document database: {}", db_path.display()))?;

    connection
        .busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout on document database")?;

    Ok(connection)
}

fn pending_filter(force: bool) -> &'static str {
    if force { "" } else { "WHERE embedding IS NULL" }
}

pub fn count_pending(connection: &Connection, force: bool) -> Result<usize> {
    let sql = format!("SELECT COUNT(*) FROM documents {}", pending_filter(force));
    let count: i64 = connection
        .query_row(&sql, [], |row| row.get(0))
        .context("failed to count pending documents")?;

    Ok(count.max(0) as usize)
}

pub fn fetch_pending(connection: &Connection, force: bool) -> Result<Vec<Document>> {
    let sql = format!(
        "
        SELECT id, title, subtitle, content
        FROM documents
        {}
        ORDER BY id ASC
        ",
        pending_filter(force)
    );
    let mut statement = connection
        .prepare(&sql)
        .context("failed to prepare pending document query")?;

    let mut rows = statement.query([])?;
    let mut out = Vec::<Document>::new();

    while let Some(row) = rows.next()? {
        out.push(Document {
            id: row.get(0)?,
            title: row.get(1)?,
            subtitle: row.get(2)?,
            content: row.get(3)?,
        });
    }

    Ok(out)
}

/// Writes one embedding and commits it before returning, so rows finished
/// before a crash stay embedded.
pub fn store_embedding(
    connection: &mut Connection,
    document_id: i64,
    vector: &[f64],
) -> Result<()> {
    let literal = format_embedding_vector(vector);

    let tx = connection
        .transaction()
        .context("failed to begin embedding transaction")?;
    tx.execute(
        "UPDATE documents SET embedding = ?1 WHERE id = ?2",
        params![literal, document_id],
    )
    .with_context(|| format!("failed to store embedding for document {document_id}"))?;
    tx.commit()
        .with_context(|| format!("failed to commit embedding for document {document_id}"))?;

    Ok(())
}

#[cfg(test)]
pub(crate) type TestRow<'a> = (
    i64,
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a str>,
);

/// In-memory `documents` table seeded with `(id, title, subtitle, content, embedding)` rows.
#[cfg(test)]
pub(crate) fn test_connection(rows: &[TestRow<'_>]) -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory DB should open");
    connection
        .execute_batch(
            "
            CREATE TABLE documents (
              id INTEGER PRIMARY KEY,
              title TEXT,
              subtitle TEXT,
              content TEXT,
              embedding TEXT
            );
            ",
        )
        .expect("documents table should be created");

    for (id, title, subtitle, content, embedding) in rows {
        connection
            .execute(
                "INSERT INTO documents(id, title, subtitle, content, embedding) VALUES(?1, ?2, ?3, ?4, ?5)",
                params![id, title, subtitle, content, embedding],
            )
            .expect("document row should insert");
    }

    connection
}

#[cfg(test)]
pub(crate) fn embedding_of(connection: &Connection, document_id: i64) -> Option<String> {
    connection
        .query_row(
            "SELECT embedding FROM documents WHERE id = ?1",
            params![document_id],
            |row| row.get(0),
        )
        .expect("document row should exist")
}
