use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS items (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      source_text TEXT NOT NULL,
      transliteration TEXT,
      target_text TEXT NOT NULL,
      mnemonic TEXT,
      location TEXT NOT NULL DEFAULT 'main_entrance',
      state TEXT NOT NULL DEFAULT 'new',
      repetitions INTEGER NOT NULL DEFAULT 0,
      -- Nullable: rows without a value are scheduled from the default 2.5
      difficulty REAL DEFAULT 2.5,
      last_reviewed TEXT
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_items_state ON items(state);
    CREATE INDEX IF NOT EXISTS idx_items_pair ON items(source_text, target_text);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  add_column_if_missing(conn, "items", "transliteration", "TEXT")?;
  add_column_if_missing(conn, "items", "mnemonic", "TEXT")?;
  add_column_if_missing(conn, "items", "last_reviewed", "TEXT")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
