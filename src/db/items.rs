//! Item CRUD and query operations

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, Result};

use crate::config;
use crate::content;
use crate::domain::{LearningState, NewItem, PalaceRoom, VocabItem};
use crate::error::Error;

use super::store::{ItemPatch, ItemStore, StateFilter};

const ITEM_COLUMNS: &str = "id, source_text, transliteration, target_text, mnemonic, location, state, \
                            repetitions, difficulty, last_reviewed";

/// Insert a validated record. Fills a missing mnemonic; trims required text.
pub fn insert_item(conn: &Connection, item: &NewItem, location: PalaceRoom) -> Result<i64> {
  let source_text = item.source_text.trim();
  let target_text = item.target_text.trim();
  let mnemonic = content::mnemonic_or_auto(item.mnemonic.as_deref(), source_text, target_text);
  let transliteration = item
    .transliteration
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty());

  conn.execute(
    r#"
    INSERT INTO items (source_text, transliteration, target_text, mnemonic, location, state,
                       repetitions, difficulty)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)
    "#,
    params![
      source_text,
      transliteration,
      target_text,
      mnemonic,
      location.as_str(),
      LearningState::New.as_str(),
      config::DEFAULT_DIFFICULTY,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_item_by_id(conn: &Connection, id: i64) -> Result<Option<VocabItem>> {
  let mut stmt = conn.prepare(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"))?;

  let mut rows = stmt.query(params![id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_item(row)?))
  } else {
    Ok(None)
  }
}

fn filter_clause(filter: StateFilter) -> (&'static str, Option<&'static str>) {
  match filter {
    StateFilter::All => ("", None),
    StateFilter::Is(state) => ("WHERE state = ?1", Some(state.as_str())),
    StateFilter::NotMastered => ("WHERE state != ?1", Some(LearningState::Mastered.as_str())),
  }
}

/// Items matching the filter in ascending id (creation) order
pub fn query_items(conn: &Connection, filter: StateFilter) -> Result<Vec<VocabItem>> {
  let (clause, arg) = filter_clause(filter);
  let mut stmt = conn.prepare(&format!(
    "SELECT {ITEM_COLUMNS} FROM items {clause} ORDER BY id ASC"
  ))?;

  let items = stmt
    .query_map(params_from_iter(arg.iter()), |row| row_to_item(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(items)
}

pub fn count_items(conn: &Connection, filter: StateFilter) -> Result<i64> {
  let (clause, arg) = filter_clause(filter);
  conn.query_row(
    &format!("SELECT COUNT(*) FROM items {clause}"),
    params_from_iter(arg.iter()),
    |row| row.get(0),
  )
}

/// Write the set fields of `patch` in a single UPDATE. Returns rows matched.
pub fn update_item(conn: &Connection, id: i64, patch: &ItemPatch) -> Result<usize> {
  let mut columns: Vec<&str> = Vec::new();
  let mut values: Vec<Box<dyn ToSql>> = Vec::new();

  if let Some(v) = &patch.source_text {
    columns.push("source_text");
    values.push(Box::new(v.clone()));
  }
  if let Some(v) = &patch.transliteration {
    columns.push("transliteration");
    values.push(Box::new(v.clone()));
  }
  if let Some(v) = &patch.target_text {
    columns.push("target_text");
    values.push(Box::new(v.clone()));
  }
  if let Some(v) = &patch.mnemonic {
    columns.push("mnemonic");
    values.push(Box::new(v.clone()));
  }
  if let Some(v) = patch.location {
    columns.push("location");
    values.push(Box::new(v.as_str()));
  }
  if let Some(v) = patch.state {
    columns.push("state");
    values.push(Box::new(v.as_str()));
  }
  if let Some(v) = patch.repetitions {
    columns.push("repetitions");
    values.push(Box::new(v));
  }
  if let Some(v) = patch.difficulty {
    columns.push("difficulty");
    values.push(Box::new(v));
  }
  if let Some(v) = patch.last_reviewed {
    columns.push("last_reviewed");
    values.push(Box::new(v.to_rfc3339()));
  }

  if columns.is_empty() {
    // Nothing to write, but callers still need to know whether the row exists
    let exists: bool = conn.query_row(
      "SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1)",
      params![id],
      |row| row.get(0),
    )?;
    return Ok(usize::from(exists));
  }

  let assignments = columns
    .iter()
    .enumerate()
    .map(|(i, column)| format!("{} = ?{}", column, i + 1))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!("UPDATE items SET {} WHERE id = ?{}", assignments, columns.len() + 1);
  values.push(Box::new(id));

  conn.execute(&sql, params_from_iter(values.iter()))
}

/// True if an item with exactly this (source, target) pair exists
pub fn pair_exists(conn: &Connection, source_text: &str, target_text: &str) -> Result<bool> {
  conn.query_row(
    "SELECT EXISTS(SELECT 1 FROM items WHERE source_text = ?1 AND target_text = ?2)",
    params![source_text.trim(), target_text.trim()],
    |row| row.get(0),
  )
}

/// Parse a stored timestamp. Older databases kept plain dates.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|dt| dt.and_utc())
}

fn row_to_item(row: &rusqlite::Row) -> Result<VocabItem> {
  let location_str: String = row.get(5)?;
  let state_str: String = row.get(6)?;
  let difficulty: Option<f64> = row.get(8)?;
  let last_reviewed: Option<String> = row.get(9)?;

  Ok(VocabItem {
    id: row.get(0)?,
    source_text: row.get(1)?,
    transliteration: row.get(2)?,
    target_text: row.get(3)?,
    mnemonic: row.get(4)?,
    location: PalaceRoom::from_str(&location_str).unwrap_or(PalaceRoom::MainEntrance),
    state: LearningState::from_str(&state_str).unwrap_or_default(),
    repetitions: row.get::<_, i64>(7)?.max(0),
    difficulty: difficulty.unwrap_or(config::DEFAULT_DIFFICULTY),
    last_reviewed: last_reviewed.as_deref().and_then(parse_timestamp),
  })
}

impl ItemStore for Connection {
  fn create(&self, item: &NewItem, location: PalaceRoom) -> crate::Result<i64> {
    item.validate()?;
    let id = insert_item(self, item, location)?;
    tracing::debug!("Created item {} ({} -> {})", id, item.source_text, item.target_text);
    Ok(id)
  }

  fn get_by_id(&self, id: i64) -> crate::Result<VocabItem> {
    get_item_by_id(self, id)?.ok_or(Error::NotFound(id))
  }

  fn update(&self, id: i64, patch: &ItemPatch) -> crate::Result<()> {
    match update_item(self, id, patch)? {
      0 => Err(Error::NotFound(id)),
      _ => Ok(()),
    }
  }

  fn query_by_state(&self, filter: StateFilter) -> crate::Result<Vec<VocabItem>> {
    Ok(query_items(self, filter)?)
  }

  fn count(&self, filter: StateFilter) -> crate::Result<i64> {
    Ok(count_items(self, filter)?)
  }

  fn atomically<T, F>(&self, f: F) -> crate::Result<T>
  where
    F: FnOnce(&Self) -> crate::Result<T>,
  {
    // Dropping the transaction on error rolls it back
    let tx = self.unchecked_transaction()?;
    let value = f(&*tx)?;
    tx.commit()?;
    Ok(value)
  }
}

/// Create an item in a uniformly random room and return it as stored
pub fn add_item<S, R>(store: &S, item: &NewItem, rng: &mut R) -> crate::Result<VocabItem>
where
  S: ItemStore + ?Sized,
  R: Rng + ?Sized,
{
  let id = store.create(item, content::assign_room(rng))?;
  store.get_by_id(id)
}

// ==================== Import ====================

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
  /// Skip records whose (source, target) pair is already stored
  pub skip_duplicates: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
  pub inserted: usize,
  pub skipped_invalid: usize,
  pub skipped_duplicate: usize,
}

/// Bulk insert in one transaction. Malformed records are skipped, not fatal.
pub fn import_items<R: Rng + ?Sized>(
  conn: &Connection,
  records: &[NewItem],
  options: ImportOptions,
  rng: &mut R,
) -> crate::Result<ImportSummary> {
  let tx = conn.unchecked_transaction()?;
  let mut summary = ImportSummary::default();

  for record in records {
    if let Err(e) = record.validate() {
      tracing::debug!("Skipping import record: {}", e);
      summary.skipped_invalid += 1;
      continue;
    }
    if options.skip_duplicates && pair_exists(&tx, &record.source_text, &record.target_text)? {
      summary.skipped_duplicate += 1;
      continue;
    }
    insert_item(&tx, record, content::assign_room(rng))?;
    summary.inserted += 1;
  }

  tx.commit()?;
  tracing::info!(
    "Imported {} items ({} invalid, {} duplicates skipped)",
    summary.inserted,
    summary.skipped_invalid,
    summary.skipped_duplicate
  );
  Ok(summary)
}
