// crates/emodict-core/src/schema.rs

use tracing::info;

use crate::db::DbPool;
use crate::error::Result;

/// Five-table dimensional schema. Tables are dropped in reverse dependency
/// order and created leaf-first, with foreign keys added once every table
/// exists. Recreating the schema discards any previous load.
const SCHEMA_SQL: &str = r#"
DROP TABLE IF EXISTS speech CASCADE;
DROP TABLE IF EXISTS politician CASCADE;
DROP TABLE IF EXISTS nrc_encoding CASCADE;
DROP TABLE IF EXISTS date_dim CASCADE;
DROP TABLE IF EXISTS party CASCADE;

CREATE TABLE party (
  id          SERIAL PRIMARY KEY,
  name        TEXT NOT NULL UNIQUE
);

CREATE TABLE date_dim (
  id          SERIAL PRIMARY KEY,
  date        DATE NOT NULL UNIQUE,
  day         INTEGER NOT NULL,
  month       INTEGER NOT NULL,
  year        INTEGER NOT NULL
);

CREATE TABLE nrc_encoding (
  id          SERIAL PRIMARY KEY,
  anger       REAL NOT NULL,
  disgust     REAL NOT NULL,
  fear        REAL NOT NULL,
  joy         REAL NOT NULL,
  sadness     REAL NOT NULL
);

CREATE TABLE politician (
  id          SERIAL PRIMARY KEY,
  name        TEXT NOT NULL,
  party       INTEGER,
  UNIQUE(name, party)
);

CREATE TABLE speech (
  id            SERIAL PRIMARY KEY,
  speaker       INTEGER,
  speech_date   INTEGER,
  text          TEXT,
  nrc_encoding  INTEGER
);

ALTER TABLE politician
    ADD CONSTRAINT fk_politician_party
        FOREIGN KEY (party) REFERENCES party(id);

ALTER TABLE speech
    ADD CONSTRAINT fk_speech_speaker
        FOREIGN KEY (speaker) REFERENCES politician(id),
    ADD CONSTRAINT fk_speech_date
        FOREIGN KEY (speech_date) REFERENCES date_dim(id),
    ADD CONSTRAINT fk_speech_nrc
        FOREIGN KEY (nrc_encoding) REFERENCES nrc_encoding(id);
"#;

/// Drop and recreate the five tables with their foreign key constraints.
pub async fn create_tables(pool: &DbPool) -> Result<()> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    info!("database schema created");
    Ok(())
}
