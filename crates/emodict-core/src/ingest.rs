// crates/emodict-core/src/ingest.rs

use tracing::{info, warn};

use crate::dataset::SpeechRecord;
use crate::db::DbPool;
use crate::dimensions::DimensionMaps;
use crate::encoding::{encode, Normalization};
use crate::error::Result;

const PROGRESS_INTERVAL: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub inserted: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowIds {
    speaker: i32,
    date: i32,
}

/// Resolve the dimension ids a speech row needs. Any missing field or failed
/// lookup disqualifies the row.
fn resolve_row(record: &SpeechRecord, maps: &DimensionMaps) -> Option<RowIds> {
    let speaker_name = record.speaker_name.as_deref()?;
    let party_name = record.party_name.as_deref()?;
    let date = record.date?;

    let party_id = *maps.parties.get(party_name)?;
    let date_id = *maps.dates.get(&date)?;
    let speaker_id = *maps
        .politicians
        .get(&(speaker_name.to_string(), party_id))?;

    Some(RowIds {
        speaker: speaker_id,
        date: date_id,
    })
}

/// Insert one encoding row and one speech row per valid source record.
/// Invalid rows and per-row database failures are counted as skips and never
/// abort the batch; each row runs in its own statement scope so a failed row
/// cannot poison the ones after it.
pub async fn load_speeches(
    pool: &DbPool,
    records: &[SpeechRecord],
    maps: &DimensionMaps,
    mode: Normalization,
) -> Result<IngestSummary> {
    let mut inserted = 0u64;
    let mut skipped = 0u64;

    for (idx, record) in records.iter().enumerate() {
        let Some(ids) = resolve_row(record, maps) else {
            skipped += 1;
            continue;
        };

        let vector = encode(&record.emotions, mode);
        match insert_speech(pool, record, ids, &vector).await {
            Ok(()) => {
                inserted += 1;
                if inserted % PROGRESS_INTERVAL == 0 {
                    info!(inserted, "speech insertion progress");
                }
            }
            Err(err) => {
                skipped += 1;
                warn!(
                    row = idx,
                    speaker = record.speaker_name.as_deref().unwrap_or_default(),
                    error = %err,
                    "speech row skipped"
                );
            }
        }
    }

    info!(inserted, skipped, "speech load finished");
    Ok(IngestSummary { inserted, skipped })
}

async fn insert_speech(
    pool: &DbPool,
    record: &SpeechRecord,
    ids: RowIds,
    vector: &[f64; 5],
) -> Result<()> {
    let encoding_id: i32 = sqlx::query_scalar(
        "INSERT INTO nrc_encoding (anger, disgust, fear, joy, sadness) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(vector[0] as f32)
    .bind(vector[1] as f32)
    .bind(vector[2] as f32)
    .bind(vector[3] as f32)
    .bind(vector[4] as f32)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        "INSERT INTO speech (speaker, speech_date, text, nrc_encoding) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(ids.speaker)
    .bind(ids.date)
    .bind(record.text.as_deref())
    .bind(encoding_id)
    .execute(pool)
    .await?;

    Ok(())
}
