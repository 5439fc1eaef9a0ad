// crates/emodict-core/src/dimensions.rs

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{info, warn};

use crate::dataset::SpeechRecord;
use crate::db::DbPool;
use crate::error::Result;

/// Natural-key to surrogate-id lookup maps for the three dimensions. Built
/// once per run, read-only afterward.
#[derive(Debug, Default)]
pub struct DimensionMaps {
    pub parties: HashMap<String, i32>,
    pub dates: HashMap<NaiveDate, i32>,
    pub politicians: HashMap<(String, i32), i32>,
}

impl DimensionMaps {
    /// Resolve all three dimensions in dependency order. Any failure here is
    /// fatal for the run.
    pub async fn resolve(pool: &DbPool, records: &[SpeechRecord]) -> Result<Self> {
        let parties = resolve_parties(pool, records).await?;
        let dates = resolve_calendar(pool, records).await?;
        let politicians = resolve_politicians(pool, records, &parties).await?;
        Ok(Self {
            parties,
            dates,
            politicians,
        })
    }
}

/// Upsert the distinct party names and return name -> id.
pub async fn resolve_parties(
    pool: &DbPool,
    records: &[SpeechRecord],
) -> Result<HashMap<String, i32>> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for record in records {
        if let Some(name) = &record.party_name {
            if seen.insert(name.as_str()) {
                names.push(name.as_str());
            }
        }
    }

    let mut tx = pool.begin().await?;
    for name in &names {
        sqlx::query("INSERT INTO party (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    let rows: Vec<(i32, String)> = sqlx::query_as("SELECT id, name FROM party")
        .fetch_all(pool)
        .await?;
    let map: HashMap<String, i32> = rows.into_iter().map(|(id, name)| (name, id)).collect();

    info!(parties = names.len(), "party dimension resolved");
    Ok(map)
}

/// Upsert one row per calendar day over the inclusive [min, max] range of
/// the source dates, so the dimension has no gaps even for days without
/// speeches. Returns date -> id.
pub async fn resolve_calendar(
    pool: &DbPool,
    records: &[SpeechRecord],
) -> Result<HashMap<NaiveDate, i32>> {
    let (start, end) = date_range(records);

    let mut map = HashMap::new();
    let mut created = 0u64;
    let mut tx = pool.begin().await?;
    for day in calendar_days(start, end) {
        let inserted: Option<i32> = sqlx::query_scalar(
            "INSERT INTO date_dim (date, day, month, year) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (date) DO NOTHING RETURNING id",
        )
        .bind(day)
        .bind(day.day() as i32)
        .bind(day.month() as i32)
        .bind(day.year())
        .fetch_optional(&mut *tx)
        .await?;

        let id = match inserted {
            Some(id) => {
                created += 1;
                id
            }
            None => {
                sqlx::query_scalar("SELECT id FROM date_dim WHERE date = $1")
                    .bind(day)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };
        map.insert(day, id);
    }
    tx.commit().await?;

    info!(%start, %end, created, "date dimension resolved");
    Ok(map)
}

/// Upsert the distinct (speaker, party) pairs and return (name, party_id) ->
/// id. Pairs whose party is unknown are warned about and skipped rather than
/// inserted with a null party.
pub async fn resolve_politicians(
    pool: &DbPool,
    records: &[SpeechRecord],
    parties: &HashMap<String, i32>,
) -> Result<HashMap<(String, i32), i32>> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for record in records {
        if let (Some(name), Some(party)) = (&record.speaker_name, &record.party_name) {
            if seen.insert((name.as_str(), party.as_str())) {
                pairs.push((name.as_str(), party.as_str()));
            }
        }
    }

    let mut map = HashMap::new();
    let mut tx = pool.begin().await?;
    for (name, party_name) in pairs {
        let Some(&party_id) = parties.get(party_name) else {
            warn!(
                speaker = name,
                party = party_name,
                "skipping politician with unresolvable party"
            );
            continue;
        };

        let key = (name.to_string(), party_id);
        if map.contains_key(&key) {
            continue;
        }

        let inserted: Option<i32> = sqlx::query_scalar(
            "INSERT INTO politician (name, party) VALUES ($1, $2) \
             ON CONFLICT (name, party) DO NOTHING RETURNING id",
        )
        .bind(name)
        .bind(party_id)
        .fetch_optional(&mut *tx)
        .await?;

        let id = match inserted {
            Some(id) => id,
            None => {
                sqlx::query_scalar("SELECT id FROM politician WHERE name = $1 AND party = $2")
                    .bind(name)
                    .bind(party_id)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };
        map.insert(key, id);
    }
    tx.commit().await?;

    info!(politicians = map.len(), "politician dimension resolved");
    Ok(map)
}

/// Inclusive [min, max] over the parseable source dates, falling back to a
/// fixed range when nothing parsed.
pub fn date_range(records: &[SpeechRecord]) -> (NaiveDate, NaiveDate) {
    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for date in records.iter().filter_map(|record| record.date) {
        bounds = Some(match bounds {
            None => (date, date),
            Some((lo, hi)) => (lo.min(date), hi.max(date)),
        });
    }
    bounds.unwrap_or_else(fallback_range)
}

fn fallback_range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
    )
}

/// Every day from `start` through `end`, inclusive.
pub fn calendar_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        current += Duration::days(1);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_on(date: Option<&str>) -> SpeechRecord {
        SpeechRecord {
            speaker_name: Some("Alice".to_string()),
            party_name: Some("PartyA".to_string()),
            date: date.and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()),
            text: None,
            emotions: [Some(0.0); 5],
        }
    }

    #[test]
    fn calendar_days_are_inclusive_and_gap_free() {
        let start = NaiveDate::from_ymd_opt(2021, 2, 27).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 3, 2).unwrap();
        let days = calendar_days(start, end);

        assert_eq!(days.len(), 4);
        assert_eq!(days.first(), Some(&start));
        assert_eq!(days.last(), Some(&end));
        for pair in days.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn single_day_range_yields_one_entry() {
        let day = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(calendar_days(day, day), vec![day]);
    }

    #[test]
    fn date_range_spans_min_to_max() {
        let records = vec![
            record_on(Some("2021-03-05")),
            record_on(None),
            record_on(Some("2021-01-17")),
            record_on(Some("2021-02-02")),
        ];
        let (start, end) = date_range(&records);
        assert_eq!(start, NaiveDate::from_ymd_opt(2021, 1, 17).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2021, 3, 5).unwrap());
    }

    #[test]
    fn date_range_falls_back_when_no_dates_parse() {
        let records = vec![record_on(None)];
        let (start, end) = date_range(&records);
        assert_eq!(start, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
