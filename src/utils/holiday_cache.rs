use crate::model::holiday::Holiday;
use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate, Utc};
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Holiday dates keyed by calendar year. The calendar is owned by the
/// external admin-config service; a short TTL keeps edits visible without a
/// read per request.
static HOLIDAY_CACHE: Lazy<Cache<i32, Arc<HashSet<NaiveDate>>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(32)
        .time_to_live(Duration::from_secs(3600))
        .build()
});

async fn load_year(pool: &MySqlPool, year: i32) -> Result<HashSet<NaiveDate>, sqlx::Error> {
    let rows = sqlx::query_as::<_, Holiday>(
        r#"
        SELECT id, name, holiday_date
        FROM holidays
        WHERE holiday_date >= ? AND holiday_date <= ?
        "#,
    )
    .bind(NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN))
    .bind(NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|h| h.holiday_date).collect())
}

/// Holidays for a single year, loaded through the cache.
pub async fn holidays_for_year(pool: &MySqlPool, year: i32) -> Result<Arc<HashSet<NaiveDate>>> {
    HOLIDAY_CACHE
        .try_get_with(year, async { load_year(pool, year).await.map(Arc::new) })
        .await
        .map_err(|e| anyhow!("holiday calendar load failed for {}: {}", year, e))
}

/// Union of holidays across the years a date range touches.
pub async fn holidays_for_range(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashSet<NaiveDate>> {
    let mut all = HashSet::new();
    for year in start.year()..=end.year() {
        all.extend(holidays_for_year(pool, year).await?.iter().copied());
    }
    Ok(all)
}

/// Drop a cached year after an external calendar edit.
pub async fn invalidate_year(year: i32) {
    HOLIDAY_CACHE.invalidate(&year).await;
}

/// Preload the current year plus `years_ahead` at startup.
pub async fn warmup_holiday_cache(pool: &MySqlPool, years_ahead: i32) -> Result<()> {
    let current = Utc::now().date_naive().year();
    let mut total = 0usize;

    for year in current..=current + years_ahead {
        total += holidays_for_year(pool, year).await?.len();
    }

    log::info!(
        "Holiday cache warmup complete: {} holidays across {} year(s)",
        total,
        years_ahead + 1
    );

    Ok(())
}
