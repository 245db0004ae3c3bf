use crate::model::entitlement::{EntitlementConfig, LeaveLimit, LimitUnit, parse_weekends};
use crate::model::leave_request::LeaveType;
use anyhow::{Result, anyhow};
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const CONFIG_KEY: u8 = 0;

/// Single-entry cache for the org-wide entitlement config (leave-type limits
/// plus weekend days). Owned by the external admin screens; refreshed on TTL.
static CONFIG_CACHE: Lazy<Cache<u8, Arc<EntitlementConfig>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(1)
        .time_to_live(Duration::from_secs(600))
        .build()
});

async fn load_config(pool: &MySqlPool) -> Result<EntitlementConfig> {
    let rows = sqlx::query_as::<_, (String, String, u32)>(
        r#"
        SELECT leave_type, limit_unit, limit_value
        FROM leave_policies
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut limits = HashMap::new();
    for (leave_type, unit, value) in rows {
        let leave_type = LeaveType::from_str(&leave_type)
            .map_err(|_| anyhow!("unknown leave type '{}' in leave_policies", leave_type))?;
        let unit = LimitUnit::from_str(&unit)
            .map_err(|_| anyhow!("unknown limit unit '{}' in leave_policies", unit))?;
        limits.insert(leave_type, LeaveLimit { unit, value });
    }

    let (weekend_json,): (String,) = sqlx::query_as(
        r#"
        SELECT weekend_days
        FROM calendar_settings
        LIMIT 1
        "#,
    )
    .fetch_one(pool)
    .await?;

    let names: Vec<String> = serde_json::from_str(&weekend_json)
        .map_err(|e| anyhow!("weekend_days is not a JSON array of day names: {}", e))?;
    let weekends = parse_weekends(&names).map_err(|e| anyhow!(e))?;

    Ok(EntitlementConfig { limits, weekends })
}

/// The current entitlement config, loaded through the cache.
pub async fn entitlement_config(pool: &MySqlPool) -> Result<Arc<EntitlementConfig>> {
    CONFIG_CACHE
        .try_get_with(CONFIG_KEY, async { load_config(pool).await.map(Arc::new) })
        .await
        .map_err(|e| anyhow!("entitlement config load failed: {}", e))
}

/// Drop the cached config after an external settings edit.
pub async fn invalidate() {
    CONFIG_CACHE.invalidate(&CONFIG_KEY).await;
}

/// Force a load at startup so the first request does not pay for it.
pub async fn warmup_entitlement_cache(pool: &MySqlPool) -> Result<()> {
    let config = entitlement_config(pool).await?;
    log::info!(
        "Entitlement cache warmup complete: {} leave type(s), {} weekend day(s)",
        config.limits.len(),
        config.weekends.len()
    );
    Ok(())
}
