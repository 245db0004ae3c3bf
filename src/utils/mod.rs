pub mod db_utils;
pub mod directory;
pub mod entitlement_cache;
pub mod holiday_cache;
