//! Row filters applied before sorting and grouping

use crate::report::options::FilterMode;
use crate::report::parse::is_shipped;
use crate::report::types::Record;
use chrono::NaiveDate;
use tracing::info;

pub fn apply_filter(records: Vec<Record>, mode: FilterMode, today: NaiveDate) -> Vec<Record> {
    match mode {
        FilterMode::All => records,
        FilterMode::NotShipped => {
            let before = records.len();
            let kept: Vec<Record> = records
                .into_iter()
                .filter(|r| !is_shipped(&r.ship_status, today))
                .collect();

            info!("Filter notShipped kept {} of {} records", kept.len(), before);
            kept
        }
    }
}
