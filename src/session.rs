//! Trading-session classification by UTC hour
//!
//! Fixed boundaries, no daylight-saving adjustment: [12,20) NY, [7,12)
//! LDN, everything else ASIA.

use chrono::{Timelike, Utc};

use crate::types::Session;

/// Classify a UTC hour into its trading session
pub fn classify_session(hour: u32) -> Session {
    match hour {
        12..=19 => Session::NewYork,
        7..=11 => Session::London,
        _ => Session::Asia,
    }
}

/// Session for the current wall-clock UTC hour
pub fn current_session() -> Session {
    classify_session(Utc::now().hour())
}
