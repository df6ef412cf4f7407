//! DTO for the internal statistics endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::Statistic;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsResponse {
    pub urls: i64,
    pub users: i64,
}

impl From<Statistic> for StatsResponse {
    fn from(stat: Statistic) -> Self {
        Self {
            urls: stat.urls,
            users: stat.users,
        }
    }
}
