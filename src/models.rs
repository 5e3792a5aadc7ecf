use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub date: NaiveDate,
    pub member: String,
    pub status: String,
    pub points: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryTable {
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub member: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub member: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryResponse {
    pub date: NaiveDate,
    pub member: String,
    pub status: String,
    pub points: i64,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            date: entry.date,
            member: entry.member,
            status: entry.status,
            points: entry.points,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodayEntry {
    pub member: String,
    pub status: Option<String>,
    pub points: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub entries: Vec<TodayEntry>,
}

#[derive(Debug, Serialize)]
pub struct MemberScore {
    pub member: String,
    pub points: i64,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub window_days: u32,
    pub scores: Vec<MemberScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub series: BTreeMap<String, Vec<SeriesPoint>>,
}
