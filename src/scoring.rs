use crate::config::TrackerConfig;
use crate::models::{Entry, SeriesPoint};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

// The window anchors at the newest entry date, not today; both scoring and
// the series go through here so they can never disagree on it.
pub fn window_bounds(entries: &[Entry], window_days: u32) -> Option<(NaiveDate, NaiveDate)> {
    let latest = entries.iter().map(|entry| entry.date).max()?;
    let start = latest - Duration::days(i64::from(window_days) - 1);
    Some((start, latest))
}

pub fn compute_scores(entries: &[Entry], config: &TrackerConfig) -> BTreeMap<String, i64> {
    let mut scores: BTreeMap<String, i64> = config
        .members
        .iter()
        .map(|member| (member.clone(), 0))
        .collect();

    let Some((start, end)) = window_bounds(entries, config.window_days) else {
        return scores;
    };

    for entry in entries {
        if entry.date < start || entry.date > end {
            continue;
        }
        if let Some(total) = scores.get_mut(&entry.member) {
            *total += entry.points;
        }
    }

    scores
}

pub fn build_cumulative_series(
    entries: &[Entry],
    config: &TrackerConfig,
) -> BTreeMap<String, Vec<SeriesPoint>> {
    let mut series = BTreeMap::new();
    let Some((start, end)) = window_bounds(entries, config.window_days) else {
        return series;
    };

    let mut deltas: BTreeMap<(NaiveDate, &str), i64> = BTreeMap::new();
    for entry in entries {
        if entry.date < start || entry.date > end || !config.is_member(&entry.member) {
            continue;
        }
        *deltas.entry((entry.date, entry.member.as_str())).or_default() += entry.points;
    }

    let day_count = (end - start).num_days() + 1;
    for member in &config.members {
        let mut total = 0;
        let mut points = Vec::with_capacity(day_count as usize);
        for offset in 0..day_count {
            let date = start + Duration::days(offset);
            total += deltas
                .get(&(date, member.as_str()))
                .copied()
                .unwrap_or_default();
            points.push(SeriesPoint { date, total });
        }
        series.insert(member.clone(), points);
    }

    series
}
