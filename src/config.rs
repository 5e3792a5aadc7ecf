use std::env;

#[derive(Debug, Clone)]
pub struct StatusOption {
    pub label: String,
    pub points: i64,
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub members: Vec<String>,
    pub statuses: Vec<StatusOption>,
    pub window_days: u32,
}

const DEFAULT_MEMBERS: [&str; 3] = ["Shaheer", "MSN", "Ali"];
const DEFAULT_STATUSES: [(&str, i64); 3] = [
    ("Fajr with Jamaat (+5)", 5),
    ("Fajr prayed alone (+2)", 2),
    ("Fajr Qaza (-1)", -1),
];
const DEFAULT_WINDOW_DAYS: u32 = 30;

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            members: DEFAULT_MEMBERS.iter().map(|m| m.to_string()).collect(),
            statuses: DEFAULT_STATUSES
                .iter()
                .map(|(label, points)| StatusOption {
                    label: label.to_string(),
                    points: *points,
                })
                .collect(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("FAJR_MEMBERS") {
            let members: Vec<String> = raw
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
            if !members.is_empty() {
                config.members = members;
            }
        }

        if let Some(days) = env::var("FAJR_WINDOW_DAYS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|days| *days > 0)
        {
            config.window_days = days;
        }

        config
    }

    pub fn is_member(&self, name: &str) -> bool {
        self.members.iter().any(|member| member == name)
    }

    pub fn points_for(&self, status: &str) -> Option<i64> {
        self.statuses
            .iter()
            .find(|option| option.label == status)
            .map(|option| option.points)
    }
}
