// Teams activity joined against the employee roster.
//
// Teams exports identify people by user principal name, which for this
// organisation is the official email address. The roster maps that email to a
// function and company, so activity can be summed per business unit.
use crate::config::{KpiConfig, TeamsColumns};
use crate::dataset::{Dataset, FileKind, UploadedFile};
use crate::error::{KpiError, Result};
use crate::types::{ActivityCounters, AppActivityRow, GroupActivityRow, Row, UserActivityRow};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Roster dimension Teams activity can be summed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityGroup {
    Function,
    Company,
}

impl ActivityGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityGroup::Function => "function",
            ActivityGroup::Company => "company",
        }
    }
}

impl fmt::Display for ActivityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityGroup {
    type Err = KpiError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "function" => Ok(ActivityGroup::Function),
            "company" => Ok(ActivityGroup::Company),
            other => Err(KpiError::InvalidGroupBy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub function: String,
    pub company: String,
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Email -> roster entry.
#[derive(Debug, Default)]
pub struct EmployeeDirectory {
    by_email: HashMap<String, RosterEntry>,
}

impl EmployeeDirectory {
    /// Build from roster files given newest first. The first file to mention
    /// an email wins, so a newer roster overrides an older one.
    pub fn build<'a, I>(files: I, config: &KpiConfig) -> Self
    where
        I: IntoIterator<Item = &'a UploadedFile>,
    {
        let cols = &config.roster;
        let mut by_email = HashMap::new();
        for file in files {
            for row in &file.rows {
                let email = normalize_email(&row.text(&cols.email));
                if email.is_empty() {
                    continue;
                }
                by_email.entry(email).or_insert_with(|| RosterEntry {
                    function: row.text_or(&cols.function, "Unknown").into_owned(),
                    company: row.text_or(&cols.company, "Unknown").into_owned(),
                });
            }
        }
        debug!(employees = by_email.len(), "employee directory built");
        Self { by_email }
    }

    pub fn lookup(&self, email: &str) -> Option<&RosterEntry> {
        self.by_email.get(&normalize_email(email))
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

pub fn read_counters(row: &Row, cols: &TeamsColumns) -> ActivityCounters {
    ActivityCounters {
        team_chat: row.count(&cols.team_chat),
        private_chat: row.count(&cols.private_chat),
        calls: row.count(&cols.calls),
        meetings_organized: row.count(&cols.meetings_organized),
        meetings_attended: row.count(&cols.meetings_attended),
        one_time_organized: row.count(&cols.one_time_organized),
        one_time_attended: row.count(&cols.one_time_attended),
        recurring_organized: row.count(&cols.recurring_organized),
        recurring_attended: row.count(&cols.recurring_attended),
        post_messages: row.count(&cols.post_messages),
    }
}

/// Every row of one Teams export, matched to the roster or not.
pub fn user_activity(file: &UploadedFile, config: &KpiConfig) -> Vec<UserActivityRow> {
    let cols = &config.teams;
    let month_range = file.month_range();
    file.rows
        .iter()
        .map(|row| UserActivityRow {
            file_id: file.id,
            filename: file.filename.clone(),
            from_month: file.from_month.clone(),
            to_month: file.to_month.clone(),
            month_range: month_range.clone(),
            user: row.text_or(&cols.user, "Unknown").into_owned(),
            counters: read_counters(row, cols),
        })
        .collect()
}

/// Counters summed per roster function or company, sorted by group name.
/// Teams rows whose user is not on the roster are left out.
pub fn group_activity<'a, I>(
    teams_files: I,
    directory: &EmployeeDirectory,
    by: ActivityGroup,
    config: &KpiConfig,
) -> Vec<GroupActivityRow>
where
    I: IntoIterator<Item = &'a UploadedFile>,
{
    let cols = &config.teams;
    let mut totals: BTreeMap<String, ActivityCounters> = BTreeMap::new();
    let mut unmatched = 0usize;
    for file in teams_files {
        for row in &file.rows {
            let Some(entry) = directory.lookup(&row.text(&cols.user)) else {
                unmatched += 1;
                continue;
            };
            let group = match by {
                ActivityGroup::Function => &entry.function,
                ActivityGroup::Company => &entry.company,
            };
            totals
                .entry(group.clone())
                .or_default()
                .add(&read_counters(row, cols));
        }
    }
    debug!(%by, groups = totals.len(), unmatched, "teams activity grouped");
    totals
        .into_iter()
        .map(|(group, counters)| GroupActivityRow { group, counters })
        .collect()
}

/// Teams and users per app, most used first.
pub fn app_activity<'a, I>(files: I, config: &KpiConfig) -> Vec<AppActivityRow>
where
    I: IntoIterator<Item = &'a UploadedFile>,
{
    let cols = &config.apps;
    let mut totals: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for file in files {
        for row in &file.rows {
            let name = row.trimmed(&cols.app_name);
            if name.is_empty() {
                continue;
            }
            let t = totals.entry(name).or_insert((0, 0));
            t.0 = t.0.saturating_add(row.count(&cols.teams_using));
            t.1 = t.1.saturating_add(row.count(&cols.users_using));
        }
    }
    let mut out: Vec<AppActivityRow> = totals
        .into_iter()
        .map(|(app_name, (teams, users))| AppActivityRow {
            app_name,
            team_using_app: teams,
            users_using_app: users,
        })
        .collect();
    // Stable over the name-sorted map, so equal counts stay alphabetical.
    out.sort_by(|a, b| b.users_using_app.cmp(&a.users_using_app));
    out
}

/// User listing for the selected Teams file, or the newest one.
pub fn user_activity_listing(
    dataset: &Dataset,
    teams_file: Option<u64>,
    config: &KpiConfig,
) -> Result<Vec<UserActivityRow>> {
    let files = dataset.select(FileKind::Teams, teams_file)?;
    Ok(files
        .first()
        .map(|f| user_activity(f, config))
        .unwrap_or_default())
}

/// Join the selected Teams and roster files and sum by `by`. Empty when
/// either side has no files.
pub fn activity_by_group(
    dataset: &Dataset,
    by: ActivityGroup,
    teams_file: Option<u64>,
    roster_file: Option<u64>,
    config: &KpiConfig,
) -> Result<Vec<GroupActivityRow>> {
    let teams = dataset.select(FileKind::Teams, teams_file)?;
    let rosters = dataset.select(FileKind::Roster, roster_file)?;
    if teams.is_empty() || rosters.is_empty() {
        info!(%by, teams = teams.len(), rosters = rosters.len(), "nothing to join");
        return Ok(Vec::new());
    }
    let directory = EmployeeDirectory::build(rosters, config);
    Ok(group_activity(teams, &directory, by, config))
}

pub fn app_usage(
    dataset: &Dataset,
    app_file: Option<u64>,
    config: &KpiConfig,
) -> Result<Vec<AppActivityRow>> {
    let files = dataset.select(FileKind::TeamsApp, app_file)?;
    Ok(app_activity(files, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn roster(rows: &[(&str, &str, &str)], day: u32) -> UploadedFile {
        let rows = rows
            .iter()
            .map(|(email, function, company)| {
                Row::new()
                    .with("Email (Offical)", *email)
                    .with("Function", *function)
                    .with("Company", *company)
            })
            .collect();
        UploadedFile::new(FileKind::Roster, "roster.csv", vec![], rows)
            .uploaded_at(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap())
    }

    fn activity(user: &str, chats: &str, calls: &str) -> Row {
        Row::new()
            .with("User Principal Name", user)
            .with("Team Chat Message Count", chats)
            .with("Call Count", calls)
    }

    fn teams(rows: Vec<Row>) -> UploadedFile {
        UploadedFile::new(FileKind::Teams, "teams.csv", vec![], rows)
            .with_period(Some("Jan 2024"), Some("Mar 2024"))
    }

    #[test]
    fn newer_roster_wins_and_emails_are_normalised() {
        let mut ds = Dataset::new();
        ds.insert(roster(&[("a@x.com", "Sales", "CBL")], 1));
        ds.insert(roster(&[(" A@X.com ", "Finance", "CBL"), ("", "HR", "CBL")], 2));
        let dir = EmployeeDirectory::build(ds.files(FileKind::Roster), &KpiConfig::default());
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.lookup("a@x.COM").unwrap().function, "Finance");
    }

    #[test]
    fn unmatched_users_are_listed_but_not_aggregated() {
        let cfg = KpiConfig::default();
        let mut ds = Dataset::new();
        ds.insert(roster(&[("a@x.com", "Sales", "CBL"), ("b@x.com", "Sales", "CSEL")], 1));
        let t = ds.insert(teams(vec![
            activity("a@x.com", "10", "2"),
            activity("B@x.com", "5", "n/a"),
            activity("ghost@x.com", "100", "100"),
        ]));

        let by_function = activity_by_group(&ds, ActivityGroup::Function, None, None, &cfg).unwrap();
        assert_eq!(by_function.len(), 1);
        assert_eq!(by_function[0].group, "Sales");
        assert_eq!(by_function[0].counters.team_chat, 15);
        assert_eq!(by_function[0].counters.calls, 2);

        let by_company = activity_by_group(&ds, ActivityGroup::Company, None, None, &cfg).unwrap();
        let groups: Vec<&str> = by_company.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, ["CBL", "CSEL"]);

        let listing = user_activity_listing(&ds, Some(t), &cfg).unwrap();
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[2].user, "ghost@x.com");
        assert_eq!(listing[2].month_range, "Jan 2024 to Mar 2024");
        assert_eq!(listing[2].counters.team_chat, 100);
    }

    #[test]
    fn join_needs_both_sides() {
        let cfg = KpiConfig::default();
        let mut ds = Dataset::new();
        ds.insert(teams(vec![activity("a@x.com", "1", "1")]));
        assert!(activity_by_group(&ds, ActivityGroup::Function, None, None, &cfg)
            .unwrap()
            .is_empty());
        assert!(user_activity_listing(&Dataset::new(), None, &cfg).unwrap().is_empty());
    }

    #[test]
    fn missing_user_column_reads_unknown() {
        let file = teams(vec![Row::new().with("Call Count", "3")]);
        let rows = user_activity(&file, &KpiConfig::default());
        assert_eq!(rows[0].user, "Unknown");
        assert_eq!(rows[0].counters.calls, 3);
    }

    #[test]
    fn apps_sorted_by_users_descending() {
        let app = |name: &str, teams: &str, users: &str| {
            Row::new()
                .with("App Name", name)
                .with("Team Using App", teams)
                .with("Users Using App", users)
        };
        let file = UploadedFile::new(
            FileKind::TeamsApp,
            "apps.csv",
            vec![],
            vec![
                app("Planner", "2", "10"),
                app(" Forms ", "1", "40"),
                app("Planner", "1", "35"),
                app("", "9", "99"),
            ],
        );
        let out = app_activity([&file], &KpiConfig::default());
        assert_eq!(
            out,
            vec![
                AppActivityRow {
                    app_name: "Planner".into(),
                    team_using_app: 3,
                    users_using_app: 45,
                },
                AppActivityRow {
                    app_name: "Forms".into(),
                    team_using_app: 1,
                    users_using_app: 40,
                },
            ]
        );
    }

    #[test]
    fn huge_app_counts_saturate() {
        let app = |users: &str| {
            Row::new()
                .with("App Name", "Planner")
                .with("Users Using App", users)
        };
        let file = UploadedFile::new(
            FileKind::TeamsApp,
            "apps.csv",
            vec![],
            vec![app("18446744073709551615"), app("7")],
        );
        let out = app_activity([&file], &KpiConfig::default());
        assert_eq!(out[0].users_using_app, u64::MAX);
    }

    #[test]
    fn activity_group_parses() {
        assert_eq!("company".parse::<ActivityGroup>().unwrap(), ActivityGroup::Company);
        assert!("location".parse::<ActivityGroup>().is_err());
    }
}
