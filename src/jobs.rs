// src/jobs.rs
//
// Approval list + FIFO job queue. Both are small JSON files under the store.
// A job only runs when its user is approved on the day it is taken off the queue.

use std::{
    collections::{BTreeMap, VecDeque},
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use chrono::{Days, NaiveDate};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::{
        consts::{QUEUE_FILE, USERS_FILE},
        options::AppOptions,
    },
    core::{net::Fetch, sanitize::sanitize_filename},
    file::{default_stem, export_dataset},
    model::Source,
    progress::Progress,
    scrape,
};

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, Box<dyn Error>> {
    if !path.exists() {
        return Ok(T::default());
    }
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| format!("Corrupt {}: {e}", path.display()).into())
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

pub fn users_path(store_dir: &Path) -> PathBuf {
    store_dir.join(USERS_FILE)
}

pub fn queue_path(store_dir: &Path) -> PathBuf {
    store_dir.join(QUEUE_FILE)
}

/* ---------------- Access ---------------- */

/// `user → last day of access` (inclusive).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessList {
    users: BTreeMap<String, NaiveDate>,
}

impl AccessList {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        save_json(path, self)
    }

    /// Grant `days` of access starting `today`; re-approving replaces the expiry.
    pub fn approve(&mut self, user: &str, days: u64, today: NaiveDate) -> NaiveDate {
        let expiry = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
        self.users.insert(s!(user.trim()), expiry);
        logf!("Access: approved {user} until {expiry}");
        expiry
    }

    pub fn revoke(&mut self, user: &str) -> bool {
        let removed = self.users.remove(user.trim()).is_some();
        if removed {
            logf!("Access: revoked {user}");
        }
        removed
    }

    pub fn is_approved(&self, user: &str, today: NaiveDate) -> bool {
        self.users.get(user.trim()).is_some_and(|expiry| today <= *expiry)
    }

    /// Drop users whose access ended before `today`.
    pub fn purge_expired(&mut self, today: NaiveDate) -> usize {
        let before = self.users.len();
        self.users.retain(|_, expiry| today <= *expiry);
        before - self.users.len()
    }

    /// Sorted by user name.
    pub fn users(&self) -> Vec<(String, NaiveDate)> {
        self.users.iter().map(|(u, d)| (u.clone(), *d)).collect()
    }
}

/* ---------------- Queue ---------------- */

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub user: String,
    pub source: Source,
    /// Search term, or the start URL for `Source::Website`.
    pub query: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobQueue {
    jobs: VecDeque<Job>,
}

impl JobQueue {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        save_json(path, self)
    }

    /// Append and return the 1-based position.
    pub fn push(&mut self, job: Job) -> usize {
        self.jobs.push_back(job);
        self.jobs.len()
    }

    pub fn pop_front(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    /// 1-based position of the user's first queued job.
    pub fn position_of(&self, user: &str) -> Option<usize> {
        self.jobs.iter().position(|j| j.user == user).map(|i| i + 1)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }
}

/// Queue a job for an approved user. Returns the 1-based position.
pub fn enqueue(
    queue: &mut JobQueue,
    access: &AccessList,
    job: Job,
    today: NaiveDate,
) -> Result<usize, Box<dyn Error>> {
    if !access.is_approved(&job.user, today) {
        logw!("Queue: {} is not approved on {today}, job not queued", job.user);
        return Err(format!("User '{}' is not approved; ask an admin to --approve them", job.user).into());
    }
    let pos = queue.push(job);
    logf!("Queue: job queued at position {pos}");
    Ok(pos)
}

#[derive(Debug, PartialEq, Eq)]
pub enum JobOutcome {
    Idle,
    Refused(Job),
    Done { job: Job, paths: Vec<PathBuf> },
}

/// Take the next job, check access, scrape, export to `<out>/<user>/`.
/// The job is consumed either way; the caller persists the queue.
pub fn run_next(
    queue: &mut JobQueue,
    access: &AccessList,
    fetch: &dyn Fetch,
    opts: &AppOptions,
    today: NaiveDate,
    progress: Option<&mut dyn Progress>,
) -> Result<JobOutcome, Box<dyn Error>> {
    let Some(job) = queue.pop_front() else {
        return Ok(JobOutcome::Idle);
    };
    if !access.is_approved(&job.user, today) {
        logw!("Queue: refusing job for {} (not approved on {today})", job.user);
        return Ok(JobOutcome::Refused(job));
    }

    let mut sc = opts.scrape.clone();
    sc.source = job.source;
    if job.source == Source::Website {
        sc.start_url = job.query.clone();
    } else {
        sc.query = job.query.clone();
    }
    logf!("Queue: running {} '{}' for {}", sc.source.label(), job.query, job.user);
    let ds = scrape::run(fetch, &sc, progress)?;

    let mut export = opts.export.clone();
    export.set_dir(export.dir().join(sanitize_filename(&job.user)));
    export.set_stem(&default_stem(job.source, &sc.query_key()));
    let paths = export_dataset(&export, &ds.headers, &ds.rows)?;

    Ok(JobOutcome::Done { job, paths })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn approval_is_inclusive_of_last_day() {
        let mut acl = AccessList::default();
        let exp = acl.approve("alice", 30, day(2026, 1, 1));
        assert_eq!(exp, day(2026, 1, 31));
        assert!(acl.is_approved("alice", day(2026, 1, 31)));
        assert!(!acl.is_approved("alice", day(2026, 2, 1)));
        assert!(!acl.is_approved("bob", day(2026, 1, 1)));
    }

    #[test]
    fn enqueue_refuses_unapproved_users() {
        let mut acl = AccessList::default();
        acl.approve("alice", 2, day(2026, 3, 1));
        let job = |user: &str| Job { user: s!(user), source: Source::Europages, query: s!("steel") };

        let mut q = JobQueue::default();
        assert_eq!(enqueue(&mut q, &acl, job("alice"), day(2026, 3, 2)).unwrap(), 1);
        assert!(enqueue(&mut q, &acl, job("mallory"), day(2026, 3, 2)).is_err());
        assert!(enqueue(&mut q, &acl, job("alice"), day(2026, 3, 4)).is_err());
        assert_eq!(q.len(), 1);
        assert_eq!(q.position_of("mallory"), None);
    }

    #[test]
    fn purge_and_revoke() {
        let mut acl = AccessList::default();
        acl.approve("a", 1, day(2026, 1, 1));
        acl.approve("b", 10, day(2026, 1, 1));
        assert_eq!(acl.purge_expired(day(2026, 1, 5)), 1);
        assert_eq!(acl.users(), vec![(s!("b"), day(2026, 1, 11))]);
        assert!(acl.revoke("b"));
        assert!(!acl.revoke("b"));
    }

    #[test]
    fn queue_is_fifo_with_positions() {
        let mut q = JobQueue::default();
        let job = |u: &str| Job { user: s!(u), source: Source::Europages, query: s!("steel") };
        assert_eq!(q.push(job("a")), 1);
        assert_eq!(q.push(job("b")), 2);
        assert_eq!(q.position_of("b"), Some(2));
        assert_eq!(q.pop_front().map(|j| j.user), Some(s!("a")));
        assert_eq!(q.position_of("b"), Some(1));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn access_list_serializes_as_plain_map() {
        let mut acl = AccessList::default();
        acl.approve("alice", 0, day(2026, 3, 4));
        let json = serde_json::to_string(&acl).unwrap();
        assert_eq!(json, r#"{"alice":"2026-03-04"}"#);
    }
}
