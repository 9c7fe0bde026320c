// src/cli.rs
use std::{env, error::Error, iter::Peekable, path::{Path, PathBuf}};

use chrono::{Local, NaiveDate};

use crate::{
    config::{
        consts::{CLUSTERS, SETTINGS_FILE, STORE_DIR},
        options::{AppOptions, ExportFormat, ExportType},
        settings,
    },
    core::net::HttpClient,
    enrich::enrich_dataset,
    file::{default_stem, export_dataset},
    jobs::{self, AccessList, Job, JobOutcome, JobQueue},
    model::Source,
    progress::{ConsoleProgress, Progress},
    scrape,
};

const HELP: &str = include_str!("cli_help.txt");

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Scrape { opts: AppOptions, enrich: Option<usize> },
    Approve { user: String, days: u64 },
    Revoke { user: String },
    Users,
    Enqueue(Job),
    RunQueue,
    Help,
}

/// Flag values as typed; applied over defaults + settings file afterwards.
#[derive(Default)]
struct Flags {
    source: Option<Source>,
    query: Option<String>,
    url: Option<String>,
    pages: Option<u32>,
    depth: Option<u32>,
    workers: Option<usize>,
    retries: Option<u32>,
    follow_websites: bool,
    no_robots: bool,
    out: Option<String>,
    format: Option<ExportFormat>,
    split: bool,
    headers: Option<bool>,
    enrich: Option<usize>,
    config: Option<PathBuf>,
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cmd = parse_args(env::args().skip(1))?;
    execute(cmd)
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, Box<dyn Error>> {
    args.next().ok_or_else(|| format!("Missing value for {flag}").into())
}

fn number<T: std::str::FromStr, I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<T, Box<dyn Error>> {
    let v = value(args, flag)?;
    v.parse().map_err(|_| format!("Invalid number for {flag}: {v}").into())
}

fn parse_source(v: &str) -> Result<Source, Box<dyn Error>> {
    Source::parse(v).ok_or_else(|| format!("Unknown source: {v}").into())
}

/// Optional numeric value: consumed only when the next arg is a number.
fn optional_number<I: Iterator<Item = String>>(args: &mut Peekable<I>) -> Option<usize> {
    let n = args.peek()?.parse().ok()?;
    args.next();
    Some(n)
}

pub fn parse_args<I>(args: I) -> Result<Command, Box<dyn Error>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let mut f = Flags::default();

    while let Some(a) = args.next() {
        match a.as_str() {
            "--source" => f.source = Some(parse_source(&value(&mut args, "--source")?)?),
            "-q" | "--query" => f.query = Some(value(&mut args, "--query")?),
            "--url" => f.url = Some(value(&mut args, "--url")?),
            "-p" | "--pages" => f.pages = Some(number(&mut args, "--pages")?),
            "--depth" => f.depth = Some(number(&mut args, "--depth")?),
            "--workers" => f.workers = Some(number(&mut args, "--workers")?),
            "--retries" => f.retries = Some(number(&mut args, "--retries")?),
            "--follow-websites" => f.follow_websites = true,
            "--no-robots" => f.no_robots = true,
            "-o" | "--out" => f.out = Some(value(&mut args, "--out")?),
            "--format" => {
                let v = value(&mut args, "--format")?;
                f.format = Some(ExportFormat::parse(&v).ok_or_else(|| format!("Unknown format: {v}"))?);
            }
            "--split" => f.split = true,
            "--include-headers" => f.headers = Some(true),
            "--no-headers" => f.headers = Some(false),
            "--enrich" => f.enrich = Some(optional_number(&mut args).unwrap_or(CLUSTERS)),
            "--config" => f.config = Some(PathBuf::from(value(&mut args, "--config")?)),

            "--approve" => {
                let user = value(&mut args, "--approve")?;
                let days = number(&mut args, "--approve")?;
                return Ok(Command::Approve { user, days });
            }
            "--revoke" => return Ok(Command::Revoke { user: value(&mut args, "--revoke")? }),
            "--users" => return Ok(Command::Users),
            "--enqueue" => {
                let user = value(&mut args, "--enqueue")?;
                let source = parse_source(&value(&mut args, "--enqueue")?)?;
                let query = value(&mut args, "--enqueue")?;
                return Ok(Command::Enqueue(Job { user, source, query }));
            }
            "--run-queue" => return Ok(Command::RunQueue),
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(format!("Unknown arg: {a}").into()),
        }
    }

    let opts = build_options(&f)?;
    opts.scrape.validate()?;
    Ok(Command::Scrape { opts, enrich: f.enrich })
}

/// Defaults → settings file → flags.
fn build_options(f: &Flags) -> Result<AppOptions, Box<dyn Error>> {
    let mut opts = AppOptions::default();

    let cfg_path = f.config.clone().unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    if f.config.is_some() && !cfg_path.exists() {
        return Err(format!("Settings file not found: {}", cfg_path.display()).into());
    }
    settings::load(&cfg_path)?.apply(&mut opts);

    let sc = &mut opts.scrape;
    if let Some(s) = f.source { sc.source = s; }
    if let Some(q) = &f.query { sc.query = q.clone(); }
    if let Some(u) = &f.url {
        sc.start_url = u.clone();
        if f.source.is_none() { sc.source = Source::Website; }
    }
    if let Some(v) = f.pages { sc.max_pages = v; }
    if let Some(v) = f.depth { sc.depth = v; }
    if let Some(v) = f.workers { sc.workers = v.max(1); }
    if let Some(v) = f.retries { sc.retries = v; }
    if f.follow_websites { sc.follow_websites = true; }
    if f.no_robots { sc.respect_robots = false; }

    let ex = &mut opts.export;
    if let Some(fmt) = f.format { ex.format = fmt; }
    if f.split { ex.export_type = ExportType::SplitByEmail; }
    if let Some(h) = f.headers { ex.include_headers = h; }
    if let Some(o) = &f.out { ex.set_path(o); }
    if ex.is_default_stem() {
        let stem = default_stem(opts.scrape.source, &opts.scrape.query_key());
        ex.set_stem(&stem);
    }
    Ok(opts)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn store_dir() -> PathBuf {
    PathBuf::from(STORE_DIR)
}

pub fn execute(cmd: Command) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Help => {
            eprint!("{HELP}");
            Ok(())
        }
        Command::Scrape { opts, enrich } => run_scrape(&opts, enrich),
        Command::Approve { user, days } => {
            let path = jobs::users_path(&store_dir());
            let mut acl = AccessList::load(&path)?;
            let until = acl.approve(&user, days, today());
            acl.save(&path)?;
            println!("{user} approved until {until}");
            Ok(())
        }
        Command::Revoke { user } => {
            let path = jobs::users_path(&store_dir());
            let mut acl = AccessList::load(&path)?;
            if !acl.revoke(&user) {
                return Err(format!("{user} is not on the access list").into());
            }
            acl.save(&path)?;
            println!("{user} revoked");
            Ok(())
        }
        Command::Users => {
            let acl = AccessList::load(&jobs::users_path(&store_dir()))?;
            let today = today();
            for (user, until) in acl.users() {
                let state = if today <= until { "active" } else { "expired" };
                println!("{user}\t{until}\t{state}");
            }
            Ok(())
        }
        Command::Enqueue(job) => {
            let store = store_dir();
            let access = AccessList::load(&jobs::users_path(&store))?;
            let path = jobs::queue_path(&store);
            let mut queue = JobQueue::load(&path)?;
            let user = job.user.clone();
            let pos = jobs::enqueue(&mut queue, &access, job, today())?;
            queue.save(&path)?;
            println!("Queued for {user} at position {pos}");
            Ok(())
        }
        Command::RunQueue => run_queue(),
    }
}

fn run_scrape(opts: &AppOptions, enrich: Option<usize>) -> Result<(), Box<dyn Error>> {
    let client = HttpClient::new(&opts.scrape)?;
    let mut progress = ConsoleProgress::new();

    let ds = match enrich {
        Some(k) => {
            let companies = scrape::scrape_companies(&client, &opts.scrape, Some(&mut progress))?;
            enrich_dataset(&companies, k)
        }
        None => scrape::run(&client, &opts.scrape, Some(&mut progress))?,
    };
    progress.log(&format!("{} row(s)", ds.rows.len()));

    for p in export_dataset(&opts.export, &ds.headers, &ds.rows)? {
        println!("{}", p.display());
    }
    Ok(())
}

fn run_queue() -> Result<(), Box<dyn Error>> {
    let dir = store_dir();
    let (users_path, queue_path) = (jobs::users_path(&dir), jobs::queue_path(&dir));

    let mut opts = AppOptions::default();
    settings::load(Path::new(SETTINGS_FILE))?.apply(&mut opts);

    let mut acl = AccessList::load(&users_path)?;
    let purged = acl.purge_expired(today());
    if purged > 0 {
        acl.save(&users_path)?;
        logf!("Queue: purged {purged} expired user(s)");
    }

    let client = HttpClient::new(&opts.scrape)?;
    let mut progress = ConsoleProgress::new();
    let mut queue = JobQueue::load(&queue_path)?;

    loop {
        let outcome = jobs::run_next(&mut queue, &acl, &client, &opts, today(), Some(&mut progress));
        queue.save(&queue_path)?;
        match outcome? {
            JobOutcome::Idle => break,
            JobOutcome::Refused(job) => eprintln!("Skipped {} ({}): not approved", job.user, job.query),
            JobOutcome::Done { job, paths } => {
                eprintln!("Finished {} '{}' for {}", job.source.label(), job.query, job.user);
                for p in paths {
                    println!("{}", p.display());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s!(*s)).collect()
    }

    #[test]
    fn scrape_flags_build_options() {
        let cmd = parse_args(args(&[
            "--source", "exportbureau", "-q", "olive oil", "-p", "2", "--format", "tsv", "--split", "--enrich",
        ]))
        .unwrap();
        let Command::Scrape { opts, enrich } = cmd else { panic!("expected scrape") };
        assert_eq!(opts.scrape.source, Source::ExportBureau);
        assert_eq!(opts.scrape.max_pages, 2);
        assert_eq!(opts.export.format, ExportFormat::Tsv);
        assert_eq!(opts.export.export_type, ExportType::SplitByEmail);
        assert_eq!(opts.export.stem(), "olive_oil_exportbureau_companies");
        assert_eq!(enrich, Some(CLUSTERS));
    }

    #[test]
    fn enrich_takes_optional_k() {
        let cmd = parse_args(args(&["-q", "steel", "--enrich", "3", "--no-robots"])).unwrap();
        let Command::Scrape { opts, enrich } = cmd else { panic!("expected scrape") };
        assert_eq!(enrich, Some(3));
        assert!(!opts.scrape.respect_robots);
    }

    #[test]
    fn url_implies_website_source() {
        let cmd = parse_args(args(&["--url", "https://acme.test/", "--depth", "2"])).unwrap();
        let Command::Scrape { opts, .. } = cmd else { panic!("expected scrape") };
        assert_eq!(opts.scrape.source, Source::Website);
        assert_eq!(opts.scrape.depth, 2);
    }

    #[test]
    fn errors_on_missing_values_and_unknown_args() {
        assert!(parse_args(args(&["-q"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--pages", "x", "-q", "a"])).is_err());
        assert!(parse_args(args(&[])).is_err()); // no query
    }

    #[test]
    fn queue_commands() {
        assert_eq!(
            parse_args(args(&["--approve", "alice", "30"])).unwrap(),
            Command::Approve { user: s!("alice"), days: 30 }
        );
        assert_eq!(
            parse_args(args(&["--enqueue", "bob", "europages", "mining"])).unwrap(),
            Command::Enqueue(Job { user: s!("bob"), source: Source::Europages, query: s!("mining") })
        );
        assert_eq!(parse_args(args(&["--run-queue"])).unwrap(), Command::RunQueue);
    }
}
