// tests/jobs.rs
//
// Queue processing with the access list, against a canned website.

mod common;

use chrono::NaiveDate;
use common::{fast_options, tmp_dir, Canned};
use contact_scrape::config::options::AppOptions;
use contact_scrape::jobs::{queue_path, users_path, AccessList, Job, JobOutcome, JobQueue};
use contact_scrape::model::Source;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()
}

fn site() -> Canned {
    Canned::new().page("https://shop.example/", "<p>Orders: orders@shop.example</p>")
}

fn website_job(user: &str) -> Job {
    Job { user: user.into(), source: Source::Website, query: "https://shop.example/".into() }
}

fn options(name: &str) -> (AppOptions, std::path::PathBuf) {
    let root = tmp_dir(name);
    let mut opts = AppOptions::default();
    opts.scrape = fast_options(Source::Europages, root.join("store"));
    opts.export.set_dir(root.join("out"));
    (opts, root)
}

#[test]
fn approved_jobs_run_in_order_and_export_per_user() {
    let (opts, root) = options("jobs_ok");
    let mut access = AccessList::default();
    access.approve("alice", 7, today());

    let mut queue = JobQueue::default();
    queue.push(website_job("alice"));
    queue.push(website_job("mallory"));

    let fetch = site();
    let first = contact_scrape::jobs::run_next(&mut queue, &access, &fetch, &opts, today(), None).unwrap();
    match first {
        JobOutcome::Done { job, paths } => {
            assert_eq!(job.user, "alice");
            assert_eq!(paths, vec![root.join("out").join("alice").join("shopexample_website_companies.csv")]);
            let text = std::fs::read_to_string(&paths[0]).unwrap();
            assert!(text.contains("orders@shop.example"));
        }
        other => panic!("expected Done, got {other:?}"),
    }

    let second = contact_scrape::jobs::run_next(&mut queue, &access, &fetch, &opts, today(), None).unwrap();
    assert_eq!(second, JobOutcome::Refused(website_job("mallory")));

    let third = contact_scrape::jobs::run_next(&mut queue, &access, &fetch, &opts, today(), None).unwrap();
    assert_eq!(third, JobOutcome::Idle);
    assert_eq!(fetch.hit_count("https://shop.example/"), 1);
}

#[test]
fn expired_access_refuses_without_fetching() {
    let (opts, _root) = options("jobs_expired");
    let mut access = AccessList::default();
    access.approve("alice", 1, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());

    let mut queue = JobQueue::default();
    queue.push(website_job("alice"));

    let fetch = site();
    let out = contact_scrape::jobs::run_next(&mut queue, &access, &fetch, &opts, today(), None).unwrap();
    assert!(matches!(out, JobOutcome::Refused(_)));
    assert!(fetch.hits().is_empty());
    assert!(queue.is_empty());
}

#[test]
fn queue_and_access_list_persist_as_json() {
    let root = tmp_dir("jobs_persist");
    let mut access = AccessList::default();
    access.approve("bob", 30, today());
    access.save(&users_path(&root)).unwrap();

    let mut queue = JobQueue::default();
    queue.push(Job { user: "bob".into(), source: Source::ExportBureau, query: "olive oil".into() });
    queue.save(&queue_path(&root)).unwrap();

    let access2 = AccessList::load(&users_path(&root)).unwrap();
    assert!(access2.is_approved("bob", today()));
    let queue2 = JobQueue::load(&queue_path(&root)).unwrap();
    assert_eq!(queue2, queue);

    // Missing files load as empty.
    let empty = tmp_dir("jobs_missing");
    assert!(JobQueue::load(&queue_path(&empty)).unwrap().is_empty());
    assert!(AccessList::load(&users_path(&empty)).unwrap().users().is_empty());
}
