//! End-to-end scan tests.
//!
//! These tests verify that:
//! - Events flow through classification, resolution and context matching
//!   into the persisted queue
//! - Re-running a scan over the same events adds nothing
//! - A knowledge base failure aborts the scan and leaves the queue unchanged

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use duely_core::{
    CommitmentType, DeadlineType, Event, EventSource, FixedClock, KnowledgeBase, KnowledgeError,
    PersonPage, ProjectPage, SourceError, StaticKnowledgeBase,
};
use duely_detect::{CommitmentBuilder, ScanError, Scanner};
use duely_queue::{QueueStore, load_queue};

struct MemorySource(Vec<Event>);

#[async_trait]
impl EventSource for MemorySource {
    async fn fetch_recent_events(&self, _window: Duration) -> Result<Vec<Event>, SourceError> {
        Ok(self.0.clone())
    }
}

struct DownSource;

#[async_trait]
impl EventSource for DownSource {
    async fn fetch_recent_events(&self, _window: Duration) -> Result<Vec<Event>, SourceError> {
        Err(SourceError::Unavailable("capture service offline".to_string()))
    }
}

struct Offline;

impl KnowledgeBase for Offline {
    fn list_people_pages(&self) -> Result<Vec<PersonPage>, KnowledgeError> {
        Err(KnowledgeError::Unavailable("vault not mounted".to_string()))
    }

    fn list_projects(&self) -> Result<Vec<ProjectPage>, KnowledgeError> {
        Err(KnowledgeError::Unavailable("vault not mounted".to_string()))
    }
}

#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 4).expect("valid date")
}

#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 4, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

fn knowledge() -> StaticKnowledgeBase {
    StaticKnowledgeBase::new(
        vec![
            PersonPage::new("Sarah Chen", "05-Areas/People/Internal/Sarah_Chen.md", "internal"),
            PersonPage::new("Dave Park", "05-Areas/People/Internal/Dave_Park.md", "internal"),
        ],
        vec![ProjectPage::new(
            "Q1 Pricing Refresh",
            "04-Projects/Q1_Pricing_Refresh.md",
            ["pricing", "refresh"],
        )],
    )
}

fn events() -> Vec<Event> {
    vec![
        Event::new("Can you review this PR?", "Slack", at(9, 0)),
        Event::new("I'll send that over tomorrow", "Slack", at(9, 5)),
        Event::new("@dave need your sign-off on the budget", "Slack", at(9, 10)),
        Event::new("Thanks for the update!", "Slack", at(9, 15)),
        Event::new(
            "From: Sarah Chen\nSubject: pricing\n\nCould you send the pricing deck by Friday?",
            "Gmail",
            at(9, 20),
        ),
    ]
}

fn scanner<K: KnowledgeBase>(knowledge: K) -> Scanner<K, FixedClock> {
    Scanner::new(CommitmentBuilder::new(knowledge, FixedClock::on(today())))
}

#[tokio::test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
async fn scan_persists_detected_commitments() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("commitment_queue.json");
    let mut store = QueueStore::open(&path).expect("open");

    let report = scanner(knowledge())
        .run(&MemorySource(events()), Duration::minutes(60), &mut store)
        .await
        .expect("scan");
    drop(store);

    assert_eq!(report.events_seen, 5);
    assert_eq!(report.not_commitments, 1);
    assert_eq!(report.created.len(), 4);

    let queue = load_queue(&path);
    let c = &queue.commitments;
    assert_eq!(c.len(), 4);

    assert_eq!(c[0].id, "comm-20260204-001");
    assert_eq!(c[0].kind, CommitmentType::Inbound);
    assert_eq!(c[0].pattern, "direct_request");

    assert_eq!(c[1].kind, CommitmentType::Outbound);
    assert_eq!(c[1].pattern, "promise");
    let deadline = c[1].deadline.expect("deadline");
    assert_eq!(deadline.date, NaiveDate::from_ymd_opt(2026, 2, 5).expect("valid date"));
    assert_eq!(deadline.deadline_type, DeadlineType::Tomorrow);

    assert_eq!(c[2].kind, CommitmentType::Inbound);
    assert_eq!(c[2].person.as_deref(), Some("dave"));
    assert_eq!(c[2].person_page.as_deref(), Some("05-Areas/People/Internal/Dave_Park.md"));

    assert_eq!(c[3].person.as_deref(), Some("Sarah Chen"));
    assert_eq!(c[3].project.as_deref(), Some("04-Projects/Q1_Pricing_Refresh.md"));
    let friday = c[3].deadline.expect("deadline");
    assert_eq!(friday.deadline_type, DeadlineType::DayOfWeek);
    assert_eq!(friday.date.weekday(), Weekday::Fri);
    let ahead = (friday.date - today()).num_days();
    assert!((1..=7).contains(&ahead));

    assert_eq!(queue.stats.total_detected, 4);
    assert_eq!(queue.stats.inbound, 3);
    assert_eq!(queue.stats.outbound, 1);
    assert!(queue.last_scan.is_some());
}

#[tokio::test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
async fn rescanning_the_same_events_adds_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("commitment_queue.json");
    let source = MemorySource(events());

    let mut store = QueueStore::open(&path).expect("open");
    scanner(knowledge())
        .run(&source, Duration::minutes(60), &mut store)
        .await
        .expect("first scan");
    store.close().expect("close");

    let mut store = QueueStore::open(&path).expect("reopen");
    let report = scanner(knowledge())
        .run(&source, Duration::minutes(60), &mut store)
        .await
        .expect("second scan");
    store.close().expect("close");

    assert_eq!(report.already_queued, 4);
    assert_eq!(report.not_commitments, 1);
    assert!(report.created.is_empty());
    assert_eq!(load_queue(&path).len(), 4);
}

#[tokio::test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
async fn knowledge_failure_aborts_without_saving() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("commitment_queue.json");
    let mut store = QueueStore::open(&path).expect("open");

    let result = scanner(Offline)
        .run(&MemorySource(events()), Duration::minutes(60), &mut store)
        .await;

    assert!(matches!(result, Err(ScanError::Knowledge(_))));
    assert!(store.queue().is_empty());
    assert!(!store.is_dirty());
    assert!(!path.exists());
}

#[tokio::test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
async fn source_failure_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = QueueStore::open(dir.path().join("queue.json")).expect("open");

    let result = scanner(knowledge())
        .run(&DownSource, Duration::minutes(60), &mut store)
        .await;

    assert!(matches!(result, Err(ScanError::Source(SourceError::Unavailable(_)))));
}

#[tokio::test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
async fn empty_knowledge_base_yields_empty_context() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("queue.json");
    let mut store = QueueStore::open(&path).expect("open");

    scanner(StaticKnowledgeBase::default())
        .scan(&mut store, &events()[..1])
        .expect("scan");

    let c = &store.queue().commitments[0];
    assert_eq!(c.person_page, None);
    assert_eq!(c.project, None);
}
