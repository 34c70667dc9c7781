use std::time::Duration;

use chrono::Duration as ChronoDuration;

use super::*;
use crate::fakes::{repo, FakeProfileService, FixedPicker};

fn orchestrator(
    service: &Arc<FakeProfileService>,
    picker: usize,
) -> CandidateSearchOrchestrator {
    CandidateSearchOrchestrator::new(
        Arc::clone(service) as Arc<dyn ProfileService>,
        Arc::new(FixedPicker(picker)),
        PipelineSettings::default(),
    )
}

fn rust_criteria() -> FilterCriteria {
    FilterCriteria {
        languages: vec!["rust".to_owned()],
        ..FilterCriteria::default()
    }
}

/// alice and dave write Rust, carol writes Go, bob does not exist.
fn population() -> FakeProfileService {
    FakeProfileService::default()
        .with_profile("alice", 30, 4)
        .with_repos("alice", vec![repo("engine", Some("Rust"), 15)])
        .with_profile("carol", 80, 9)
        .with_repos("carol", vec![repo("api", Some("Go"), 300)])
        .with_profile("dave", 5, 2)
        .with_repos("dave", vec![repo("kernel", Some("Rust"), 2)])
        .with_search_results(&["alice", "bob", "carol", "dave"])
}

#[tokio::test]
async fn default_criteria_fail_without_remote_calls() {
    let service = Arc::new(population());

    let err = orchestrator(&service, 0)
        .search(&FilterCriteria::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "invalid_filter");
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn local_only_criteria_fail_without_remote_calls() {
    let service = Arc::new(population());
    let criteria = FilterCriteria {
        min_stars: 10,
        ..FilterCriteria::default()
    };

    let err = orchestrator(&service, 0).search(&criteria).await.unwrap_err();

    assert!(matches!(err, ScoutError::InvalidFilter(_)));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn failing_and_rejected_candidates_are_dropped() {
    let service = Arc::new(population());

    let found = orchestrator(&service, 1)
        .search(&rust_criteria())
        .await
        .unwrap();

    assert_eq!(found.survivors, 2);
    assert_eq!(found.facts.login, "dave");
    assert_eq!(found.facts.repositories[0].name, "kernel");
    assert_eq!(service.call_count("search_profiles:language:rust"), 1);
    assert_eq!(service.call_count("get_profile:bob"), 1);
}

#[tokio::test]
async fn no_survivor_is_no_match() {
    let service = Arc::new(population());
    let criteria = FilterCriteria {
        languages: vec!["Haskell".to_owned()],
        ..FilterCriteria::default()
    };

    let err = orchestrator(&service, 0).search(&criteria).await.unwrap_err();

    assert_eq!(err, ScoutError::NoMatch);
    assert_eq!(service.call_count("get_profile:"), 4);
}

#[tokio::test]
async fn empty_search_result_is_no_match() {
    let service = Arc::new(FakeProfileService::default());

    let err = orchestrator(&service, 0)
        .search(&rust_criteria())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "no_match");
}

#[tokio::test(start_paused = true)]
async fn picker_sees_survivors_in_search_order() {
    let service = Arc::new(population().with_delay("alice", Duration::from_secs(5)));

    let first = orchestrator(&service, 0)
        .search(&rust_criteria())
        .await
        .unwrap();

    assert_eq!(first.facts.login, "alice");
}

#[tokio::test(start_paused = true)]
async fn slow_candidate_is_dropped_at_deadline() {
    let service = Arc::new(population().with_delay("alice", Duration::from_secs(600)));

    let found = orchestrator(&service, 0)
        .search(&rust_criteria())
        .await
        .unwrap();

    assert_eq!(found.survivors, 1);
    assert_eq!(found.facts.login, "dave");
}

#[tokio::test(start_paused = true)]
async fn candidates_run_in_a_bounded_pool() {
    let delay = Duration::from_secs(10);
    let logins: Vec<String> = (0..10).map(|i| format!("dev{i}")).collect();
    let mut service = FakeProfileService::default();
    for login in &logins {
        service = service
            .with_profile(login, 1, 1)
            .with_repos(login, vec![repo(&format!("{login}-lib"), Some("Rust"), 1)])
            .with_delay(login, delay);
    }
    let search_results: Vec<&str> = logins.iter().map(String::as_str).collect();
    let service = Arc::new(service.with_search_results(&search_results));
    let settings = PipelineSettings {
        max_concurrent_candidates: 5,
        ..PipelineSettings::default()
    };
    let orchestrator = CandidateSearchOrchestrator::new(
        Arc::clone(&service) as Arc<dyn ProfileService>,
        Arc::new(FixedPicker(0)),
        settings,
    );

    let started = tokio::time::Instant::now();
    let found = orchestrator.search(&rust_criteria()).await.unwrap();

    // Two waves of five: overlapping but never more than the pool size.
    assert_eq!(started.elapsed(), delay * 2);
    assert_eq!(found.survivors, 10);
    assert_eq!(found.facts.login, "dev0");
}

#[tokio::test]
async fn recency_uses_activity_feed_and_tolerates_unreadable_feeds() {
    let recent = Utc::now() - ChronoDuration::days(3);
    let stale = Utc::now() - ChronoDuration::days(200);
    // dave has no feed at all, so the fake reports it as unreadable.
    let service = Arc::new(
        population()
            .with_activity("alice", vec![stale])
            .with_activity("carol", vec![recent]),
    );
    let criteria = FilterCriteria {
        min_followers: 1,
        recent_activity: true,
        ..FilterCriteria::default()
    };

    let found = orchestrator(&service, 0).search(&criteria).await.unwrap();

    assert_eq!(found.survivors, 1);
    assert_eq!(found.facts.login, "carol");
    assert_eq!(service.call_count("recent_activity:dave"), 1);
}

#[tokio::test]
async fn popularity_short_circuits_the_scan() {
    let service = Arc::new(
        FakeProfileService::default()
            .with_profile("star", 10, 3)
            .with_repos(
                "star",
                vec![
                    repo("first", Some("Rust"), 40),
                    repo("second", Some("Rust"), 70),
                    repo("third", Some("Rust"), 10),
                ],
            )
            .with_search_results(&["star"]),
    );
    let criteria = FilterCriteria {
        min_stars: 100,
        min_followers: 1,
        ..FilterCriteria::default()
    };

    let found = orchestrator(&service, 0).search(&criteria).await.unwrap();

    assert_eq!(found.facts.login, "star");
    assert_eq!(found.facts.total_stars(), 110);
    assert_eq!(service.call_count("repository_languages:star/third"), 0);
}

#[tokio::test]
async fn keyword_matches_bio_text() {
    let service = Arc::new(population().with_bio("carol", "Payments and Kafka pipelines"));
    let criteria = FilterCriteria {
        keyword: Some("kafka".to_owned()),
        ..FilterCriteria::default()
    };

    let found = orchestrator(&service, 0).search(&criteria).await.unwrap();

    assert_eq!(found.facts.login, "carol");
    assert_eq!(found.survivors, 1);
}

#[test]
fn random_picker_stays_in_range() {
    let picker = RandomPicker;
    for survivors in 1..20 {
        for _ in 0..50 {
            assert!(picker.pick(survivors) < survivors);
        }
    }
}
