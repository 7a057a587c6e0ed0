//! Protocol-level integration tests: the caller's view of the job protocol,
//! driven end to end through the orchestrator with the mock service.

use std::collections::HashSet;
use std::sync::Arc;

use extractor::testing::{
    channel_payload, feed_payload, feed_payload_with_bad, mock_registry, MOCK_SERVICE_ID,
};
use extractor::{
    codes, ErrorDetail, Extractor, InfoItem, JobKind, JobRequest, JobResponse, JobStatus,
    JobStepResult, Orchestrator, RequestMethod, Service, ServiceInfo, ServiceRegistry, State,
    StepInput, TaskResult,
};

fn orchestrator() -> Orchestrator {
    Orchestrator::new(mock_registry())
}

fn continuation(
    template: &JobRequest,
    response: &JobResponse,
    results: Vec<TaskResult>,
) -> JobRequest {
    let mut request = template.clone();
    request.session_id = Some(response.session_id.clone());
    request.state = response.state.clone();
    request.results = Some(results);
    request
}

#[test]
fn test_end_to_end_channel_scenario() {
    let orchestrator = orchestrator();
    let request = JobRequest::new(JobKind::FetchInfo, "https://site/user/42");

    // Round 1: the core plans two fetches.
    let response = orchestrator.execute(&request);
    assert_eq!(response.status, JobStatus::Continue);
    assert!(!response.session_id.is_empty());
    assert_eq!(response.state, Some(State::plain(1)));

    let tasks = response.tasks.as_ref().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].task_id, "info");
    assert_eq!(tasks[0].request.method, RequestMethod::Get);
    assert_eq!(tasks[0].request.url, "https://site/user/42");
    assert_eq!(tasks[1].task_id, "videos");
    assert_eq!(tasks[1].request.url, "https://site/user/42/video?page=1");

    // Round 2: the client fetched; the core completes.
    let follow_up = continuation(
        &request,
        &response,
        vec![
            TaskResult::new("info", channel_payload("42", "Some Channel")),
            TaskResult::new("videos", feed_payload(3, true)),
        ],
    );
    let done = orchestrator.execute(&follow_up);
    assert_eq!(done.status, JobStatus::Complete);
    assert_eq!(done.session_id, response.session_id);

    let result = done.result.unwrap();
    let InfoItem::Channel(channel) = result.info.unwrap() else {
        panic!("expected channel info");
    };
    assert_eq!(channel.name, "Some Channel");
    assert_eq!(channel.service_id, MOCK_SERVICE_ID);
    assert_eq!(channel.subscriber_count, Some(1200));
    assert_eq!(channel.tabs.len(), 1);

    let paged = result.paged.unwrap();
    assert_eq!(paged.items.len(), 3);
    assert!(paged.next_page.as_ref().unwrap().contains("page=2"));
    assert!(result.errors.is_empty());
}

#[test]
fn test_statelessness_identical_requests_identical_responses() {
    let orchestrator = orchestrator();
    let request = JobRequest::new(JobKind::FetchInfo, "https://site/user/42")
        .with_session("fixed-session")
        .with_state(State::plain(1))
        .with_results(vec![
            TaskResult::new("info", channel_payload("42", "Some Channel")),
            TaskResult::new("videos", feed_payload(2, false)),
        ]);

    let first = orchestrator.execute(&request);
    let second = orchestrator.execute(&request);
    assert_eq!(first, second);
}

#[test]
fn test_continuation_precondition_regardless_of_kind() {
    let orchestrator = orchestrator();
    let kinds = [
        JobKind::FetchInfo,
        JobKind::FetchFirstPage,
        JobKind::FetchGivenPage,
        JobKind::ListSupportedServices,
        JobKind::GetSuggestion,
    ];
    for kind in kinds {
        let request = JobRequest::new(kind, "https://site/user/42")
            .with_session("s-1")
            .with_state(State::plain(1));
        let response = orchestrator.execute(&request);
        assert_eq!(response.status, JobStatus::Failed, "kind {kind:?}");
        let fatal = response.result.unwrap().fatal.unwrap();
        assert_eq!(fatal.code, codes::EMPTY_CLIENT_RESULT, "kind {kind:?}");
    }
}

#[test]
fn test_batch_resilience_item_failures_never_fail_the_call() {
    let orchestrator = orchestrator();
    let request = JobRequest::new(JobKind::FetchInfo, "https://site/user/42");
    let response = orchestrator.execute(&request);

    // 5 entries, 2 malformed.
    let follow_up = continuation(
        &request,
        &response,
        vec![
            TaskResult::new("info", channel_payload("42", "Some Channel")),
            TaskResult::new("videos", feed_payload_with_bad(5, &[1, 3], false)),
        ],
    );
    let done = orchestrator.execute(&follow_up);
    assert_eq!(done.status, JobStatus::Complete);

    let result = done.result.unwrap();
    let paged = result.paged.unwrap();
    assert_eq!(paged.items.len(), 3);
    assert_eq!(result.errors.len(), 2);
    assert!(result
        .errors
        .iter()
        .all(|e| e.code == codes::ITEM_PARSE_FAILED));

    // Order preserved among the survivors.
    let urls: Vec<_> = paged
        .items
        .iter()
        .map(|item| match item {
            InfoItem::Stream(s) => s.url.as_str(),
            other => panic!("unexpected item {other:?}"),
        })
        .collect();
    assert_eq!(
        urls,
        vec!["https://site/v/0", "https://site/v/2", "https://site/v/4"]
    );
}

#[test]
fn test_pagination_terminates_on_empty_page() {
    let orchestrator = orchestrator();
    let request = JobRequest::new(JobKind::FetchGivenPage, "https://site/user/42/video?page=7");

    let response = orchestrator.execute(&request);
    assert_eq!(response.status, JobStatus::Continue);
    let tasks = response.tasks.as_ref().unwrap();
    assert_eq!(tasks[0].request.url, "https://site/user/42/video?page=7");

    let follow_up = continuation(
        &request,
        &response,
        vec![TaskResult::new("default", feed_payload(0, false))],
    );
    let done = orchestrator.execute(&follow_up);
    assert_eq!(done.status, JobStatus::Complete);
    let paged = done.result.unwrap().paged.unwrap();
    assert!(paged.items.is_empty());
    assert!(paged.is_last_page());
}

#[test]
fn test_pagination_advances_page_parameter() {
    let orchestrator = orchestrator();
    let request = JobRequest::new(JobKind::FetchGivenPage, "https://site/user/42/video?page=7");
    let response = orchestrator.execute(&request);
    let follow_up = continuation(
        &request,
        &response,
        vec![TaskResult::new("default", feed_payload(2, true))],
    );
    let done = orchestrator.execute(&follow_up);
    let paged = done.result.unwrap().paged.unwrap();
    assert!(paged.next_page.as_ref().unwrap().contains("page=8"));
}

#[test]
fn test_session_ids_are_unique() {
    let orchestrator = orchestrator();
    let request = JobRequest::new(JobKind::FetchInfo, "https://site/user/42");
    let mut seen = HashSet::new();
    for _ in 0..64 {
        let response = orchestrator.execute(&request);
        assert!(!response.session_id.is_empty());
        assert!(seen.insert(response.session_id));
    }
}

#[test]
fn test_error_code_stability() {
    let orchestrator = orchestrator();
    let request = JobRequest::new(JobKind::FetchInfo, "https://site/user/42");

    // Parse exhaustion: more failed entries than the collector tolerates.
    let response = orchestrator.execute(&request);
    let bad: Vec<usize> = (0..30).collect();
    let follow_up = continuation(
        &request,
        &response,
        vec![
            TaskResult::new("info", channel_payload("42", "Some Channel")),
            TaskResult::new("videos", feed_payload_with_bad(30, &bad, false)),
        ],
    );
    let done = orchestrator.execute(&follow_up);
    assert_eq!(done.status, JobStatus::Failed);
    let fatal = done.result.unwrap().fatal.unwrap();
    assert_eq!(fatal.code, codes::PARSE_EXHAUSTED);

    // Any other uncaught failure maps to the unknown code, never the
    // networking code.
    let response = orchestrator.execute(&request);
    let follow_up = continuation(
        &request,
        &response,
        vec![
            TaskResult::new("info", "this is not json"),
            TaskResult::new("videos", feed_payload(1, false)),
        ],
    );
    let done = orchestrator.execute(&follow_up);
    assert_eq!(done.status, JobStatus::Failed);
    let fatal = done.result.unwrap().fatal.unwrap();
    assert_eq!(fatal.code, codes::UNKNOWN);
}

#[test]
fn test_missing_task_result_fails_the_call() {
    let orchestrator = orchestrator();
    let request = JobRequest::new(JobKind::FetchInfo, "https://site/user/42");
    let response = orchestrator.execute(&request);

    // The client fetched only one of the two requested tasks.
    let follow_up = continuation(
        &request,
        &response,
        vec![TaskResult::new(
            "info",
            channel_payload("42", "Some Channel"),
        )],
    );
    let done = orchestrator.execute(&follow_up);
    assert_eq!(done.status, JobStatus::Failed);
    assert_eq!(done.result.unwrap().fatal.unwrap().code, codes::UNKNOWN);
}

#[test]
fn test_list_supported_services() {
    let orchestrator = orchestrator();
    let request = JobRequest {
        kind: JobKind::ListSupportedServices,
        url: None,
        service_id: None,
        session_id: None,
        state: None,
        results: None,
        cookie: None,
    };
    let response = orchestrator.execute(&request);
    assert_eq!(response.status, JobStatus::Complete);
    let paged = response.result.unwrap().paged.unwrap();
    assert_eq!(
        paged.items,
        vec![InfoItem::Service(ServiceInfo::new(
            MOCK_SERVICE_ID,
            "MockTube"
        ))]
    );
    assert!(paged.is_last_page());
}

#[test]
fn test_refresh_credentials_round_trips() {
    let orchestrator = orchestrator();
    let request = JobRequest::for_service(JobKind::RefreshCredentials, MOCK_SERVICE_ID);

    let response = orchestrator.execute(&request);
    assert_eq!(response.status, JobStatus::Continue);
    let tasks = response.tasks.as_ref().unwrap();
    assert_eq!(tasks[0].request.method, RequestMethod::Post);

    let follow_up = continuation(
        &request,
        &response,
        vec![TaskResult::new("default", "{\"token\":\"fresh\"}")],
    );
    let done = orchestrator.execute(&follow_up);
    assert_eq!(done.status, JobStatus::Complete);
}

#[test]
fn test_refresh_credentials_unknown_service() {
    let orchestrator = orchestrator();
    let request = JobRequest::for_service(JobKind::RefreshCredentials, "NOPE");
    let response = orchestrator.execute(&request);
    assert_eq!(response.status, JobStatus::Failed);
    let fatal = response.result.unwrap().fatal.unwrap();
    assert_eq!(fatal.code, codes::UNKNOWN);
    assert!(fatal.detail.contains("NOPE"));
}

#[test]
fn test_segment_list_round_trips() {
    let orchestrator = orchestrator();
    let request = JobRequest::new(
        JobKind::FetchSegmentList,
        "https://segments.example/api/skipSegments?videoID=abc123",
    );

    let response = orchestrator.execute(&request);
    assert_eq!(response.status, JobStatus::Continue);
    let lookup = &response.tasks.as_ref().unwrap()[0].request.url;
    assert!(lookup.contains("/skipSegments/"));

    let payload = serde_json::json!([
        {
            "videoID": "abc123",
            "segments": [
                { "UUID": "seg-1", "category": "sponsor", "actionType": "skip",
                  "segment": [10.0, 20.0], "votes": 3 }
            ]
        }
    ])
    .to_string();
    let follow_up = continuation(
        &request,
        &response,
        vec![TaskResult::new("default", payload)],
    );
    let done = orchestrator.execute(&follow_up);
    assert_eq!(done.status, JobStatus::Complete);
    let paged = done.result.unwrap().paged.unwrap();
    assert_eq!(paged.items.len(), 1);
}

#[test]
fn test_segment_lookup_uses_the_owning_services_api() {
    let orchestrator = orchestrator();
    // The video URL belongs to the mock service, whose segment API lives on
    // a different origin than the video itself.
    let request = JobRequest::new(
        JobKind::FetchSegmentList,
        "https://site/watch?videoID=abc123",
    );

    let response = orchestrator.execute(&request);
    assert_eq!(response.status, JobStatus::Continue);
    let lookup = &response.tasks.as_ref().unwrap()[0].request.url;
    assert!(
        lookup.starts_with("https://segments.example/api/skipSegments/"),
        "lookup went to {lookup}"
    );
}

#[test]
fn test_explicit_fail_result_surfaces_as_failed() {
    struct FailingService;
    struct FailingExtractor {
        url: String,
    }

    impl Extractor for FailingExtractor {
        fn url(&self) -> &str {
            &self.url
        }

        fn fetch_info(&self, _input: &StepInput<'_>) -> extractor::Result<JobStepResult> {
            Ok(JobStepResult::fail_with(ErrorDetail::new(
                "GEO_001",
                "content not available in this region",
            )))
        }
    }

    impl Service for FailingService {
        fn info(&self) -> ServiceInfo {
            ServiceInfo::new("FAILING", "Failing")
        }

        fn route(&self, url: &str) -> Option<Box<dyn Extractor>> {
            url.starts_with("https://failing.example/").then(|| {
                Box::new(FailingExtractor {
                    url: url.to_string(),
                }) as Box<dyn Extractor>
            })
        }
    }

    let registry = Arc::new(ServiceRegistry::new().with_service(Arc::new(FailingService)));
    let orchestrator = Orchestrator::new(registry);

    let request = JobRequest::new(JobKind::FetchInfo, "https://failing.example/v/1");
    let response = orchestrator.execute(&request);
    assert_eq!(response.status, JobStatus::Failed);
    let fatal = response.result.unwrap().fatal.unwrap();
    // A domain-level Fail keeps its own code, unlike uncaught errors.
    assert_eq!(fatal.code, "GEO_001");
}

#[test]
fn test_concurrent_sessions_need_no_coordination() {
    let orchestrator = Arc::new(orchestrator());
    let mut handles = Vec::new();
    for _ in 0..8 {
        let orchestrator = Arc::clone(&orchestrator);
        handles.push(std::thread::spawn(move || {
            let request = JobRequest::new(JobKind::FetchInfo, "https://site/user/42");
            let response = orchestrator.execute(&request);
            assert_eq!(response.status, JobStatus::Continue);

            let follow_up = continuation(
                &request,
                &response,
                vec![
                    TaskResult::new("info", channel_payload("42", "Some Channel")),
                    TaskResult::new("videos", feed_payload(2, false)),
                ],
            );
            let done = orchestrator.execute(&follow_up);
            assert_eq!(done.status, JobStatus::Complete);
            response.session_id
        }));
    }

    let ids: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids.len(), 8);
}
