use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqchain_core::types::{
    ExecutionStatus, HttpMethod, ResponseEnvelope, StepStatus, WorkflowAuth, WorkflowDefinition,
    WorkflowDocument, WorkflowRequest, WorkflowStep,
};
use reqchain_exec::executor::{ChannelEventSink, CompositeEventSink, Event};
use reqchain_exec::{
    CancellationToken, ExecutorError, RequestExecutor, ResolvedRequest, WorkflowEngine,
};
use serde_json::json;

// Mock collaborator: replays queued outcomes and records every request it receives.
#[derive(Default)]
struct MockExecutor {
    outcomes: Mutex<VecDeque<Result<ResponseEnvelope, ExecutorError>>>,
    calls: Mutex<Vec<ResolvedRequest>>,
    cancel_on_call: Option<CancellationToken>,
    panic_on_call: bool,
}

impl MockExecutor {
    fn with(outcomes: Vec<Result<ResponseEnvelope, ExecutorError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<ResolvedRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn execute(&self, request: ResolvedRequest) -> Result<ResponseEnvelope, ExecutorError> {
        self.calls.lock().unwrap().push(request);
        if self.panic_on_call {
            panic!("collaborator exploded");
        }
        if let Some(token) = &self.cancel_on_call {
            token.cancel();
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ok(200, None)))
    }
}

fn ok(status: u16, body: Option<serde_json::Value>) -> ResponseEnvelope {
    ResponseEnvelope {
        status,
        status_text: String::new(),
        headers: Default::default(),
        body,
        duration_ms: 1,
    }
}

fn step(order: i64, id: &str, method: HttpMethod, path: &str) -> WorkflowStep {
    WorkflowStep::new(order, id, WorkflowRequest::new(method, path)).with_id(id)
}

fn three_steps() -> WorkflowDocument {
    WorkflowDocument::transient(
        WorkflowDefinition::new("three", "https://api.test")
            .with_step(step(0, "a", HttpMethod::Get, "/a"))
            .with_step(step(1, "b", HttpMethod::Get, "/b"))
            .with_step(step(2, "c", HttpMethod::Get, "/c")),
    )
}

fn statuses(execution: &reqchain_core::types::WorkflowExecution) -> Vec<StepStatus> {
    execution.results.iter().map(|r| r.status).collect()
}

#[tokio::test]
async fn empty_workflow_completes_immediately() {
    let mock = Arc::new(MockExecutor::default());
    let engine = WorkflowEngine::new(mock.clone());
    let doc = WorkflowDocument::transient(WorkflowDefinition::new("empty", "https://api.test"));

    let execution = engine.execute(&doc, &CancellationToken::new()).await;

    assert_eq!(execution.status, ExecutionStatus::Completed);
    assert!(execution.results.is_empty());
    assert!(execution.variables.is_empty());
    assert!(execution.completed_at.is_some());
    assert_eq!(execution.workflow_id, doc.id);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn extracted_variable_flows_into_next_step() {
    let mut create = WorkflowStep::new(
        0,
        "create",
        WorkflowRequest {
            body: Some(r#"{"name":"ann"}"#.to_string()),
            ..WorkflowRequest::new(HttpMethod::Post, "/users")
        },
    )
    .with_id("create")
    .with_extraction("userId", "id");
    create.request.headers.insert("Content-Type".into(), "application/json".into());
    let fetch = step(1, "fetch", HttpMethod::Get, "/users/{{userId}}");

    let doc = WorkflowDocument::transient(
        WorkflowDefinition::new("chain", "https://api.test")
            .with_step(fetch)
            .with_step(create),
    );
    let mock = Arc::new(MockExecutor::with(vec![
        Ok(ok(201, Some(json!({"id": 42})))),
        Ok(ok(200, Some(json!({"id": 42, "name": "ann"})))),
    ]));

    let execution = WorkflowEngine::new(mock.clone())
        .execute(&doc, &CancellationToken::new())
        .await;

    assert_eq!(execution.status, ExecutionStatus::Completed);
    assert_eq!(statuses(&execution), vec![StepStatus::Success, StepStatus::Success]);
    assert_eq!(execution.variables.get("userId"), Some(&json!(42)));
    assert_eq!(execution.results[0].step_id, "create");
    assert_eq!(execution.results[0].extracted_variables.get("userId"), Some(&json!(42)));

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].url, "https://api.test/users");
    assert_eq!(calls[0].body.as_deref(), Some(r#"{"name":"ann"}"#));
    assert_eq!(calls[1].url, "https://api.test/users/42");
    assert_eq!(calls[1].body, None);
}

#[tokio::test]
async fn failure_skips_remaining_steps() {
    let mock = Arc::new(MockExecutor::with(vec![
        Ok(ok(200, None)),
        Err(ExecutorError::Network("connection refused".into())),
    ]));

    let execution = WorkflowEngine::new(mock.clone())
        .execute(&three_steps(), &CancellationToken::new())
        .await;

    assert_eq!(execution.status, ExecutionStatus::Failed);
    assert_eq!(
        statuses(&execution),
        vec![StepStatus::Success, StepStatus::Failure, StepStatus::Skipped]
    );
    assert!(execution.results[1]
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("connection refused"));
    assert_eq!(mock.calls().len(), 2);
}

#[tokio::test]
async fn error_status_response_is_kept_on_failed_step() {
    let response = ok(404, Some(json!({"error": "not found"})));
    let mock = Arc::new(MockExecutor::with(vec![Err(ExecutorError::Status {
        status: 404,
        status_text: "Not Found".into(),
        response: Box::new(response.clone()),
    })]));

    let execution = WorkflowEngine::new(mock)
        .execute(&three_steps(), &CancellationToken::new())
        .await;

    assert_eq!(execution.status, ExecutionStatus::Failed);
    let failed = &execution.results[0];
    assert_eq!(failed.status, StepStatus::Failure);
    assert_eq!(failed.error.as_deref(), Some("HTTP 404 Not Found"));
    assert_eq!(failed.response.as_ref(), Some(&response));
}

#[tokio::test]
async fn abort_before_start_skips_everything() {
    let mock = Arc::new(MockExecutor::default());
    let token = CancellationToken::new();
    token.cancel();

    let execution = WorkflowEngine::new(mock.clone())
        .execute(&three_steps(), &token)
        .await;

    assert_eq!(execution.status, ExecutionStatus::Aborted);
    assert_eq!(execution.results.len(), 3);
    assert!(execution.results.iter().all(|r| r.status == StepStatus::Skipped));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn abort_during_request_discards_its_response() {
    let token = CancellationToken::new();
    let mock = Arc::new(MockExecutor {
        cancel_on_call: Some(token.clone()),
        ..MockExecutor::with(vec![Ok(ok(200, Some(json!({"id": 1}))))])
    });
    let mut doc = three_steps();
    doc.steps[0] = doc.steps[0].clone().with_extraction("id", "id");

    let execution = WorkflowEngine::new(mock.clone()).execute(&doc, &token).await;

    assert_eq!(execution.status, ExecutionStatus::Aborted);
    assert_eq!(
        statuses(&execution),
        vec![StepStatus::Skipped, StepStatus::Skipped, StepStatus::Skipped]
    );
    assert!(execution.results[0].response.is_none());
    assert!(execution.variables.is_empty());
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn extraction_miss_is_a_warning_not_a_failure() {
    let mut doc = three_steps();
    doc.steps[0] = doc.steps[0]
        .clone()
        .with_extraction("token", "auth.token")
        .with_extraction("first", "items[0]");
    let mock = Arc::new(MockExecutor::with(vec![Ok(ok(
        200,
        Some(json!({"items": ["x"]})),
    ))]));

    let execution = WorkflowEngine::new(mock)
        .execute(&doc, &CancellationToken::new())
        .await;

    assert_eq!(execution.status, ExecutionStatus::Completed);
    let first = &execution.results[0];
    assert_eq!(first.status, StepStatus::Success);
    assert_eq!(first.warnings.len(), 1);
    assert!(first.warnings[0].starts_with("token:"));
    assert!(!execution.variables.contains_key("token"));
    assert_eq!(execution.variables.get("first"), Some(&json!("x")));
}

#[tokio::test]
async fn extraction_miss_keeps_earlier_value() {
    let doc = WorkflowDocument::transient(
        WorkflowDefinition::new("keep", "https://api.test")
            .with_step(step(0, "a", HttpMethod::Get, "/a").with_extraction("id", "id"))
            .with_step(step(1, "b", HttpMethod::Get, "/b").with_extraction("id", "data.id"))
            .with_step(step(2, "c", HttpMethod::Get, "/c/{{id}}")),
    );
    let mock = Arc::new(MockExecutor::with(vec![
        Ok(ok(200, Some(json!({"id": 1})))),
        Ok(ok(200, Some(json!({"other": true})))),
    ]));

    let execution = WorkflowEngine::new(mock.clone())
        .execute(&doc, &CancellationToken::new())
        .await;

    assert_eq!(execution.status, ExecutionStatus::Completed);
    assert_eq!(execution.results[1].warnings.len(), 1);
    assert!(execution.results[1].warnings[0].starts_with("id:"));
    assert_eq!(execution.variables.get("id"), Some(&json!(1)));
    assert_eq!(mock.calls()[2].url, "https://api.test/c/1");
}

#[tokio::test]
async fn panicking_collaborator_fails_the_step() {
    let mock = Arc::new(MockExecutor {
        panic_on_call: true,
        ..Default::default()
    });

    let execution = WorkflowEngine::new(mock)
        .execute(&three_steps(), &CancellationToken::new())
        .await;

    assert_eq!(execution.status, ExecutionStatus::Failed);
    assert_eq!(
        statuses(&execution),
        vec![StepStatus::Failure, StepStatus::Skipped, StepStatus::Skipped]
    );
    assert!(execution.results[0]
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("collaborator exploded"));
}

#[tokio::test]
async fn steps_run_by_order_not_position() {
    let doc = WorkflowDocument::transient(
        WorkflowDefinition::new("shuffled", "https://api.test")
            .with_step(step(5, "late", HttpMethod::Get, "/late"))
            .with_step(step(-1, "early", HttpMethod::Get, "/early"))
            .with_step(step(2, "middle", HttpMethod::Get, "/middle")),
    );
    let mock = Arc::new(MockExecutor::default());

    let execution = WorkflowEngine::new(mock.clone())
        .execute(&doc, &CancellationToken::new())
        .await;

    let ids = execution.results.iter().map(|r| r.step_id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["early", "middle", "late"]);
    let urls = mock.calls().into_iter().map(|c| c.url).collect::<Vec<_>>();
    assert_eq!(
        urls,
        vec![
            "https://api.test/early",
            "https://api.test/middle",
            "https://api.test/late"
        ]
    );
}

#[tokio::test]
async fn equal_order_keeps_insertion_order() {
    let doc = WorkflowDocument::transient(
        WorkflowDefinition::new("ties", "https://api.test")
            .with_step(step(2, "second", HttpMethod::Get, "/second"))
            .with_step(step(1, "first", HttpMethod::Get, "/first"))
            .with_step(step(2, "third", HttpMethod::Get, "/third")),
    );
    let mock = Arc::new(MockExecutor::default());

    let execution = WorkflowEngine::new(mock.clone())
        .execute(&doc, &CancellationToken::new())
        .await;

    let ids = execution.results.iter().map(|r| r.step_id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["first", "second", "third"]);
    let urls = mock.calls().into_iter().map(|c| c.url).collect::<Vec<_>>();
    assert_eq!(
        urls,
        vec![
            "https://api.test/first",
            "https://api.test/second",
            "https://api.test/third"
        ]
    );
}

#[tokio::test]
async fn step_auth_overrides_shared_auth() {
    let mut def = WorkflowDefinition::new("auth", "https://api.test")
        .with_step(step(0, "shared", HttpMethod::Get, "/a"));
    let mut own = step(1, "own", HttpMethod::Get, "/b");
    own.request.auth = Some(WorkflowAuth::ApiKey { api_key: "k".into() });
    def = def.with_step(own);
    def.shared_auth = Some(WorkflowAuth::Bearer { token: "t".into() });
    let mock = Arc::new(MockExecutor::default());

    WorkflowEngine::new(mock.clone())
        .execute(&WorkflowDocument::transient(def), &CancellationToken::new())
        .await;

    let calls = mock.calls();
    assert_eq!(calls[0].auth, WorkflowAuth::Bearer { token: "t".into() });
    assert_eq!(calls[1].auth, WorkflowAuth::ApiKey { api_key: "k".into() });
}

#[tokio::test]
async fn events_follow_the_step_lifecycle() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mock = Arc::new(MockExecutor::with(vec![
        Ok(ok(200, None)),
        Err(ExecutorError::Timeout),
    ]));

    let execution = WorkflowEngine::new(mock)
        .with_event_sink(Arc::new(ChannelEventSink::new(tx)))
        .execute(&three_steps(), &CancellationToken::new())
        .await;

    let mut types = Vec::new();
    while let Ok(event) = rx.try_recv() {
        assert_eq!(event.execution_id(), execution.id);
        if let Event::RunFinished { execution: finished } = &event {
            assert_eq!(finished.status, ExecutionStatus::Failed);
        }
        types.push(event.type_str());
    }
    assert_eq!(
        types,
        vec![
            "run.started",
            "step.started",
            "step.completed",
            "step.started",
            "step.failed",
            "step.completed",
            "step.completed",
            "run.finished",
        ]
    );
}

#[tokio::test]
async fn composite_sink_fans_out_to_every_sink() {
    let (tx_a, mut rx_a) = tokio::sync::mpsc::unbounded_channel();
    let (tx_b, mut rx_b) = tokio::sync::mpsc::unbounded_channel();
    let mut sink = CompositeEventSink::new();
    assert!(sink.is_empty());
    sink.add(Box::new(ChannelEventSink::new(tx_a)));
    sink.add(Box::new(ChannelEventSink::new(tx_b)));
    let doc = WorkflowDocument::transient(WorkflowDefinition::new("empty", "https://api.test"));

    WorkflowEngine::new(Arc::new(MockExecutor::default()))
        .with_event_sink(Arc::new(sink))
        .execute(&doc, &CancellationToken::new())
        .await;

    for rx in [&mut rx_a, &mut rx_b] {
        let mut types = Vec::new();
        while let Ok(event) = rx.try_recv() {
            types.push(event.type_str());
        }
        assert_eq!(types, vec!["run.started", "run.finished"]);
    }
}
