use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use odr_api::{
    ApiClient, ApiConfig, ApiError, ApiRequest, DocumentView, Envelope, KnownParameter, Method,
    Notification, Notifier, RcFacade, RcParameterWrite, ServerFaultPolicy, Transport,
    TransportFailure,
};
use serde_json::{Value, json};

/// Replays canned outcomes in order and records every request it sees.
#[derive(Default)]
struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<Envelope, TransportFailure>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn with(outcomes: Vec<Result<Envelope, TransportFailure>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, request: ApiRequest) -> Result<Envelope, TransportFailure> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more often than scripted")
    }
}

#[derive(Default)]
struct Recorder {
    notifications: Mutex<Vec<Notification>>,
    documents: Mutex<Vec<String>>,
}

impl Notifier for Recorder {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

impl DocumentView for Recorder {
    fn replace_document(&self, raw_body: &str) {
        self.documents.lock().unwrap().push(raw_body.to_string());
    }
}

impl Recorder {
    fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    fn documents(&self) -> Vec<String> {
        self.documents.lock().unwrap().clone()
    }
}

/// Collects every value handed to a result continuation.
#[derive(Clone, Default)]
struct Results(Arc<Mutex<Vec<Value>>>);

impl Results {
    fn callback(&self) -> impl FnOnce(Value) + Send + use<> {
        let sink = self.0.clone();
        move |data| sink.lock().unwrap().push(data)
    }

    fn values(&self) -> Vec<Value> {
        self.0.lock().unwrap().clone()
    }
}

fn harness(
    config: &ApiConfig,
    outcomes: Vec<Result<Envelope, TransportFailure>>,
) -> (ApiClient, Arc<ScriptedTransport>, Arc<Recorder>) {
    let transport = ScriptedTransport::with(outcomes);
    let recorder = Arc::new(Recorder::default());
    let client = ApiClient::new(config, transport.clone(), recorder.clone(), recorder.clone());
    (client, transport, recorder)
}

/// Sends one request with the given method through the callback API.
async fn issue(client: &ApiClient, method: Method, results: &Results) {
    let handle = match method {
        Method::Get => client.request_get("/api/rc_parameters", results.callback()),
        Method::Post => client.request_post(
            "/api/parameter/",
            &json!({"controllable": "uhd", "param": "txgain", "value": 40}),
            results.callback(),
        ),
    };
    handle.await.unwrap();
}

#[tokio::test]
async fn ok_envelope_invokes_callback_once_with_data() {
    let data = json!({"uhd": {"txgain": {"value": 40}}});
    let (client, transport, recorder) =
        harness(&ApiConfig::default(), vec![Ok(Envelope::Ok(data.clone()))]);
    let results = Results::default();

    client
        .request_get("/api/rc_parameters", results.callback())
        .await
        .unwrap();

    assert_eq!(results.values(), vec![data]);
    assert!(recorder.notifications().is_empty());
    assert!(recorder.documents().is_empty());
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].body, None);
    assert_eq!(requests[0].content_type(), "application/json");
}

#[tokio::test]
async fn error_envelope_notifies_with_reason() {
    let (client, _transport, recorder) = harness(
        &ApiConfig::default(),
        vec![Ok(Envelope::Error("controllable tx not found".into()))],
    );
    let results = Results::default();

    client
        .request_post(
            "/api/parameter/",
            &json!({"controllable": "tx"}),
            results.callback(),
        )
        .await
        .unwrap();

    assert!(results.values().is_empty());
    assert!(recorder.documents().is_empty());
    assert_eq!(
        recorder.notifications(),
        vec![Notification {
            title: "API".into(),
            text: "API ERROR: controllable tx not found".into(),
            icon: "/fonts/warning.png".into(),
            sticky: true,
        }]
    );
}

#[tokio::test]
async fn server_fault_replaces_document_with_raw_body() {
    let trace = "<html><body>Traceback (most recent call last): ...</body></html>";
    for method in [Method::Get, Method::Post] {
        let (client, _transport, recorder) = harness(
            &ApiConfig::default(),
            vec![Err(TransportFailure::new(500, "Internal Server Error", trace))],
        );
        let results = Results::default();

        issue(&client, method, &results).await;

        assert!(results.values().is_empty(), "{method}");
        assert!(recorder.notifications().is_empty(), "{method}");
        assert_eq!(recorder.documents(), vec![trace.to_string()], "{method}");
    }
}

#[tokio::test]
async fn server_fault_can_be_reported_through_notifier() {
    let mut config = ApiConfig::default();
    config.server_fault = ServerFaultPolicy::Notify;
    let (client, _transport, recorder) = harness(
        &config,
        vec![Err(TransportFailure::new(500, "Internal Server Error", "boom"))],
    );

    let err = client.fetch_get("/api/rc_parameters").await.unwrap_err();

    assert!(recorder.documents().is_empty());
    let notes = recorder.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "AJAX failed: Internal Server Error");
    assert_eq!(err.transport().map(|f| f.status), Some(500));
}

#[tokio::test]
async fn other_transport_failures_notify_with_status_text() {
    for failure in [
        TransportFailure::new(404, "Not Found", "no route"),
        TransportFailure::new(502, "Bad Gateway", ""),
        TransportFailure::network(),
        TransportFailure::timeout(),
        TransportFailure::parse(200, "not json"),
    ] {
        for method in [Method::Get, Method::Post] {
            let status_text = failure.status_text.clone();
            let (client, transport, recorder) =
                harness(&ApiConfig::default(), vec![Err(failure.clone())]);
            let results = Results::default();

            issue(&client, method, &results).await;

            assert_eq!(transport.requests()[0].method, method);
            assert!(results.values().is_empty());
            assert!(recorder.documents().is_empty());
            let notes = recorder.notifications();
            assert_eq!(notes.len(), 1, "one notification for {method} {status_text}");
            assert_eq!(notes[0].title, "API");
            assert_eq!(notes[0].text, format!("AJAX failed: {status_text}"));
            assert!(notes[0].sticky);
        }
    }
}

#[tokio::test]
async fn fetch_returns_tagged_outcome_after_routing() {
    let (client, _transport, recorder) = harness(
        &ApiConfig::default(),
        vec![
            Ok(Envelope::Ok(json!(7))),
            Ok(Envelope::Error("busy".into())),
        ],
    );

    assert_eq!(client.fetch_get("/a").await, Ok(json!(7)));
    let err = client.fetch_get("/b").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Application {
            reason: "busy".into()
        }
    );
    assert_eq!(err.reason(), Some("busy"));
    assert_eq!(err.transport(), None);
    assert_eq!(recorder.notifications().len(), 1);
}

#[tokio::test]
async fn configured_icon_is_attached() {
    let mut config = ApiConfig::default();
    config.warning_icon = "/static/alert.svg".into();
    let (client, _transport, recorder) =
        harness(&config, vec![Ok(Envelope::Error("nope".into()))]);

    let _ = client.fetch_get("/api/rc_parameters").await;

    assert_eq!(recorder.notifications()[0].icon, "/static/alert.svg");
}

#[tokio::test]
async fn unserializable_payload_never_reaches_transport() {
    use std::collections::HashMap;

    let (client, transport, recorder) = harness(&ApiConfig::default(), vec![]);
    let mut payload = HashMap::new();
    payload.insert((1, 2), "tuple keys cannot be JSON object keys");
    let results = Results::default();

    client
        .request_post("/api/parameter/", &payload, results.callback())
        .await
        .unwrap();

    assert!(transport.requests().is_empty());
    assert!(results.values().is_empty());
    assert_eq!(recorder.notifications().len(), 1);
    assert_eq!(recorder.notifications()[0].text, "AJAX failed: error");
}

#[tokio::test]
async fn set_parameter_posts_write_payload() {
    let (client, transport, recorder) =
        harness(&ApiConfig::default(), vec![Ok(Envelope::Ok(json!("ok")))]);
    let rc = RcFacade::new(client);
    let results = Results::default();

    rc.set_parameter("tx", "gain", 5, results.callback())
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].uri, "/api/parameter/");
    assert_eq!(
        requests[0].body,
        Some(json!({"controllable": "tx", "param": "gain", "value": 5}))
    );
    assert_eq!(results.values(), vec![json!("ok")]);
    assert!(recorder.notifications().is_empty());
}

#[tokio::test]
async fn get_parameters_issues_bodyless_get() {
    let (client, transport, _recorder) =
        harness(&ApiConfig::default(), vec![Ok(Envelope::Ok(json!([])))]);
    let rc = RcFacade::new(client);
    let results = Results::default();

    rc.get_parameters(results.callback()).await.unwrap();

    assert_eq!(
        transport.requests(),
        vec![ApiRequest {
            method: Method::Get,
            uri: "/api/rc_parameters".into(),
            body: None,
        }]
    );
    assert_eq!(results.values(), vec![json!([])]);
}

#[tokio::test]
async fn repeated_gets_are_independent() {
    let (client, transport, _recorder) = harness(
        &ApiConfig::default(),
        vec![Ok(Envelope::Ok(json!({"n": 1}))), Ok(Envelope::Ok(json!({"n": 1})))],
    );
    let rc = RcFacade::new(client);
    let first = Results::default();
    let second = Results::default();

    rc.get_parameters(first.callback()).await.unwrap();
    rc.get_parameters(second.callback()).await.unwrap();

    assert_eq!(first.values(), vec![json!({"n": 1})]);
    assert_eq!(second.values(), vec![json!({"n": 1})]);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn set_known_and_write_parameter_use_the_write_endpoint() {
    let (client, transport, _recorder) = harness(
        &ApiConfig::default(),
        vec![Ok(Envelope::Ok(Value::Null)), Ok(Envelope::Ok(Value::Null))],
    );
    let rc = RcFacade::new(client);

    rc.set_known(KnownParameter::TxGain, 55, |_| {})
        .await
        .unwrap();
    rc.write_parameter(&RcParameterWrite::new("gain", "digital", 0.75))
        .await
        .unwrap();

    let bodies: Vec<_> = transport
        .requests()
        .into_iter()
        .map(|r| (r.uri, r.body))
        .collect();
    assert_eq!(
        bodies,
        vec![
            (
                "/api/parameter/".to_string(),
                Some(json!({"controllable": "uhd", "param": "txgain", "value": 55}))
            ),
            (
                "/api/parameter/".to_string(),
                Some(json!({"controllable": "gain", "param": "digital", "value": 0.75}))
            ),
        ]
    );
}
