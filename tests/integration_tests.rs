use httpmock::prelude::*;
use service_orchestrator::utils::validation::Validate;
use service_orchestrator::{
    http_collaborators, OrchestrationEngine, OrchestrationError, Orchestrator, OrchestratorConfig,
    ServiceRequest,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn sensor(name: &str) -> serde_json::Value {
    serde_json::json!({
        "systemGroup": "sensors",
        "systemName": name,
        "address": "10.0.0.1",
        "port": 8080
    })
}

fn write_config(server: &MockServer, extra: &str) -> NamedTempFile {
    let content = format!(
        r#"
[collaborators]
service_registry_uri = "{registry}"
authorization_uri = "{authorization}"
qos_manager_uri = "{qos}"
gatekeeper_uri = "{gatekeeper}"

[orchestration]
call_timeout_seconds = 5
registry_tsig_key = "c2lnbmluZy1rZXk="
authentication_info = "cloud-credential"
{extra}
"#,
        registry = server.url("/serviceregistry"),
        authorization = server.url("/authorization"),
        qos = server.url("/QoSManager"),
        gatekeeper = server.url("/gatekeeper"),
        extra = extra,
    );
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn engine_from(file: &NamedTempFile) -> OrchestrationEngine<service_orchestrator::OrchestrationSettings> {
    let config = OrchestratorConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();
    let orchestrator = Orchestrator::new(http_collaborators(&config).unwrap(), config.settings())
        .with_selection(config.selection().build());
    OrchestrationEngine::new(orchestrator)
}

fn request(flags: serde_json::Value) -> ServiceRequest {
    serde_json::from_value(serde_json::json!({
        "requesterSystem": {
            "systemGroup": "clients",
            "systemName": "dashboard",
            "address": "10.0.1.1",
            "port": 9000
        },
        "requestedService": {
            "serviceGroup": "weather",
            "serviceDefinition": "tempSensor",
            "interfaces": ["JSON"]
        },
        "orchestrationFlags": flags
    }))
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_local_orchestration_over_http() {
    let server = MockServer::start();

    let registry_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/serviceregistry/weather/tempSensor")
            .json_body_partial(r#"{"tsig_key": "c2lnbmluZy1rZXk="}"#);
        then.status(200).json_body(serde_json::json!({
            "serviceQueryData": [
                {"provider": sensor("a"), "serviceURI": "/a/temperature"},
                {"provider": sensor("b"), "serviceURI": "/b/temperature"},
                {"provider": sensor("c"), "serviceURI": "/c/temperature"}
            ]
        }));
    });
    let auth_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/authorization/SystemGroup/clients/System/dashboard");
        then.status(200).json_body(serde_json::json!({
            "authorizationMap": [
                {"system": sensor("a"), "authorized": true},
                {"system": sensor("b"), "authorized": false},
                {"system": sensor("c"), "authorized": true}
            ]
        }));
    });
    let verify_mock = server.mock(|when, then| {
        when.method(PUT).path("/QoSManager/QoSVerify");
        then.status(200).json_body(serde_json::json!({
            "response": [
                {"system": sensor("a"), "admissible": true},
                {"system": sensor("c"), "admissible": false}
            ]
        }));
    });
    let reserve_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/QoSManager/QoSReserve")
            .json_body_partial(&serde_json::json!({"provider": sensor("a")}).to_string());
        then.status(200)
            .json_body(serde_json::json!({"successful": true}));
    });

    let file = write_config(&server, "");
    let engine = engine_from(&file);
    let result = engine.orchestrate(&request(serde_json::json!({}))).await.unwrap();

    registry_mock.assert();
    auth_mock.assert();
    verify_mock.assert();
    reserve_mock.assert_hits(1);
    assert_eq!(result.len(), 1);
    assert_eq!(result.bindings[0].provider.system_name, "a");
    assert_eq!(result.bindings[0].service_uri, "/a/temperature");
    assert_eq!(result.bindings[0].authorization_info, "authorizationInfo");
}

#[tokio::test]
async fn test_end_to_end_external_request_only_touches_registry() {
    let server = MockServer::start();

    let registry_mock = server.mock(|when, then| {
        when.method(PUT).path("/serviceregistry/weather/tempSensor");
        then.status(200).json_body(serde_json::json!({
            "serviceQueryData": [{"provider": sensor("a"), "serviceURI": "/a/temperature"}]
        }));
    });
    let auth_mock = server.mock(|when, then| {
        when.method(PUT).path_contains("/authorization");
        then.status(500);
    });

    let file = write_config(&server, r#"external_authorization_marker = "ext""#);
    let engine = engine_from(&file);
    let result = engine
        .orchestrate(&request(serde_json::json!({"ExternalServiceRequest": true})))
        .await
        .unwrap();

    registry_mock.assert();
    auth_mock.assert_hits(0);
    assert_eq!(result.len(), 1);
    assert_eq!(result.bindings[0].authorization_info, "ext");
}

#[tokio::test]
async fn test_end_to_end_authorization_outage_fails_the_run() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(PUT).path("/serviceregistry/weather/tempSensor");
        then.status(200).json_body(serde_json::json!({
            "serviceQueryData": [{"provider": sensor("a"), "serviceURI": "/a/temperature"}]
        }));
    });
    server.mock(|when, then| {
        when.method(PUT)
            .path("/authorization/SystemGroup/clients/System/dashboard");
        then.status(503);
    });
    let verify_mock = server.mock(|when, then| {
        when.method(PUT).path("/QoSManager/QoSVerify");
        then.status(200).json_body(serde_json::json!({"response": []}));
    });

    let file = write_config(&server, "");
    let engine = engine_from(&file);
    let err = engine
        .orchestrate(&request(serde_json::json!({})))
        .await
        .unwrap_err();

    verify_mock.assert_hits(0);
    assert!(matches!(err, OrchestrationError::UpstreamUnavailable { .. }));
    assert!(err.to_string().contains("authorization"));
}

#[tokio::test]
async fn test_end_to_end_inter_cloud_with_one_failing_peer() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(PUT).path("/gatekeeper/init_gsd");
        then.status(200).json_body(serde_json::json!({
            "response": [
                {"cloud": {"operator": "op", "cloudName": "north"}},
                {"cloud": {"operator": "op", "cloudName": "broken"}},
                {"cloud": {"operator": "op", "cloudName": "east"}}
            ]
        }));
    });
    for (cloud, provider) in [("north", "n1"), ("east", "e1")] {
        server.mock(|when, then| {
            when.method(PUT)
                .path("/gatekeeper/init_icn")
                .json_body_partial(
                    serde_json::json!({"targetCloud": {"cloudName": cloud}}).to_string(),
                );
            then.status(200).json_body(serde_json::json!({
                "instructions": {
                    "response": [{
                        "service": {"serviceGroup": "weather", "serviceDefinition": "tempSensor"},
                        "provider": sensor(provider),
                        "serviceURI": format!("/{}/temperature", provider),
                        "authorizationInfo": "peer-token"
                    }]
                }
            }));
        });
    }
    server.mock(|when, then| {
        when.method(PUT)
            .path("/gatekeeper/init_icn")
            .json_body_partial(r#"{"targetCloud": {"cloudName": "broken"}}"#);
        then.status(502);
    });

    let file = write_config(&server, "fan_out_limit = 3");
    let engine = engine_from(&file);
    let result = engine
        .orchestrate(&request(serde_json::json!({"TriggerInterCloud": true})))
        .await
        .unwrap();

    let names: Vec<_> = result
        .providers()
        .map(|p| p.system_name.as_str())
        .collect();
    assert_eq!(names, vec!["n1", "e1"]);
}

#[tokio::test]
async fn test_malformed_request_never_reaches_collaborators() {
    let server = MockServer::start();
    let any_mock = server.mock(|when, then| {
        when.method(PUT);
        then.status(200).json_body(serde_json::json!({}));
    });

    let file = write_config(&server, "");
    let engine = engine_from(&file);
    let request: ServiceRequest = serde_json::from_value(serde_json::json!({
        "requesterSystem": {
            "systemGroup": "clients",
            "systemName": "dashboard",
            "address": "10.0.1.1",
            "port": 9000
        }
    }))
    .unwrap();

    let err = engine.orchestrate(&request).await.unwrap_err();

    any_mock.assert_hits(0);
    assert!(matches!(err, OrchestrationError::MalformedRequest { .. }));
}
