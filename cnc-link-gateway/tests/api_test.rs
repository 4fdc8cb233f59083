use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use cnc_link_gateway::build_router;
use cnc_link_gateway::focas::{DriverError, Handle, OffsetType, ReturnCode};
use cnc_link_gateway::test_util::{create_connected_state, create_test_state, Call, FakeDriver};
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

fn connected_app() -> (Router, Arc<FakeDriver>) {
    let driver = Arc::new(FakeDriver::new());
    let app = build_router(create_connected_state(driver.clone()));
    (app, driver)
}

fn disconnected_app() -> (Router, Arc<FakeDriver>) {
    let driver = Arc::new(FakeDriver::new());
    let app = build_router(create_test_state(driver.clone()));
    (app, driver)
}

async fn send(app: &Router, request: Request<Body>) -> Value {
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> Value {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post(app: &Router, uri: &str, body: Value) -> Value {
    post_raw(app, uri, body.to_string()).await
}

async fn post_raw(app: &Router, uri: &str, body: impl Into<Body>) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = disconnected_app();

    let body = get(&app, "/health").await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_status_does_not_touch_driver() {
    let (app, driver) = disconnected_app();

    let body = get(&app, "/api/focas/status").await;

    assert_eq!(body["status"], "FOCAS Service is running");
    assert!(body["timestamp"].is_string());
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_reads_without_connection_report_not_connected() {
    let (app, driver) = disconnected_app();

    for uri in [
        "/api/focas/feedrate",
        "/api/focas/spindle-speed",
        "/api/focas/absolute-position",
        "/api/focas/tool-offsets/1",
        "/api/focas/work-zero-offsets-range/1/6",
    ] {
        let body = get(&app, uri).await;
        assert_eq!(body["success"], false, "{}", uri);
        assert_eq!(body["error"], "Not connected", "{}", uri);
        assert!(body.get("data").is_none());
    }
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_connect_network() {
    let (app, driver) = disconnected_app();

    let body = post(
        &app,
        "/api/focas/connect",
        json!({ "ipAddress": "192.168.3.105", "port": 8193 }),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "Connected with handle: 1");
    assert_eq!(
        driver.calls(),
        vec![Call::ConnectNetwork {
            host: "192.168.3.105".to_string(),
            port: 8193,
            timeout_secs: 10,
        }]
    );
}

#[tokio::test]
async fn test_connect_without_body_is_local() {
    let (app, driver) = disconnected_app();

    let body = post_raw(&app, "/api/focas/connect", Body::empty()).await;

    assert_eq!(body["success"], true);
    assert_eq!(driver.calls(), vec![Call::ConnectLocal]);
}

#[tokio::test]
async fn test_connect_failure_reports_code_and_target() {
    let (app, driver) = disconnected_app();
    driver.fail_always(Call::is_connect, DriverError::Code(ReturnCode::SOCKET));

    let body = post(
        &app,
        "/api/focas/connect",
        json!({ "ipAddress": "10.0.0.9", "port": 8193, "timeout": 2 }),
    )
    .await;

    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Windows socket error (IP: 10.0.0.9, Port: 8193)");
    assert_eq!(body["errorCode"], -16);

    let body = get(&app, "/api/focas/feedrate").await;
    assert_eq!(body["error"], "Not connected");
}

#[tokio::test]
async fn test_malformed_body_is_reported_in_envelope() {
    let (app, driver) = connected_app();

    let body = post_raw(&app, "/api/focas/connect", "{\"ipAddress\":").await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));

    let body = post(&app, "/api/focas/write-macro", json!({ "number": 700 })).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("mcrVal"));

    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_non_numeric_path_is_reported_in_envelope() {
    let (app, driver) = connected_app();

    let body = get(&app, "/api/focas/tool-radius/abc").await;

    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_telemetry_reads() {
    let (app, driver) = connected_app();

    let body = get(&app, "/api/focas/feedrate").await;
    assert_eq!(body, json!({ "success": true, "data": { "feedrate": 1500 } }));

    let body = get(&app, "/api/focas/spindle-speed").await;
    assert_eq!(body["data"]["speed"], 8000);

    let body = get(&app, "/api/focas/absolute-position").await;
    assert_eq!(body["data"]["positions"], json!([1000, 2000, 3000]));
    assert_eq!(body["data"]["axisType"], -1);
    assert!(driver.calls().contains(&Call::Absolute {
        handle: Handle(1),
        axis: -1,
        length: 16,
    }));
}

#[tokio::test]
async fn test_driver_error_is_mapped() {
    let (app, driver) = connected_app();
    driver.fail_once(
        |c| matches!(c, Call::SpindleSpeed(_)),
        DriverError::Code(ReturnCode::FUNC),
    );

    let body = get(&app, "/api/focas/spindle-speed").await;

    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Function not executed or not available");
    assert_eq!(body["errorCode"], 1);
}

#[tokio::test]
async fn test_stale_handle_is_replaced_transparently() {
    let (app, driver) = connected_app();
    driver.fail_once(
        |c| matches!(c, Call::Feedrate(_)),
        DriverError::Code(ReturnCode::HANDLE),
    );

    let body = get(&app, "/api/focas/feedrate").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["feedrate"], 1500);
    assert_eq!(driver.connect_count(), 1);
    assert_eq!(driver.calls().last(), Some(&Call::Feedrate(Handle(2))));
}

#[tokio::test]
async fn test_tool_radius_post_and_get() {
    let (app, driver) = connected_app();

    let body = post(&app, "/api/focas/tool-radius", json!({ "toolNumber": 5 })).await;
    assert_eq!(
        body["data"],
        json!({ "radius": 505, "toolGroup": 0, "toolNumber": 5 })
    );

    let body = get(&app, "/api/focas/tool-radius/7").await;
    assert_eq!(body["data"]["radius"], 507);

    assert_eq!(
        driver.calls()[0],
        Call::ToolRadius {
            handle: Handle(1),
            group: 0,
            number: 5,
        }
    );
}

#[tokio::test]
async fn test_tool_offsets_partial_failure_leaves_field_empty() {
    let (app, driver) = connected_app();
    driver.fail_always(
        |c| {
            matches!(
                c,
                Call::ToolOffset {
                    kind: OffsetType::ToolLengthWear,
                    ..
                }
            )
        },
        DriverError::Code(ReturnCode::NUMBER),
    );

    let body = post(&app, "/api/focas/tool-offsets", json!({ "toolNumber": 3 })).await;

    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"],
        json!({
            "toolNumber": 3,
            "cutterRadiusWear": 300,
            "cutterRadiusGeometry": 301,
            "toolLengthWear": null,
            "toolLengthGeometry": 303,
        })
    );
}

#[tokio::test]
async fn test_tool_offsets_range() {
    let (app, _) = connected_app();

    let body = post(
        &app,
        "/api/focas/tool-offsets-range",
        json!({ "startToolNumber": 1, "endToolNumber": 3 }),
    )
    .await;
    let tools = body["data"].as_array().unwrap();
    assert_eq!(tools.len(), 3);
    assert_eq!(tools[2]["toolNumber"], 3);
    assert_eq!(tools[2]["toolLengthGeometry"], 303);

    let body = get(&app, "/api/focas/tool-offsets-range/5/4").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_work_zero_offsets_range() {
    let (app, _) = connected_app();

    let body = post(
        &app,
        "/api/focas/work-zero-offsets-range",
        json!({ "startCoordSys": 1, "endCoordSys": 2 }),
    )
    .await;

    assert_eq!(
        body["data"][1],
        json!({
            "number": 2,
            "label": "G55",
            "axes": [
                { "axis": 1, "value": 2001 },
                { "axis": 2, "value": 2002 },
                { "axis": 3, "value": 2003 },
            ],
        })
    );
    assert_eq!(body["data"][0]["label"], "G54");
}

#[tokio::test]
async fn test_work_zero_range_falls_back_to_single_axes() {
    let (app, driver) = connected_app();
    driver.fail_always(
        |c| matches!(c, Call::WorkZero { axis: -1, .. }),
        DriverError::Code(ReturnCode::LENGTH),
    );

    let body = get(&app, "/api/focas/work-zero-offsets-range/0/0").await;

    assert_eq!(body["data"][0]["label"], "EXT");
    assert_eq!(
        body["data"][0]["axes"],
        json!([
            { "axis": 1, "value": 1 },
            { "axis": 2, "value": 2 },
            { "axis": 3, "value": 3 },
        ])
    );
    assert_eq!(
        driver.count(|c| matches!(c, Call::WorkZero { axis: 1..=3, length: 8, .. })),
        3
    );
}

#[tokio::test]
async fn test_work_zero_offset_single_and_with_length() {
    let (app, driver) = connected_app();

    let body = get(&app, "/api/focas/work-zero-offset/1/2").await;
    assert_eq!(body["data"]["axes"], json!([{ "axis": 2, "value": 1002 }]));

    let body = get(&app, "/api/focas/work-zero-offset/1/-1/16").await;
    assert_eq!(body["data"]["axes"].as_array().unwrap().len(), 3);

    let body = post(
        &app,
        "/api/focas/work-zero-offset",
        json!({ "number": 7, "axis": 1 }),
    )
    .await;
    assert_eq!(body["data"]["label"], "G54.1 P1");

    assert_eq!(
        driver.calls(),
        vec![
            Call::WorkZero {
                handle: Handle(1),
                number: 1,
                axis: 2,
                length: 8,
            },
            Call::WorkZero {
                handle: Handle(1),
                number: 1,
                axis: -1,
                length: 16,
            },
            Call::WorkZero {
                handle: Handle(1),
                number: 7,
                axis: 1,
                length: 8,
            },
        ]
    );
}

#[tokio::test]
async fn test_work_zero_range_single() {
    let (app, driver) = connected_app();

    let body = get(&app, "/api/focas/work-zero-offsets-range-single/-1/1/2").await;

    let systems = body["data"].as_array().unwrap();
    assert_eq!(systems.len(), 2);
    assert_eq!(systems[1]["axes"][2], json!({ "axis": 3, "value": 2003 }));
    assert_eq!(
        driver.calls(),
        vec![Call::WorkZeroRange {
            handle: Handle(1),
            start: 1,
            axis: -1,
            end: 2,
            length: 30,
        }]
    );
}

#[tokio::test]
async fn test_work_zero_range_single_rejects_bad_ranges() {
    let (app, driver) = connected_app();

    let body = post(
        &app,
        "/api/focas/work-zero-offsets-range-single",
        json!({ "axis": 1, "startNumber": 3, "endNumber": 1 }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));

    let body = get(&app, "/api/focas/work-zero-offsets-range-single/1/1/8").await;
    assert_eq!(body["success"], false);

    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_oversized_record_length_is_rejected() {
    let (app, driver) = connected_app();

    let body = post(
        &app,
        "/api/focas/work-zero-offset",
        json!({ "number": 1, "axis": -1, "length": 4000 }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));

    let body = get(&app, "/api/focas/work-zero-offset/1/-1/4000").await;
    assert_eq!(body["success"], false);

    let body = post(
        &app,
        "/api/focas/work-zero-offsets-range-single",
        json!({ "axis": -1, "startNumber": 1, "endNumber": 2, "length": 30000 }),
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));

    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_write_macro() {
    let (app, driver) = connected_app();

    let body = post(
        &app,
        "/api/focas/write-macro",
        json!({ "number": 700, "mcrVal": 1 }),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "Macro #700 set to 1");
    assert_eq!(
        driver.calls(),
        vec![Call::WriteMacro {
            handle: Handle(1),
            number: 700,
            length: 10,
            value: 1,
            decimals: 0,
        }]
    );
}

#[tokio::test]
async fn test_write_macro_protected() {
    let (app, driver) = connected_app();
    driver.fail_once(
        |c| matches!(c, Call::WriteMacro { .. }),
        DriverError::Code(ReturnCode::PROT),
    );

    let body = post(
        &app,
        "/api/focas/write-macro",
        json!({ "number": 500, "mcrVal": 12345, "decVal": 3 }),
    )
    .await;

    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Write protection");
    assert_eq!(body["errorCode"], 7);
}

#[tokio::test]
async fn test_disconnect_twice() {
    let (app, driver) = connected_app();

    let body = post_raw(&app, "/api/focas/disconnect", Body::empty()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "Disconnected");
    assert_eq!(driver.calls(), vec![Call::Disconnect(Handle(1))]);

    let body = post_raw(&app, "/api/focas/disconnect", Body::empty()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Not connected");
}
