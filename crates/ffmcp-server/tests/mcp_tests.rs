//! JSON-RPC behavior of the MCP dispatcher.

mod common;

use serde_json::{json, Value};

use common::TestServer;

async fn call(server: &TestServer, message: Value) -> Value {
    let response = server
        .mcp
        .handle_message(&message.to_string())
        .await
        .expect("request should be answered");
    serde_json::to_value(response).unwrap()
}

fn request(id: i64, method: &str, params: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params })
}

#[tokio::test]
async fn test_initialize_reports_capabilities() {
    let server = TestServer::new();
    let response = call(
        &server,
        request(1, "initialize", json!({ "protocolVersion": "2025-03-26" })),
    )
    .await;

    let result = &response["result"];
    assert_eq!(result["protocolVersion"], "2025-03-26");
    assert_eq!(result["serverInfo"]["name"], "ffmcp");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
}

#[tokio::test]
async fn test_tools_list_advertises_all_tools() {
    let server = TestServer::new();
    let response = call(&server, request(2, "tools/list", json!({}))).await;

    let tools = response["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "ffmpeg_version",
            "ffmpeg_convert_video",
            "ffmpeg_extract_audio",
            "ffmpeg_create_thumbnail",
            "ffmpeg_remove_watermark",
            "ffmpeg_get_video_info",
            "ffmpeg_concat_videos",
        ]
    );
    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_unknown_method() {
    let server = TestServer::new();
    let response = call(&server, request(3, "sampling/createMessage", json!({}))).await;
    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["id"], 3);
}

#[tokio::test]
async fn test_malformed_json() {
    let server = TestServer::new();
    let response = server.mcp.handle_message("{not json").await.unwrap();
    let response = serde_json::to_value(response).unwrap();
    assert_eq!(response["error"]["code"], -32700);
    assert!(response["id"].is_null());
}

#[tokio::test]
async fn test_unknown_tool_is_invalid_params() {
    let server = TestServer::new();
    let response = call(
        &server,
        request(4, "tools/call", json!({ "name": "ffmpeg_explode", "arguments": {} })),
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);
    assert!(server.runner.calls().is_empty());
}

#[tokio::test]
async fn test_tool_failure_is_reported_in_result() {
    let server = TestServer::new();
    let response = call(
        &server,
        request(
            5,
            "tools/call",
            json!({
                "name": "ffmpeg_get_video_info",
                "arguments": { "video_path": "/definitely/not/here.mp4" }
            }),
        ),
    )
    .await;

    let result = &response["result"];
    assert_eq!(result["isError"], true);
    assert_eq!(result["structuredContent"]["success"], false);
    assert!(server.runner.calls().is_empty());
}

#[tokio::test]
async fn test_resources_list_and_read() {
    let server = TestServer::new();
    server.publish("clip.mp4", b"video bytes");
    server.publish("notes.txt", b"text");

    let listed = call(&server, request(6, "resources/list", json!({}))).await;
    let resources = listed["result"]["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["uri"], "ffmpeg://resources/clip.mp4");
    assert_eq!(resources[0]["mimeType"], "video/mp4");

    let read = call(
        &server,
        request(7, "resources/read", json!({ "uri": "ffmpeg://resources/clip.mp4" })),
    )
    .await;
    let content = &read["result"]["contents"][0];
    assert_eq!(content["mimeType"], "video/mp4");
    assert_eq!(content["blob"], "dmlkZW8gYnl0ZXM=");
}

#[tokio::test]
async fn test_resource_read_unsupported_type_returns_descriptor() {
    let server = TestServer::new();
    server.publish("notes.txt", b"text");

    let read = call(
        &server,
        request(8, "resources/read", json!({ "uri": "ffmpeg://resources/notes.txt" })),
    )
    .await;
    let content = &read["result"]["contents"][0];
    assert_eq!(content["mimeType"], "application/json");

    let descriptor: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
    assert!(descriptor["error"].as_str().unwrap().contains("Unsupported"));
}

#[tokio::test]
async fn test_resource_read_foreign_uri() {
    let server = TestServer::new();
    let read = call(
        &server,
        request(9, "resources/read", json!({ "uri": "file:///etc/passwd" })),
    )
    .await;
    assert_eq!(read["error"]["code"], -32602);
}

#[tokio::test]
async fn test_resource_templates() {
    let server = TestServer::new();
    let response = call(&server, request(10, "resources/templates/list", json!({}))).await;
    assert_eq!(
        response["result"]["resourceTemplates"][0]["uriTemplate"],
        "ffmpeg://resources/{name}"
    );
}

#[tokio::test]
async fn test_null_id_request_is_answered() {
    let server = TestServer::new();
    let message = json!({ "jsonrpc": "2.0", "id": null, "method": "ping" });
    let response = call(&server, message).await;
    assert!(response["id"].is_null());
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_notification_gets_no_response() {
    let server = TestServer::new();
    let message = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    assert!(server.mcp.handle_message(&message.to_string()).await.is_none());
}
