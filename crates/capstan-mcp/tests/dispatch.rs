//! Capability dispatch, the JSON-RPC surface, and the stdio transport.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::BufReader;

use capstan_mcp::protocol::ProtocolHandler;
use capstan_mcp::session::SessionStore;
use capstan_mcp::transport::StdioTransport;
use capstan_mcp::types::*;
use capstan_mcp::{McpServer, ServerConfig};

// ─────────────────────── helpers ───────────────────────

fn raw(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

/// Handler over the built-in capabilities with one registered session "s1".
async fn builtin_handler() -> ProtocolHandler {
    let handler = ProtocolHandler::new(
        McpServer::builtin(ServerConfig::default()),
        SessionStore::new(),
    );
    handler.sessions().insert("s1").await;
    handler
}

fn sum_definition() -> ToolDefinition {
    ToolDefinition {
        name: "sum".to_string(),
        description: None,
        input_schema: json!({ "type": "object" }),
    }
}

/// Build a JSON-RPC request.
fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

fn init_request() -> Value {
    mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message("s1", parsed).await
}

async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

// ═══════════════════════════════════════════════════════
// TOOLS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_call_unregistered_tool() {
    let handler = builtin_handler().await;
    let before = handler.server().tools().list_tools();

    let err = handler
        .handle_request("s1", "tools/call", &raw(json!({ "name": "sum", "arguments": {} })))
        .await
        .unwrap_err();

    match err {
        McpError::HandlerNotFound { kind, ref key } => {
            assert_eq!(kind, CapabilityKind::Tool);
            assert_eq!(key, "sum");
        }
        ref other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("sum"));
    assert_eq!(handler.server().tools().list_tools(), before);
    assert!(!handler.server().tools().contains("sum"));
}

#[tokio::test]
async fn test_call_registered_tool_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let other_calls = Arc::new(AtomicUsize::new(0));
    let other_counter = other_calls.clone();

    let server = McpServer::builder(ServerConfig::default())
        .tool(sum_definition(), move |params: ToolCallParams| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let args = params.arguments.unwrap_or_default();
                let sum = args["a"].as_i64().unwrap_or(0) + args["b"].as_i64().unwrap_or(0);
                Ok(ToolCallResult::text(sum.to_string()))
            }
        })
        .tool(
            ToolDefinition {
                name: "noop".to_string(),
                description: None,
                input_schema: json!({ "type": "object" }),
            },
            move |_params: ToolCallParams| {
                let counter = other_counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(ToolCallResult::text(""))
                }
            },
        )
        .build();
    let handler = ProtocolHandler::new(server, SessionStore::new());
    handler.sessions().insert("s1").await;

    let result = handler
        .handle_request(
            "s1",
            "tools/call",
            &raw(json!({ "name": "sum", "arguments": { "a": 2, "b": 3 } })),
        )
        .await
        .unwrap();

    assert_eq!(result, ServerResult::ToolCall(ToolCallResult::text("5")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(other_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_handler_error_propagates_verbatim() {
    let server = McpServer::builder(ServerConfig::default())
        .tool(sum_definition(), |_params: ToolCallParams| async {
            Err(McpError::InternalError("disk on fire".to_string()))
        })
        .build();
    let handler = ProtocolHandler::new(server, SessionStore::new());
    handler.sessions().insert("s1").await;

    let err = handler
        .handle_request("s1", "tools/call", &raw(json!({ "name": "sum" })))
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::InternalError(ref m) if m == "disk on fire"));
}

#[tokio::test]
async fn test_builtin_tools() {
    let handler = builtin_handler().await;

    let result = handler
        .handle_request("s1", "tools/list", b"")
        .await
        .unwrap();
    let ServerResult::ToolList(list) = result else {
        panic!("expected tool list");
    };
    let names: Vec<&str> = list.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["echo", "add"]);
    assert!(list.next_cursor.is_none());

    let result = handler
        .handle_request(
            "s1",
            "tools/call",
            &raw(json!({ "name": "echo", "arguments": { "text": "hello" } })),
        )
        .await
        .unwrap();
    assert_eq!(result, ServerResult::ToolCall(ToolCallResult::text("hello")));
}

#[tokio::test]
async fn test_list_ignores_cursor() {
    let handler = builtin_handler().await;
    let with_cursor = handler
        .handle_request("s1", "tools/list", &raw(json!({ "cursor": "page-2" })))
        .await
        .unwrap();
    let without = handler.handle_request("s1", "tools/list", b"").await.unwrap();
    assert_eq!(with_cursor, without);
}

// ═══════════════════════════════════════════════════════
// PROMPTS & RESOURCES
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_prompts() {
    let handler = builtin_handler().await;

    let ServerResult::PromptList(list) = handler
        .handle_request("s1", "prompts/list", b"{}")
        .await
        .unwrap()
    else {
        panic!("expected prompt list");
    };
    assert_eq!(list.prompts.len(), 1);
    assert_eq!(list.prompts[0].name, "greet");

    let ServerResult::PromptGet(prompt) = handler
        .handle_request(
            "s1",
            "prompts/get",
            &raw(json!({ "name": "greet", "arguments": { "name": "Grace" } })),
        )
        .await
        .unwrap()
    else {
        panic!("expected prompt");
    };
    assert_eq!(prompt.messages.len(), 1);

    let err = handler
        .handle_request("s1", "prompts/get", &raw(json!({ "name": "farewell" })))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        McpError::HandlerNotFound { kind: CapabilityKind::Prompt, ref key } if key == "farewell"
    ));
}

#[tokio::test]
async fn test_resources() {
    let handler = builtin_handler().await;

    let ServerResult::ResourceList(list) = handler
        .handle_request("s1", "resources/list", b"")
        .await
        .unwrap()
    else {
        panic!("expected resource list");
    };
    assert_eq!(list.resources[0].uri, "memo://readme");

    let ServerResult::ResourceTemplateList(templates) = handler
        .handle_request("s1", "resources/templates/list", b"")
        .await
        .unwrap()
    else {
        panic!("expected template list");
    };
    assert_eq!(templates.resource_templates[0].uri_template, "memo://notes/{id}");

    let ServerResult::ResourceRead(read) = handler
        .handle_request("s1", "resources/read", &raw(json!({ "uri": "memo://notes/welcome" })))
        .await
        .unwrap()
    else {
        panic!("expected resource contents");
    };
    assert_eq!(read.contents[0].uri, "memo://notes/welcome");
    assert!(read.contents[0].text.as_deref().unwrap().starts_with("Welcome"));

    let err = handler
        .handle_request("s1", "resources/read", &raw(json!({ "uri": "memo://notes/missing" })))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        McpError::HandlerNotFound { kind: CapabilityKind::Resource, ref key } if key == "memo://notes/missing"
    ));
}

// ═══════════════════════════════════════════════════════
// COMPLETIONS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_complete_prompt_argument() {
    let handler = builtin_handler().await;
    let ServerResult::Complete(result) = handler
        .handle_request(
            "s1",
            "completion/complete",
            &raw(json!({
                "ref": { "type": "ref/prompt", "name": "greet" },
                "argument": { "name": "name", "value": "g" }
            })),
        )
        .await
        .unwrap()
    else {
        panic!("expected completion");
    };
    assert_eq!(result.completion.values, vec!["Grace"]);
}

#[tokio::test]
async fn test_complete_resource_template_argument() {
    let handler = builtin_handler().await;
    let ServerResult::Complete(result) = handler
        .handle_request(
            "s1",
            "completion/complete",
            &raw(json!({
                "ref": { "type": "ref/resource", "uri": "memo://notes/{id}" },
                "argument": { "name": "id", "value": "" }
            })),
        )
        .await
        .unwrap()
    else {
        panic!("expected completion");
    };
    assert_eq!(result.completion.values, vec!["welcome", "handshake"]);
}

#[tokio::test]
async fn test_complete_unknown_reference_type() {
    let handler = builtin_handler().await;
    let err = handler
        .handle_request(
            "s1",
            "completion/complete",
            &raw(json!({
                "ref": { "type": "ref/tool", "name": "greet" },
                "argument": { "name": "name", "value": "" }
            })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::InvalidCompletionReference));
}

#[tokio::test]
async fn test_complete_unregistered_reference() {
    let handler = builtin_handler().await;
    let err = handler
        .handle_request(
            "s1",
            "completion/complete",
            &raw(json!({
                "ref": { "type": "ref/prompt", "name": "farewell" },
                "argument": { "name": "name", "value": "" }
            })),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        McpError::HandlerNotFound { kind: CapabilityKind::Completion, ref key } if key == "ref/prompt/farewell"
    ));
}

// ═══════════════════════════════════════════════════════
// APPLICATION CAPABILITIES
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_builder_registers_application_capabilities() {
    let server = McpServer::builder(ServerConfig::default())
        .prompt(
            PromptDefinition {
                name: "summarize".to_string(),
                description: None,
                arguments: None,
            },
            |params: PromptGetParams| async move {
                Ok(PromptGetResult {
                    description: Some(format!("prompt {}", params.name)),
                    messages: vec![PromptMessage {
                        role: "user".to_string(),
                        content: ToolContent::Text {
                            text: "Summarize the document.".to_string(),
                        },
                    }],
                })
            },
        )
        .resource(
            ResourceDefinition {
                uri: "db://status".to_string(),
                name: "Status".to_string(),
                description: None,
                mime_type: Some("text/plain".to_string()),
            },
            |params: ResourceReadParams| async move {
                Ok(ReadResourceResult {
                    contents: vec![ResourceContent::text(params.uri, "text/plain", "up")],
                })
            },
        )
        .resource_template(ResourceTemplateDefinition {
            uri_template: "db://tables/{name}".to_string(),
            name: "Table".to_string(),
            description: None,
            mime_type: None,
        })
        .resource_reader("db://tables/users", |params: ResourceReadParams| async move {
            Ok(ReadResourceResult {
                contents: vec![ResourceContent::text(params.uri, "text/plain", "3 rows")],
            })
        })
        .prompt_completion("summarize", |_params: CompleteParams| async move {
            Ok(CompleteResult {
                completion: Completion {
                    values: vec!["short".to_string()],
                    total: Some(1),
                    has_more: Some(false),
                },
            })
        })
        .resource_completion("db://tables/{name}", |params: CompleteParams| async move {
            Ok(CompleteResult {
                completion: Completion {
                    values: vec![format!("{}sers", params.argument.value)],
                    total: Some(1),
                    has_more: Some(false),
                },
            })
        })
        .build();
    let handler = ProtocolHandler::new(server, SessionStore::new());
    handler.sessions().insert("s1").await;

    let ServerResult::PromptGet(prompt) = handler
        .handle_request("s1", "prompts/get", &raw(json!({ "name": "summarize" })))
        .await
        .unwrap()
    else {
        panic!("expected prompt");
    };
    assert_eq!(prompt.description.as_deref(), Some("prompt summarize"));

    let ServerResult::ResourceList(list) = handler
        .handle_request("s1", "resources/list", b"")
        .await
        .unwrap()
    else {
        panic!("expected resource list");
    };
    let uris: Vec<&str> = list.resources.iter().map(|r| r.uri.as_str()).collect();
    assert_eq!(uris, vec!["db://status"]);

    let ServerResult::ResourceTemplateList(templates) = handler
        .handle_request("s1", "resources/templates/list", b"")
        .await
        .unwrap()
    else {
        panic!("expected template list");
    };
    assert_eq!(templates.resource_templates[0].uri_template, "db://tables/{name}");

    for (uri, text) in [("db://status", "up"), ("db://tables/users", "3 rows")] {
        let ServerResult::ResourceRead(read) = handler
            .handle_request("s1", "resources/read", &raw(json!({ "uri": uri })))
            .await
            .unwrap()
        else {
            panic!("expected resource contents");
        };
        assert_eq!(read.contents[0].text.as_deref(), Some(text));
    }

    let ServerResult::Complete(prompt_completion) = handler
        .handle_request(
            "s1",
            "completion/complete",
            &raw(json!({
                "ref": { "type": "ref/prompt", "name": "summarize" },
                "argument": { "name": "length", "value": "" }
            })),
        )
        .await
        .unwrap()
    else {
        panic!("expected completion");
    };
    assert_eq!(prompt_completion.completion.values, vec!["short"]);

    let ServerResult::Complete(resource_completion) = handler
        .handle_request(
            "s1",
            "completion/complete",
            &raw(json!({
                "ref": { "type": "ref/resource", "uri": "db://tables/{name}" },
                "argument": { "name": "name", "value": "u" }
            })),
        )
        .await
        .unwrap()
    else {
        panic!("expected completion");
    };
    assert_eq!(resource_completion.completion.values, vec!["users"]);

    assert!(handler.server().tools().list_tools().is_empty());
}

// ═══════════════════════════════════════════════════════
// STATIC METHODS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_set_log_level_is_accepted() {
    let handler = builtin_handler().await;
    let result = handler
        .handle_request("s1", "logging/setLevel", &raw(json!({ "level": "warning" })))
        .await
        .unwrap();
    assert_eq!(result, ServerResult::Empty(EmptyResult::default()));

    let err = handler
        .handle_request("s1", "logging/setLevel", &raw(json!({ "level": "loud" })))
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::MalformedParams { .. }));
}

#[tokio::test]
async fn test_cancelled_notification() {
    let handler = builtin_handler().await;
    let params = raw(json!({ "requestId": 7, "reason": "user aborted" }));

    handler
        .handle_notification("s1", "notifications/cancelled", &params)
        .await
        .unwrap();
    handler
        .handle_notification("s1", "$/cancelRequest", &params)
        .await
        .unwrap();

    let err = handler
        .handle_notification("ghost", "notifications/cancelled", &params)
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::SessionMissing(_)));

    let err = handler
        .handle_notification("s1", "notifications/progress", b"")
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::MethodNotFound(_)));
}

#[tokio::test]
async fn test_unknown_method() {
    let handler = builtin_handler().await;
    let err = handler
        .handle_request("s1", "tools/delete", b"")
        .await
        .unwrap_err();
    assert!(matches!(err, McpError::MethodNotFound(ref m) if m == "tools/delete"));
}

// ═══════════════════════════════════════════════════════
// JSON-RPC SURFACE
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_json_rpc_handshake() {
    let handler = builtin_handler().await;

    let resp = send_unwrap(&handler, init_request()).await;
    assert_eq!(resp["jsonrpc"], "2.0");
    assert_eq!(resp["id"], 0);
    assert_eq!(resp["result"]["protocolVersion"], MCP_VERSION);
    assert_eq!(resp["result"]["capabilities"]["resources"]["subscribe"], true);
    assert_eq!(resp["result"]["serverInfo"]["name"], SERVER_NAME);

    let notif = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    assert!(send(&handler, notif).await.is_none());

    let session = handler.sessions().get("s1").await.unwrap();
    assert!(session.is_ready());
}

#[tokio::test]
async fn test_json_rpc_out_of_order_notification_has_no_response() {
    let handler = builtin_handler().await;
    let notif = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    assert!(send(&handler, notif).await.is_none());
    assert!(!handler.sessions().get("s1").await.unwrap().is_ready());
}

#[tokio::test]
async fn test_json_rpc_error_codes() {
    let handler = builtin_handler().await;

    let resp = send_unwrap(&handler, mcp_request(1, "tools/call", json!({ "name": "sum" }))).await;
    assert_eq!(resp["id"], 1);
    assert_eq!(resp["error"]["code"], -32803);

    let resp = send_unwrap(&handler, mcp_request(2, "resources/subscribe", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32602);

    let resp = send_unwrap(&handler, mcp_request(3, "shutdown", json!(null))).await;
    assert_eq!(resp["error"]["code"], -32601);

    let resp = send_unwrap(
        &handler,
        json!({ "jsonrpc": "1.0", "id": 4, "method": "ping" }),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32600);
}

#[tokio::test]
async fn test_json_rpc_unknown_session() {
    let handler = builtin_handler().await;
    let parsed: JsonRpcMessage =
        serde_json::from_value(mcp_request(5, "tools/list", json!({}))).unwrap();
    let resp = handler.handle_message("ghost", parsed).await.unwrap();
    assert_eq!(resp["error"]["code"], -32851);
}

#[tokio::test]
async fn test_json_rpc_ping_without_params() {
    let handler = builtin_handler().await;
    let resp = send_unwrap(&handler, json!({ "jsonrpc": "2.0", "id": "p", "method": "ping" })).await;
    assert_eq!(resp["id"], "p");
    assert_eq!(resp["result"], json!({}));
}

#[tokio::test]
async fn test_json_rpc_wrong_version_notification_ignored() {
    let handler = builtin_handler().await;
    send_unwrap(&handler, init_request()).await;

    let notif = json!({ "jsonrpc": "1.0", "method": "notifications/initialized" });
    assert!(send(&handler, notif).await.is_none());
    let session = handler.sessions().get("s1").await.unwrap();
    assert!(!session.is_ready());
    assert!(session.received_init_request());
}

#[tokio::test]
async fn test_json_rpc_positional_params_rejected() {
    let handler = builtin_handler().await;
    let resp = send_unwrap(
        &handler,
        mcp_request(6, "resources/subscribe", json!(["file:///a"])),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);

    let session = handler.sessions().get("s1").await.unwrap();
    assert!(session.subscriptions().await.is_empty());
}

// ═══════════════════════════════════════════════════════
// TRANSPORT
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_stdio_session_lifecycle() {
    let sessions = SessionStore::new();
    let handler = ProtocolHandler::new(McpServer::builtin(ServerConfig::default()), sessions.clone());
    let transport = StdioTransport::new(handler);

    let input = [
        init_request().to_string(),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
        String::new(),
        "{\"broken\":".to_string(),
        mcp_request(1, "tools/call", json!({ "name": "echo", "arguments": { "text": "hi" } }))
            .to_string(),
    ]
    .join("\n")
        + "\n";

    let mut output = Vec::new();
    transport
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 3, "initialize, parse error, tools/call");
    assert_eq!(lines[0]["result"]["protocolVersion"], MCP_VERSION);
    assert_eq!(lines[1]["error"]["code"], -32700);
    assert_eq!(lines[1]["id"], Value::Null);
    assert_eq!(lines[2]["result"]["content"][0]["text"], "hi");

    assert!(sessions.is_empty().await, "session is dropped at EOF");
}

#[tokio::test]
async fn test_stdio_answers_every_request_id() {
    let handler = ProtocolHandler::new(McpServer::builtin(ServerConfig::default()), SessionStore::new());
    let transport = StdioTransport::new(handler);

    let input = [
        r#"{"jsonrpc":"2.0","id":1.5,"method":"ping"}"#,
        r#"{"jsonrpc":"2.0","id":18446744073709551615,"method":"ping"}"#,
        r#"{"jsonrpc":"2.0","id":{"x":1},"method":"ping"}"#,
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
    ]
    .join("\n")
        + "\n";

    let mut output = Vec::new();
    transport
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 4, "one response per request");
    assert_eq!(lines[0]["id"], json!(1.5));
    assert_eq!(lines[0]["result"], json!({}));
    assert_eq!(lines[1]["id"], json!(18446744073709551615u64));
    assert_eq!(lines[1]["result"], json!({}));
    assert_eq!(lines[2]["id"], Value::Null);
    assert_eq!(lines[2]["error"]["code"], -32600);
    assert_eq!(lines[3]["id"], 1);
    assert_eq!(lines[3]["result"], json!({}));
}
