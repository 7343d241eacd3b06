use acomo_test_support::{KillOnDrop, write_document};
use anyhow::Context as _;
use serde_json::{Value, json};
use std::io::{BufRead as _, BufReader, Write as _};
use std::process::{ChildStdin, Command, Stdio};
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;
use tempfile::tempdir;

struct StdioSession {
    stdin: ChildStdin,
    lines: Receiver<String>,
}

impl StdioSession {
    fn send(&mut self, msg: &Value) -> anyhow::Result<()> {
        writeln!(self.stdin, "{}", serde_json::to_string(msg)?)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Wait for the response carrying `id`, skipping notifications.
    fn response(&self, id: u64) -> anyhow::Result<Value> {
        loop {
            let line = self
                .lines
                .recv_timeout(Duration::from_secs(10))
                .context("timed out waiting for a response")?;
            let msg: Value = serde_json::from_str(&line).context("parse response line")?;
            if msg.get("id") == Some(&json!(id)) {
                return Ok(msg);
            }
        }
    }

    fn request(&mut self, id: u64, method: &str, params: Value) -> anyhow::Result<Value> {
        self.send(&json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }))?;
        self.response(id)
    }
}

fn tool_text(resp: &Value) -> Option<&str> {
    resp.get("result")?
        .get("content")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
}

#[test]
fn lists_tools_and_generates_a_template_over_stdio() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let doc = write_document(
        dir.path(),
        &json!({
            "openapi": "3.0.0",
            "paths": {
                "/items/{id}": {
                    "put": {
                        "operationId": "updateItem",
                        "parameters": [{ "name": "id", "in": "path" }],
                        "requestBody": { "content": { "application/json": {
                            "schema": { "type": "object", "properties": { "done": { "type": "boolean" } } }
                        }}}
                    }
                }
            }
        }),
    )?;

    let mut child = Command::new(env!("CARGO_BIN_EXE_acomo-mcp"))
        .env("ACOMO_OPENAPI_PATH", &doc)
        .env_remove("ACOMO_TENANT_ID")
        .env_remove("ACOMO_ACCESS_TOKEN")
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn acomo-mcp")?;

    let stdin = child.stdin.take().context("child stdin")?;
    let stdout = child.stdout.take().context("child stdout")?;
    let _child = KillOnDrop(child);

    let (tx, rx) = channel();
    std::thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    let mut session = StdioSession { stdin, lines: rx };

    let init = session.request(
        1,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "stdio-roundtrip-test", "version": "0" }
        }),
    )?;
    assert!(init.get("result").is_some(), "initialize failed: {init}");
    session.send(&json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))?;

    let tools = session.request(2, "tools/list", json!({}))?;
    let names: Vec<&str> = tools["result"]["tools"]
        .as_array()
        .context("tools/list missing result.tools")?
        .iter()
        .filter_map(|t| t.get("name").and_then(Value::as_str))
        .collect();
    for expected in [
        "health",
        "listOperations",
        "describeOperation",
        "operationSchemas",
        "generateRequestTemplate",
        "listComponents",
        "describeComponent",
        "callOperation",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}: {names:?}");
    }
    let call_description = tools["result"]["tools"]
        .as_array()
        .and_then(|tools| tools.iter().find(|t| t["name"] == "callOperation"))
        .and_then(|t| t["description"].as_str())
        .context("callOperation description")?;
    assert!(call_description.contains("ACOMO_ENABLE_MUTATION_TOOLS=true"));

    let tmpl = session.request(
        3,
        "tools/call",
        json!({ "name": "generateRequestTemplate", "arguments": { "operationId": "updateItem" } }),
    )?;
    let body: Value = serde_json::from_str(tool_text(&tmpl).context("template text")?)?;
    assert_eq!(body["pathParams"], json!({ "id": "<id>" }));
    assert_eq!(body["body"], json!({ "done": false }));

    let call = session.request(
        4,
        "tools/call",
        json!({ "name": "callOperation", "arguments": { "operationId": "updateItem" } }),
    )?;
    assert_eq!(call["result"]["isError"], json!(true));
    let text = tool_text(&call).context("callOperation text")?;
    assert!(text.contains("ACOMO_TENANT_ID"), "{text}");

    let guide = session.request(5, "resources/read", json!({ "uri": "guide://auth" }))?;
    let guide_text = guide["result"]["contents"][0]["text"]
        .as_str()
        .context("guide text")?;
    assert!(guide_text.contains("x-tenant-id"));

    Ok(())
}
