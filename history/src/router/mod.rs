// Router module
use crate::editor::Editor;
use crate::error::{HistoryError, OpenError, SaveError};
use crate::history::storage::StoragePort;
use crate::history::FileRef;
use crate::io::Fs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const MALFORMED_DATA: i32 = -32001;
pub const STORAGE_WRITE_FAILURE: i32 = -32002;
pub const OPEN_FAILED: i32 = -32003;

const METHODS: &[&str] = &[
    "history/list",
    "history/open",
    "history/missing",
    "history/replace",
    "history/remove",
    "history/relabel",
    "file/open",
    "file/save",
    "config/get",
];

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
    pub id: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<Value>,
    pub id: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyParams {
    #[serde(alias = "$path")]
    directory_path: String,
    name: String,
}

#[derive(Deserialize)]
struct OpenParams {
    #[serde(alias = "$path")]
    path: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveParams {
    filename: String,
    file_content: Value,
}

#[derive(Deserialize)]
struct RemoveParams {
    index: usize,
}

/// `history/replace` takes the list itself or `{ "fileHistory": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReplaceParams {
    List(Vec<FileRef>),
    #[serde(rename_all = "camelCase")]
    Wrapped { file_history: Vec<FileRef> },
}

impl ReplaceParams {
    fn into_list(self) -> Vec<FileRef> {
        match self {
            ReplaceParams::List(list) => list,
            ReplaceParams::Wrapped { file_history } => file_history,
        }
    }
}

pub struct Router<F: Fs, S: StoragePort> {
    editor: Arc<Editor<F, S>>,
}

impl<F: Fs, S: StoragePort> Router<F, S> {
    pub fn new(editor: Arc<Editor<F, S>>) -> Self {
        Self { editor }
    }

    pub fn handle_request(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();
        if req.jsonrpc != "2.0" {
            return json_rpc_error(id, INVALID_REQUEST, "Invalid request: jsonrpc must be \"2.0\"");
        }
        let history = self.editor.history();

        match req.method.as_str() {
            "initialize" => json_rpc_ok(
                id,
                json!({
                    "capabilities": { "methods": METHODS },
                    "serverInfo": { "name": "jsonedit-server", "version": env!("CARGO_PKG_VERSION") }
                }),
            ),
            "history/list" => match history.get_history() {
                Ok(list) => json_rpc_ok(id, json!({ "fileHistory": list })),
                Err(e) => history_error(id, &e),
            },
            "history/open" => {
                let p: KeyParams = match parse_params(req) {
                    Ok(p) => p,
                    Err(resp) => return resp,
                };
                match history.open_file(&p.directory_path, &p.name) {
                    Ok(opened) => json_rpc_ok(
                        id,
                        json!({ "fileHistory": opened.history, "entry": opened.entry }),
                    ),
                    Err(e) => history_error(id, &e),
                }
            }
            "history/missing" => {
                let p: KeyParams = match parse_params(req) {
                    Ok(p) => p,
                    Err(resp) => return resp,
                };
                match history.report_missing(&p.directory_path, &p.name) {
                    Ok(list) => json_rpc_ok(id, json!({ "fileHistory": list })),
                    Err(e) => history_error(id, &e),
                }
            }
            "history/replace" => {
                let p: ReplaceParams = match parse_params(req) {
                    Ok(p) => p,
                    Err(resp) => return resp,
                };
                match history.replace_history(&p.into_list()) {
                    Ok(()) => json_rpc_ok(id, json!({ "ok": true })),
                    Err(e) => history_error(id, &e),
                }
            }
            "history/remove" => {
                let p: RemoveParams = match parse_params(req) {
                    Ok(p) => p,
                    Err(resp) => return resp,
                };
                match history.remove(p.index) {
                    Ok(list) => json_rpc_ok(id, json!({ "fileHistory": list })),
                    Err(e) => history_error(id, &e),
                }
            }
            "history/relabel" => match history.relabel() {
                Ok(list) => json_rpc_ok(id, json!({ "fileHistory": list })),
                Err(e) => history_error(id, &e),
            },
            "file/open" => {
                let p: OpenParams = match parse_params(req) {
                    Ok(p) => p,
                    Err(resp) => return resp,
                };
                match self.editor.open(&p.path, &p.name) {
                    Ok(doc) => match serde_json::to_value(&doc) {
                        Ok(v) => json_rpc_ok(id, v),
                        Err(e) => json_rpc_error(id, INTERNAL_ERROR, &e.to_string()),
                    },
                    Err(e) => open_error(id, &e),
                }
            }
            "file/save" => {
                let p: SaveParams = match parse_params(req) {
                    Ok(p) => p,
                    Err(resp) => return resp,
                };
                match self.editor.save(&p.filename, &p.file_content) {
                    Ok(()) => json_rpc_ok(id, json!({ "message": "File saved successfully" })),
                    Err(e @ SaveError::EmptyFilename) => {
                        json_rpc_error(id, INVALID_PARAMS, &e.to_string())
                    }
                    Err(e) => json_rpc_error(id, INTERNAL_ERROR, &e.to_string()),
                }
            }
            "config/get" => json_rpc_ok(id, json!(history.config())),
            _ => json_rpc_error(
                id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", req.method),
            ),
        }
    }
}

fn parse_params<T: DeserializeOwned>(req: &JsonRpcRequest) -> Result<T, JsonRpcResponse> {
    let params = req.params.clone().unwrap_or(Value::Null);
    serde_json::from_value(params).map_err(|e| {
        json_rpc_error(
            req.id.clone(),
            INVALID_PARAMS,
            &format!("Invalid params: {}", e),
        )
    })
}

fn history_error(id: Option<Value>, err: &HistoryError) -> JsonRpcResponse {
    log::error!("{}", err);
    if err.is_malformed() {
        return json_rpc_error_with_data(
            id,
            MALFORMED_DATA,
            &err.to_string(),
            json!({ "kind": "malformed_data" }),
        );
    }
    match err.unsaved_history() {
        Some(unsaved) => json_rpc_error_with_data(
            id,
            STORAGE_WRITE_FAILURE,
            &err.to_string(),
            json!({ "kind": "storage_write_failure", "fileHistory": unsaved }),
        ),
        None => json_rpc_error(id, INTERNAL_ERROR, &err.to_string()),
    }
}

fn open_error(id: Option<Value>, err: &OpenError) -> JsonRpcResponse {
    match err {
        OpenError::History(inner) => history_error(id, inner),
        _ => json_rpc_error_with_data(
            id,
            OPEN_FAILED,
            &err.to_string(),
            json!({ "kind": "open_failed", "fileHistory": err.history().unwrap_or_default() }),
        ),
    }
}

fn json_rpc_ok(id: Option<Value>, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        result: Some(result),
        error: None,
        id,
    }
}

fn json_rpc_error(id: Option<Value>, code: i32, message: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(json!({ "code": code, "message": message })),
        id,
    }
}

fn json_rpc_error_with_data(
    id: Option<Value>,
    code: i32,
    message: &str,
    data: Value,
) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(json!({ "code": code, "message": message, "data": data })),
        id,
    }
}
