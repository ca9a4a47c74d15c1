use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

struct ChildGuard(std::process::Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

#[test]
fn test_stdio_integrity() {
    let bin_path = env!("CARGO_BIN_EXE_jsonedit-server");
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let mut child = ChildGuard(
        Command::new(bin_path)
            .arg(data_dir.path())
            .env("RUST_LOG", "debug") // logs must stay on stderr
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn jsonedit-server"),
    );

    let mut stdin = child.0.stdin.take().expect("Failed to open stdin");
    let mut stdout = BufReader::new(child.0.stdout.take().expect("Failed to open stdout"));

    let requests = [
        r#"{"jsonrpc":"2.0","method":"initialize","params":{},"id":1}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","method":"history/open","params":{"directoryPath":"/a","name":"x.json"},"id":2}"#,
        r#"{"jsonrpc":"2.0","method":"history/list","id":3}"#,
    ];
    for req in requests {
        writeln!(stdin, "{}", req).expect("Failed to write request");
    }
    stdin.flush().expect("Failed to flush stdin");
    drop(stdin);

    // Every stdout line must be a JSON-RPC response; the notification gets none.
    let mut ids = Vec::new();
    let mut line = String::new();
    while stdout.read_line(&mut line).expect("Failed to read stdout") > 0 {
        let resp: serde_json::Value =
            serde_json::from_str(line.trim()).expect("stdout line is not JSON");
        assert_eq!(resp["jsonrpc"], "2.0");
        ids.push(resp["id"].clone());
        if resp["id"] == 3 {
            assert_eq!(resp["result"]["fileHistory"][0]["name"], "x.json");
        }
        line.clear();
    }
    assert_eq!(ids, vec![serde_json::json!(1), serde_json::json!(2), serde_json::json!(3)]);

    assert!(data_dir.path().join("editor.config.json").exists());
    assert!(data_dir.path().join("json-file-history.json").exists());
}
