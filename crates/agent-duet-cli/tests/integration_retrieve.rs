use anyhow::Result;
use std::process::Command;

/// Run the built binary's `retrieve --json` against a small document and check
/// the ranked output.
#[test]
fn retrieve_json_ranks_matching_chunk_first() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let doc = dir.path().join("doc.txt");
    let mut text = String::new();
    text.push_str(&"Invoices are billed monthly to the account owner. ".repeat(20));
    text.push_str(&"Passwords must be rotated every ninety days. ".repeat(25));
    std::fs::write(&doc, &text)?;

    let output = Command::new(env!("CARGO_BIN_EXE_agent-duet"))
        .args(["retrieve", "--query", "passwords rotated ninety days"])
        .args(["--top-k", "2", "--json"])
        .arg("--document")
        .arg(&doc)
        .env("RUST_LOG", "warn")
        .output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["query"], "passwords rotated ninety days");
    assert_eq!(value["chunks"], 3);

    let results = value["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    let first_text = results[0]["text"].as_str().unwrap_or_default();
    assert!(first_text.contains("Passwords"));
    let score = |i: usize| results[i]["score"].as_f64().unwrap_or(0.0);
    assert!(score(0) >= score(1));
    Ok(())
}

#[test]
fn chat_rejects_out_of_range_turns() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_agent-duet"))
        .args(["chat", "--seed", "hello", "--max-turns", "11"])
        .env_remove("DUET_USERNAME")
        .env_remove("DUET_PASSWORD")
        .env("RUST_LOG", "warn")
        .output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max turns must be between 1 and 10, got 11"));
    Ok(())
}

#[test]
fn chat_requires_matching_login() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_agent-duet"))
        .args(["chat", "--seed", "hello", "--username", "alice", "--password", "wrong"])
        .env("DUET_USERNAME", "alice")
        .env("DUET_PASSWORD", "secret")
        .env("RUST_LOG", "warn")
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid username or password"));
    Ok(())
}

#[cfg(feature = "pdf")]
#[test]
fn pdf_documents_go_through_the_pdf_extractor() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let doc = dir.path().join("broken.pdf");
    std::fs::write(&doc, "plain text pretending to be a PDF")?;

    let output = Command::new(env!("CARGO_BIN_EXE_agent-duet"))
        .args(["retrieve", "--query", "anything"])
        .arg("--document")
        .arg(&doc)
        .env("RUST_LOG", "warn")
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("extracting text from"));
    Ok(())
}
