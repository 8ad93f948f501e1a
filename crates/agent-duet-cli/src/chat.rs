//! Interactive conversation loop and report output for the `chat` subcommand.
//!
//! The loop is generic over the completion client and the I/O handles so it can
//! be driven by a scripted client and in-memory buffers in tests.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use agent_duet::{
    CompletionClient, ConversationOrchestrator, MarkdownReport, ReportRenderer, SessionState,
    Turn,
};
use anyhow::{Context, Result};

use crate::progress::with_spinner;

fn print_turn<W: Write>(out: &mut W, turn: &Turn) -> Result<()> {
    writeln!(out, "\n{}: {}", turn.speaker, turn.text)?;
    Ok(())
}

/// Ask the user to pick a follow-up.
///
/// Accepts a 1-based index into `followups` or free text; with no follow-ups
/// every answer is free text. Returns `None` on end of input or `q`/`quit`.
fn read_choice<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    followups: &[String],
) -> Result<Option<String>> {
    loop {
        if followups.is_empty() {
            write!(out, "\nType your own question, or 'q' to finish: ")?;
        } else {
            write!(
                out,
                "\nChoose a follow-up [1-{}], type your own question, or 'q' to finish: ",
                followups.len()
            )?;
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        match line {
            "" => continue,
            "q" | "quit" => return Ok(None),
            _ => {}
        }
        if let (Ok(n), false) = (line.parse::<usize>(), followups.is_empty()) {
            if (1..=followups.len()).contains(&n) {
                return Ok(Some(followups[n - 1].clone()));
            }
            writeln!(out, "No follow-up numbered {}.", n)?;
            continue;
        }
        return Ok(Some(line.to_string()));
    }
}

/// Run one conversation from `seed` until the turn budget is spent or the
/// user stops.
///
/// With `auto` the first suggested follow-up is always taken, and the run ends
/// early when none is suggested.
pub fn run_conversation<C, R, W>(
    orch: &mut ConversationOrchestrator<C>,
    seed: &str,
    auto: bool,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    C: CompletionClient,
    R: BufRead,
    W: Write,
{
    let first = orch.start(seed).clone();
    print_turn(out, &first)?;

    let answer = with_spinner("Agent B is answering...", || orch.advance().cloned())
        .context("asking Agent B")?;
    print_turn(out, &answer)?;

    loop {
        if orch.state() == SessionState::Exhausted {
            writeln!(out, "\nTurn limit of {} reached.", orch.config().max_turns)?;
            break;
        }

        let followups = orch.followups().to_vec();
        if followups.is_empty() {
            writeln!(out, "\nNo follow-up questions were suggested.")?;
            if auto {
                break;
            }
        } else {
            writeln!(out, "\nSuggested follow-ups:")?;
            for (i, q) in followups.iter().enumerate() {
                writeln!(out, "  {}. {}", i + 1, q)?;
            }
        }

        let choice = if auto {
            followups[0].clone()
        } else {
            match read_choice(input, out, &followups)? {
                Some(c) => c,
                None => break,
            }
        };

        let answer = with_spinner("Agent B is answering...", || {
            orch.choose_followup(&choice).cloned()
        })
        .context("continuing with follow-up")?;

        let turns = orch.transcript();
        if let Some(question) = turns.len().checked_sub(2).map(|i| &turns[i]) {
            print_turn(out, question)?;
        }
        print_turn(out, &answer)?;
    }

    Ok(())
}

/// `conversation_summary.<ext>` in the working directory.
pub fn default_report_path<R: ReportRenderer + ?Sized>(renderer: &R) -> PathBuf {
    PathBuf::from(format!("conversation_summary.{}", renderer.extension()))
}

/// Summarize the conversation, write the Markdown report and optionally the
/// transcript JSON.
pub fn write_outputs<C: CompletionClient>(
    orch: &ConversationOrchestrator<C>,
    report_path: &Path,
    transcript_path: Option<&Path>,
) -> Result<()> {
    let summary = with_spinner("Summarizing conversation...", || orch.summarize())
        .context("summarizing conversation")?;
    let bytes = orch.render_report(&MarkdownReport, &summary)?;
    std::fs::write(report_path, bytes)
        .with_context(|| format!("writing report to {}", report_path.display()))?;
    println!("Saved report to {}", report_path.display());

    if let Some(path) = transcript_path {
        orch.export_transcript(path)
            .with_context(|| format!("writing transcript to {}", path.display()))?;
        println!("Saved transcript to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_duet::completion::fake::ScriptedClient;
    use agent_duet::{OrchestratorConfig, Speaker};
    use std::io::Cursor;

    fn orchestrator(
        client: ScriptedClient,
        max_turns: usize,
    ) -> ConversationOrchestrator<ScriptedClient> {
        let config = OrchestratorConfig {
            max_turns,
            ..OrchestratorConfig::default()
        };
        ConversationOrchestrator::new(client, config).unwrap()
    }

    #[test]
    fn auto_runs_until_budget_is_spent() {
        let mut orch = orchestrator(ScriptedClient::constant("1. Go deeper?"), 3);
        let mut out = Vec::new();
        run_conversation(&mut orch, "seed", true, &mut Cursor::new(""), &mut out).unwrap();

        assert_eq!(orch.turn_counter(), 3);
        assert_eq!(orch.transcript().len(), 6);
        assert_eq!(orch.state(), SessionState::Exhausted);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Turn limit of 3 reached."));
    }

    #[test]
    fn interactive_choice_by_number_and_free_text() {
        let mut orch = orchestrator(ScriptedClient::constant("1. First?\n2. Second?"), 3);
        let mut input = Cursor::new("2\nmy own question\n");
        let mut out = Vec::new();
        run_conversation(&mut orch, "seed", false, &mut input, &mut out).unwrap();

        let asked: Vec<&str> = orch
            .transcript()
            .iter()
            .filter(|t| t.speaker == Speaker::A)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(asked, vec!["seed", "Second?", "my own question"]);
    }

    #[test]
    fn quit_stops_early() {
        let mut orch = orchestrator(ScriptedClient::constant("1. First?"), 3);
        let mut out = Vec::new();
        run_conversation(&mut orch, "seed", false, &mut Cursor::new("q\n"), &mut out).unwrap();
        assert_eq!(orch.turn_counter(), 1);
        assert_eq!(orch.transcript().len(), 2);
    }

    #[test]
    fn out_of_range_number_reprompts() {
        let mut orch = orchestrator(ScriptedClient::constant("1. Only?"), 2);
        let mut out = Vec::new();
        run_conversation(&mut orch, "seed", false, &mut Cursor::new("5\n\n1\n"), &mut out).unwrap();
        assert_eq!(orch.transcript()[2].text, "Only?");
        assert!(String::from_utf8(out).unwrap().contains("No follow-up numbered 5."));
    }

    #[test]
    fn default_report_path_uses_renderer_extension() {
        assert_eq!(
            default_report_path(&MarkdownReport),
            PathBuf::from("conversation_summary.md")
        );
    }

    #[test]
    fn interactive_asks_for_own_question_without_followups() {
        let client = ScriptedClient::default()
            .then_reply("answer")
            .then_reply("")
            .then_reply("second answer")
            .then_reply("1. More?");
        let mut orch = orchestrator(client, 3);
        let mut input = Cursor::new("2\nq\n");
        let mut out = Vec::new();
        run_conversation(&mut orch, "seed", false, &mut input, &mut out).unwrap();

        assert_eq!(orch.turn_counter(), 2);
        assert_eq!(orch.transcript()[2].text, "2");
        assert_eq!(orch.transcript()[3].text, "second answer");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No follow-up questions were suggested."));
        assert!(text.contains("Type your own question, or 'q' to finish: "));
    }

    #[test]
    fn stops_without_followups() {
        let client = ScriptedClient::default().then_reply("answer").then_reply("");
        let mut orch = orchestrator(client, 3);
        let mut out = Vec::new();
        run_conversation(&mut orch, "seed", true, &mut Cursor::new(""), &mut out).unwrap();
        assert_eq!(orch.turn_counter(), 1);
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("No follow-up questions were suggested."));
    }

    #[test]
    fn outputs_are_written() {
        let client = ScriptedClient::default()
            .then_reply("answer")
            .then_reply("1. More?")
            .then_reply("- short")
            .then_reply("Q: long?\nA: yes.");
        let mut orch = orchestrator(client, 1);
        let mut out = Vec::new();
        run_conversation(&mut orch, "seed", true, &mut Cursor::new(""), &mut out).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("summary.md");
        let transcript = dir.path().join("transcript.json");
        write_outputs(&orch, &report, Some(&transcript)).unwrap();

        let md = std::fs::read_to_string(&report).unwrap();
        assert!(md.starts_with("# Agentic AI Conversation Summary"));
        assert!(md.contains("## Short Summary\n\n- short"));
        assert!(md.contains("## Detailed FAQ Summary\n\nQ: long?\nA: yes."));
        assert!(std::fs::read_to_string(&transcript).unwrap().contains("\"answer\""));
    }
}
