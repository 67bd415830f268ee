//! The interactive conversation loop and its exit transition.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::error;

use crate::companion::Companion;
use crate::diary;

const EXIT_COMMAND: &str = "exit";

/// Runs the conversation until the exit keyword (or end of input), then
/// prints the diary summary and persists it under `diary_dir`.
///
/// Input and output are generic so tests can drive the loop with scripted
/// lines and capture the transcript.
pub async fn run<C, R, W>(
    companion: &C,
    mut input: R,
    mut output: W,
    diary_dir: &Path,
) -> io::Result<()>
where
    C: Companion,
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        let bytes = input.read_line(&mut line)?;
        let message = line.trim();

        // End of input closes the session the same way the exit keyword does.
        if bytes == 0 || message.eq_ignore_ascii_case(EXIT_COMMAND) {
            finish(companion, &mut output, diary_dir).await?;
            return Ok(());
        }

        match companion.send_message(message).await {
            Ok(reply) if !reply.is_empty() => writeln!(output, "assistant > {reply}")?,
            Ok(_) => {}
            Err(err) => error!("Error during conversation run: {err}"),
        }
    }
}

/// Exit transition: summarize the session, print the summary, and write the
/// dated diary file. Each failure is logged and the affected step skipped;
/// none of them abort the shutdown.
async fn finish<C, W>(companion: &C, output: &mut W, diary_dir: &Path) -> io::Result<()>
where
    C: Companion,
    W: Write,
{
    let summary = match companion.summarize().await {
        Ok(summary) => summary,
        Err(err) => {
            error!("Error summarizing conversation: {err}");
            return Ok(());
        }
    };

    writeln!(output, "summary: \n{summary}")?;

    if let Err(err) = diary::ensure_dir(diary_dir) {
        error!("Error creating diary directory: {err}");
    }

    let path = diary::summary_path(diary_dir, chrono::Local::now().date_naive());
    match diary::write_summary(&path, &summary) {
        Ok(()) => writeln!(output, "Saved diary at {}", path.display())?,
        Err(err) => error!("Error saving diary: {err}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RunStatus;
    use crate::companion::TurnError;
    use async_trait::async_trait;
    use std::io::Cursor;
    use std::sync::Mutex;

    /// Scripted companion that records everything the loop forwards to it.
    /// A `None` reply or summary stands in for a failed remote turn.
    #[derive(Default)]
    struct FakeCompanion {
        reply: Option<String>,
        summary: Option<String>,
        sent: Mutex<Vec<String>>,
        summarize_calls: Mutex<usize>,
    }

    #[async_trait]
    impl Companion for FakeCompanion {
        async fn send_message(&self, text: &str) -> Result<String, TurnError> {
            self.sent.lock().unwrap().push(text.to_string());
            self.reply
                .clone()
                .ok_or(TurnError::Run { status: RunStatus::Failed })
        }

        async fn summarize(&self) -> Result<String, TurnError> {
            *self.summarize_calls.lock().unwrap() += 1;
            self.summary
                .clone()
                .ok_or(TurnError::Run { status: RunStatus::Failed })
        }
    }

    async fn drive(fake: &FakeCompanion, script: &str, diary_dir: &Path) -> String {
        let mut transcript = Vec::new();
        run(fake, Cursor::new(script.as_bytes()), &mut transcript, diary_dir)
            .await
            .expect("loop finishes");
        String::from_utf8(transcript).expect("utf-8 transcript")
    }

    fn reflective_fake() -> FakeCompanion {
        FakeCompanion {
            reply: Some("That sounds like a lot to carry.".to_string()),
            summary: Some(
                "# A Long Day\n\n## Today's Reflection\nTired, but hopeful.".to_string(),
            ),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_conversation_then_exit_writes_dated_diary() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("diary");
        let fake = reflective_fake();

        let transcript = drive(&fake, "Had a long day.\nexit\n", &dir).await;

        assert_eq!(fake.sent.lock().unwrap().as_slice(), ["Had a long day."]);
        let reply_at = transcript
            .find("assistant > That sounds like a lot to carry.")
            .expect("reply printed");
        let summary_at = transcript
            .find("summary: \n# A Long Day")
            .expect("summary printed");
        assert!(reply_at < summary_at, "reply should precede the summary");
        assert!(transcript.contains("Saved diary at"));

        let today = chrono::Local::now().date_naive();
        let path = dir.join(format!("{}_summary.md", today.format("%Y-%m-%d")));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "# A Long Day\n\n## Today's Reflection\nTired, but hopeful."
        );
    }

    #[tokio::test]
    async fn test_exit_matches_any_case_and_surrounding_whitespace() {
        let tmp = tempfile::tempdir().unwrap();

        for script in ["exit\n", "EXIT\n", "  Exit  \n"] {
            let fake = reflective_fake();
            drive(&fake, script, tmp.path()).await;

            assert!(fake.sent.lock().unwrap().is_empty(), "{script:?} should not be forwarded");
            assert_eq!(*fake.summarize_calls.lock().unwrap(), 1);
        }
    }

    #[tokio::test]
    async fn test_every_non_exit_line_is_forwarded_once() {
        let tmp = tempfile::tempdir().unwrap();
        let fake = reflective_fake();

        let transcript = drive(&fake, "first\n   \nexits\nexit\n", tmp.path()).await;

        assert_eq!(fake.sent.lock().unwrap().as_slice(), ["first", "", "exits"]);
        assert_eq!(transcript.matches("assistant > ").count(), 3);
    }

    #[tokio::test]
    async fn test_failed_turns_print_nothing_and_keep_the_loop_alive() {
        let tmp = tempfile::tempdir().unwrap();
        let fake = FakeCompanion {
            summary: Some("# Quiet\n\n## Today's Reflection\nNothing came back.".to_string()),
            ..Default::default()
        };

        let transcript = drive(&fake, "one\ntwo\nexit\n", tmp.path()).await;

        assert_eq!(fake.sent.lock().unwrap().len(), 2);
        assert!(!transcript.contains("assistant > "));
        assert!(transcript.contains("summary:"));
    }

    #[tokio::test]
    async fn test_empty_reply_prints_no_assistant_line() {
        let tmp = tempfile::tempdir().unwrap();
        let fake = FakeCompanion {
            reply: Some(String::new()),
            summary: Some("# Quiet\n\n## Today's Reflection\nShort one.".to_string()),
            ..Default::default()
        };

        let transcript = drive(&fake, "hello\nexit\n", tmp.path()).await;

        assert_eq!(fake.sent.lock().unwrap().as_slice(), ["hello"]);
        assert!(!transcript.contains("assistant > "));
    }

    #[tokio::test]
    async fn test_end_of_input_still_produces_a_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("diary");
        let fake = reflective_fake();

        let transcript = drive(&fake, "hello", &dir).await;

        assert_eq!(fake.sent.lock().unwrap().as_slice(), ["hello"]);
        assert_eq!(*fake.summarize_calls.lock().unwrap(), 1);
        assert!(transcript.contains("summary:"));
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_failed_summary_skips_the_diary_write() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("diary");
        let fake = FakeCompanion::default();

        let transcript = drive(&fake, "exit\n", &dir).await;

        assert!(!transcript.contains("summary:"));
        assert!(!dir.exists(), "no diary directory without a summary");
    }
}
