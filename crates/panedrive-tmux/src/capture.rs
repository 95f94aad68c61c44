//! Keystroke injection and screen capture.

use crate::error::TmuxError;
use crate::executor::TmuxRunner;

/// Type `text` into a pane literally (no key-name lookup), then optionally
/// press Enter.
pub fn send_keys(
    runner: &impl TmuxRunner,
    pane_id: &str,
    text: &str,
    enter: bool,
) -> Result<(), TmuxError> {
    runner.run(&["send-keys", "-t", pane_id, "-l", "--", text])?;
    if enter {
        runner.run(&["send-keys", "-t", pane_id, "Enter"])?;
    }
    Ok(())
}

/// Capture the visible screen of a pane, one entry per row, top to bottom.
pub fn capture_pane(runner: &impl TmuxRunner, pane_id: &str) -> Result<Vec<String>, TmuxError> {
    let output = runner.run(&["capture-pane", "-p", "-t", pane_id])?;
    Ok(output.lines().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl TmuxRunner for Recorder {
        fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
            self.calls
                .lock()
                .expect("lock")
                .push(args.iter().map(|a| a.to_string()).collect());
            Ok(String::new())
        }
    }

    #[test]
    fn send_keys_literal_then_enter() {
        let rec = Recorder::default();
        send_keys(&rec, "%3", "Enter -x", true).expect("sent");
        let calls = rec.calls.lock().expect("lock");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ["send-keys", "-t", "%3", "-l", "--", "Enter -x"]);
        assert_eq!(calls[1], ["send-keys", "-t", "%3", "Enter"]);
    }

    #[test]
    fn send_keys_without_enter() {
        let rec = Recorder::default();
        send_keys(&rec, "%3", "ls", false).expect("sent");
        assert_eq!(rec.calls.lock().expect("lock").len(), 1);
    }

    #[test]
    fn mock_capture_pane() {
        struct MockRunner;
        impl TmuxRunner for MockRunner {
            fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
                assert!(args.contains(&"capture-pane"));
                assert!(args.contains(&"-p"));
                Ok("line 1\nline 2\nline 3\n".to_string())
            }
        }
        let lines = capture_pane(&MockRunner, "%0").expect("should capture");
        assert_eq!(lines, ["line 1", "line 2", "line 3"]);
    }

    #[test]
    fn capture_empty_pane() {
        struct MockRunner;
        impl TmuxRunner for MockRunner {
            fn run(&self, _args: &[&str]) -> Result<String, TmuxError> {
                Ok(String::new())
            }
        }
        let lines = capture_pane(&MockRunner, "%0").expect("should capture");
        assert!(lines.is_empty());
    }
}
