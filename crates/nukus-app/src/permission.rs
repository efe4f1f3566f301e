use std::io::{self, BufRead, Write};

use anyhow::bail;
use nukus_capture::{CaptureGrant, GrantSender, Revoker};

/// Ask for screen capture consent and hand the grant to the capture task.
///
/// Without a terminal to ask on, consent must be given up front with `--grant-capture`.
pub fn request_capture(pre_granted: bool, grants: &GrantSender) -> anyhow::Result<Revoker> {
    let allowed = if pre_granted {
        tracing::info!("Screen capture granted on the command line");
        true
    } else if atty::is(atty::Stream::Stdin) {
        let stdin = io::stdin();
        let stderr = io::stderr();
        ask_consent(&mut stdin.lock(), &mut stderr.lock())?
    } else {
        tracing::warn!("No terminal to ask for consent, pass --grant-capture to allow capture");
        false
    };

    if !allowed {
        bail!("Screen capture permission denied");
    }

    let (grant, revoker) = CaptureGrant::issue();
    tracing::debug!("Issued capture grant {}", grant.id());
    if !grants.offer(grant) {
        bail!("Capture task is not accepting grants");
    }
    Ok(revoker)
}

pub fn ask_consent(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(
        output,
        "Nukus will capture your screen to translate visible text. Allow? [y/N] "
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use nukus_capture::grant_channel;

    use super::*;

    #[test]
    fn only_explicit_yes_grants() {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("\n", false), ("no\n", false)] {
            let mut output = Vec::new();
            let allowed = ask_consent(&mut Cursor::new(answer), &mut output).unwrap();
            assert_eq!(allowed, expected, "answer {answer:?}");
            assert!(String::from_utf8(output).unwrap().ends_with("[y/N] "));
        }
    }

    #[tokio::test]
    async fn pre_granted_consent_reaches_capture_side() {
        let (tx, rx) = grant_channel();
        let revoker = request_capture(true, &tx).unwrap();

        let grant = rx.recv().await.unwrap();
        assert!(grant.is_valid());
        revoker.revoke();
        assert!(!grant.is_valid());
    }
}
