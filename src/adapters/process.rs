use std::ffi::OsStr;
use std::io::Write;
use std::process::{Command, Stdio};

/// Run `program` with `args`, optionally feeding `stdin`, and return stdout.
///
/// On failure returns a one-line description: the spawn error, or the exit
/// status plus the trimmed stderr of the child.
pub fn run<S: AsRef<OsStr>>(
    program: &mut Command,
    args: &[S],
    stdin_data: Option<&[u8]>,
) -> std::result::Result<Vec<u8>, String> {
    program.args(args);
    let shown = describe(program);
    tracing::debug!(command = %shown, "running");

    let output = match stdin_data {
        Some(data) => {
            program
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            let mut child = program
                .spawn()
                .map_err(|e| format!("failed to run {shown}: {e}"))?;

            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(data)
                    .map_err(|e| format!("failed to write to {shown}: {e}"))?;
            }

            child
                .wait_with_output()
                .map_err(|e| format!("{shown} did not complete: {e}"))?
        }
        None => program
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("failed to run {shown}: {e}"))?,
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        return Err(if stderr.is_empty() {
            format!("{shown} exited with {}", output.status)
        } else {
            format!("{shown} exited with {}: {stderr}", output.status)
        });
    }

    Ok(output.stdout)
}

/// Command line as it would be typed, for logs and error messages.
fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
