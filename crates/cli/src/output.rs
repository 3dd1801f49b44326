//! Envelope serialization to stdout and/or a file.
//!
//! Exactly one document is printed per invocation. Stdout payloads are
//! capped at a fixed character budget with a notice pointing at
//! `--out`; file output is never truncated.

use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use voluum_types::Envelope;

use crate::cli::GlobalArgs;

/// Character budget for a single stdout document.
pub const MAX_STDOUT_CHARS: usize = 200_000;

#[derive(Debug, Default, Clone)]
pub struct PrintOptions {
    pub pretty: bool,
    pub silent: bool,
    pub out: Option<PathBuf>,
}

impl PrintOptions {
    pub fn from_global(global: &GlobalArgs) -> Self {
        Self {
            pretty: global.pretty,
            silent: global.silent,
            out: global.out.clone(),
        }
    }
}

/// Serialize and emit the envelope according to the print options.
pub fn print_envelope(envelope: &Envelope, options: &PrintOptions) -> io::Result<()> {
    let serialized = if options.pretty {
        serde_json::to_string_pretty(envelope)
    } else {
        serde_json::to_string(envelope)
    }
    .map_err(io::Error::other)?;
    let payload = format!("{serialized}\n");

    if let Some(path) = &options.out {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &payload)?;
    }

    if !options.silent {
        let mut stdout = io::stdout().lock();
        stdout.write_all(truncate_for_stdout(&payload).as_bytes())?;
    }

    Ok(())
}

/// Cap a payload at [`MAX_STDOUT_CHARS`] characters, appending a notice
/// when anything was cut.
fn truncate_for_stdout(payload: &str) -> Cow<'_, str> {
    if payload.chars().count() <= MAX_STDOUT_CHARS {
        return Cow::Borrowed(payload);
    }

    let kept: String = payload.chars().take(MAX_STDOUT_CHARS).collect();
    Cow::Owned(format!(
        "{kept}\n[output truncated after {MAX_STDOUT_CHARS} characters; use --out <file> to capture the full document]\n"
    ))
}
