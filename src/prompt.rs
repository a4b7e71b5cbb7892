// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Prompt construction for documentation generation.
//!
//! [`build_prompt`] is a pure function from validated log text to the fixed
//! instruction prompt sent to the engine. The log text is embedded verbatim;
//! no escaping or sanitization is applied. That is a deliberate trust
//! boundary: the engine is expected to handle arbitrary text, and the logs
//! come from our own CI/CD pipeline, not from anonymous callers. Callers who
//! cannot make that assumption should sanitize before submitting.

/// Instruction preamble placed before the log text.
const PROMPT_PREAMBLE: &str =
    "You are a DevOps documentation assistant. Analyze the following CI/CD logs \
     and produce deployment documentation with these sections:\n\
     1. Summary of recent changes\n\
     2. Key issues and fixes\n\
     3. Deployment recommendations\n\
     4. Troubleshooting steps\n\
     5. Future optimizations\n";

/// Build the documentation prompt for one log payload.
///
/// Deterministic and side-effect free: the same logs always yield the same
/// prompt. The caller has already validated that `logs` is non-empty.
pub fn build_prompt(logs: &str) -> String {
    format!("{}\nCI/CD logs:\n{}", PROMPT_PREAMBLE, logs)
}
