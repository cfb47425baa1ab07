// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CLI entry point for `quill`.

use anyhow::Result;
use quill_cli::entrypoint;

fn main() -> Result<()> {
    entrypoint()
}
