#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    // Falls back to placeholder values when building outside of a git checkout.
    EmitBuilder::builder()
        .all_build()
        .git_describe(true, true, None)
        .emit()?;

    return Ok(());
}
