use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};

pub const SCHEMA_VERSION: &str = "gator.v1";

pub fn print_result<T: Serialize>(op: &str, result: &T) -> Result<()> {
    let env = json!({
        "schema_version": SCHEMA_VERSION,
        "time": Utc::now(),
        "op": op,
        "apply": true,
        "result": result,
    });
    let mut out = io::stdout();
    serde_json::to_writer(&mut out, &env)?;
    writeln!(&mut out)?;
    Ok(())
}
