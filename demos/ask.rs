// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use dynpath::{Answer, Mapping, PathCache, Sequence, Value};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Extract {
    String,
    Bool,
    Int,
    Uint,
    Float,
    Seq,
    Map,
}

fn load(file: &str) -> Result<Value> {
    if file.ends_with(".json") {
        Value::from_json_file(file)
    } else if file.ends_with(".yaml") || file.ends_with(".yml") {
        Value::from_yaml_file(file)
    } else {
        bail!("Unsupported data file `{file}`. Must be json or yaml.")
    }
}

fn extract(answer: &Answer, kind: Extract, default: &Value) -> Result<(Value, bool)> {
    let wrong_default = || anyhow::anyhow!("default {default} cannot be used as {kind:?}");
    Ok(match kind {
        Extract::String => {
            let default = match default {
                Value::Null => "",
                v => v.as_string()?.as_ref(),
            };
            let (v, ok) = answer.as_str(default);
            (Value::from(v), ok)
        }
        Extract::Bool => {
            let (v, ok) = answer.as_bool(default.as_bool().copied().unwrap_or_default());
            (Value::from(v), ok)
        }
        Extract::Int => {
            let default = match default {
                Value::Null => 0,
                v => v.to_i64().ok_or_else(wrong_default)?,
            };
            let (v, ok) = answer.as_i64(default);
            (Value::from(v), ok)
        }
        Extract::Uint => {
            let default = match default {
                Value::Null => 0,
                v => v.to_u64().ok_or_else(wrong_default)?,
            };
            let (v, ok) = answer.as_u64(default);
            (Value::from(v), ok)
        }
        Extract::Float => {
            let (v, ok) = answer.as_f64(default.to_f64().unwrap_or_default());
            (Value::from(v), ok)
        }
        Extract::Seq => {
            let default = match default {
                Value::Null => Sequence::default(),
                v => v.to_sequence().ok_or_else(wrong_default)?,
            };
            let (v, ok) = answer.as_sequence(default);
            (Value::Array(v), ok)
        }
        Extract::Map => {
            let default = match default {
                Value::Null => Mapping::default(),
                v => v.to_mapping().ok_or_else(wrong_default)?,
            };
            let (v, ok) = answer.as_map(default);
            (Value::Object(v), ok)
        }
    })
}

/// Query a JSON or YAML document with dotted paths.
#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data file (.json or .yaml).
    #[arg(value_name = "data.json")]
    file: String,

    /// Paths to apply in turn, each relative to the previous answer.
    #[arg(required(true))]
    paths: Vec<String>,

    /// Extract the answer as a typed value instead of printing it raw.
    #[arg(long = "as", value_enum)]
    kind: Option<Extract>,

    /// Default returned by a failed extraction, as json.
    #[arg(long, short, requires = "kind")]
    default: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let data = load(&cli.file)?;

    let cache = PathCache::new();
    let mut answer = cache.query(&data, "");
    for path in &cli.paths {
        answer = answer.query(path);
    }

    match cli.kind {
        Some(kind) => {
            let default = match &cli.default {
                Some(json) => Value::from_json_str(json)
                    .with_context(|| format!("Invalid default `{json}`"))?,
                None => Value::Null,
            };
            let (value, ok) = extract(&answer, kind, &default)?;
            println!("{}", value.to_json_str()?);
            println!("ok: {ok}");
        }
        None => {
            println!("{}", answer.value().to_json_str()?);
            println!("exists: {}", answer.exists());
        }
    }

    Ok(())
}
