use binpack_codec::Value;

use crate::cmd::{parse_json, read_text, PackArgs, Target};
use crate::exit::{
    io_error, layout_error, pack_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE,
};
use crate::output::{print_packed, OutputFormat};
use crate::values::{named, positional};

pub fn run(args: PackArgs, format: OutputFormat) -> CliResult<i32> {
    let target = args.source.resolve()?;
    let text = match (&args.values, &args.values_file) {
        (Some(values), _) => values.clone(),
        (None, Some(path)) => read_text(path)?,
        (None, None) => {
            return Err(CliError::new(USAGE, "either --values or --values-file is required"))
        }
    };
    let json = parse_json(&text, "values")?;

    let bytes = pack_target(&target, &json)?;
    tracing::debug!(size = bytes.len(), "packed record");

    match &args.out {
        Some(path) => {
            std::fs::write(path, &bytes)
                .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
            tracing::info!(path = %path.display(), size = bytes.len(), "wrote packed record");
        }
        None => print_packed(&bytes, format),
    }
    Ok(SUCCESS)
}

fn pack_target(target: &Target, json: &serde_json::Value) -> CliResult<Vec<u8>> {
    match (target, json) {
        (Target::Layout(layout), serde_json::Value::Object(map)) => {
            let values = named(layout, map)?;
            layout
                .pack_named(&values)
                .map(|bytes| bytes.to_vec())
                .map_err(|err| layout_error("pack failed", err))
        }
        (target, serde_json::Value::Array(_)) => {
            let values: Vec<Value> = positional(target.format(), json)?;
            target
                .format()
                .pack(&values)
                .map(|bytes| bytes.to_vec())
                .map_err(|err| pack_error("pack failed", err))
        }
        (Target::Tokens(_), _) => Err(CliError::new(
            DATA_INVALID,
            "values must be a JSON array when packing with --tokens",
        )),
        (Target::Layout(_), _) => Err(CliError::new(
            DATA_INVALID,
            "values must be a JSON array or object when packing with --layout",
        )),
    }
}
