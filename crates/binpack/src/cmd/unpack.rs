use crate::cmd::{Target, UnpackArgs};
use crate::exit::{io_error, pack_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_fields, FieldRow, OutputFormat};

pub fn run(args: UnpackArgs, format: OutputFormat) -> CliResult<i32> {
    let target = args.source.resolve()?;
    let bytes = resolve_bytes(&args)?;
    let rows = unpack_target(&target, &bytes)?;
    tracing::debug!(fields = rows.len(), input = bytes.len(), "unpacked record");

    print_fields(&rows, target.format().size(), format);
    Ok(SUCCESS)
}

fn resolve_bytes(args: &UnpackArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.hex {
        return decode_hex(text);
    }
    if let Some(path) = &args.file {
        return std::fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Err(CliError::new(USAGE, "either --hex or --file is required"))
}

fn decode_hex(text: &str) -> CliResult<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    hex::decode(digits)
        .map_err(|err| CliError::new(DATA_INVALID, format!("--hex is not valid hex: {err}")))
}

fn unpack_target(target: &Target, bytes: &[u8]) -> CliResult<Vec<FieldRow>> {
    let format = target.format();
    let values = format
        .unpack(bytes)
        .map_err(|err| pack_error("unpack failed", err))?;

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| FieldRow {
            name: target.field_name(index),
            token: format.token_str(index).unwrap_or_default().to_string(),
            value,
        })
        .collect())
}
