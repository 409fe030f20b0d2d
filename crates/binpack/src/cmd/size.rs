use crate::cmd::SizeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_size, OutputFormat};

pub fn run(args: SizeArgs, format: OutputFormat) -> CliResult<i32> {
    let target = args.source.resolve()?;
    let record = target.format();
    print_size(&record.to_string(), record.len(), record.size(), format);
    Ok(SUCCESS)
}
