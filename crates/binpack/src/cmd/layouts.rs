use crate::cmd::{load_registry, LayoutsArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_layouts, LayoutSummary, OutputFormat};

pub fn run(args: LayoutsArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = load_registry(&args.dir, args.strict)?;

    let summaries: Vec<LayoutSummary> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name).ok())
        .map(|layout| LayoutSummary {
            name: layout.name().to_string(),
            description: layout.description().map(str::to_string),
            fields: layout.fields().len(),
            size: layout.size(),
            format: layout.format().to_string(),
        })
        .collect();

    print_layouts(&summaries, format);
    Ok(SUCCESS)
}
