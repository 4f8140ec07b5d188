use crate::cli::utils::output_list;
use crate::cli::OutputFormat;
use crate::model;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    output_list(output_format, "collections", &model::COLLECTIONS)
}
