use crate::reports;
use citygov::error::GovResult;
use citygov::presets::get_all_presets;

pub fn run() -> GovResult<()> {
    reports::print_presets(&get_all_presets());
    Ok(())
}
