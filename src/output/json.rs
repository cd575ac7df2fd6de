use crate::error::Result;
use crate::model::ScanResultSet;

pub fn render_json(results: &ScanResultSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}
