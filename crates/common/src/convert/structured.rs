use serde_json::Value;

use super::ConvertError;
use crate::media::APPLICATION_JSON;

/// Re-serialize a JSON document as YAML.
pub fn json_to_yaml(data: &[u8]) -> Result<String, ConvertError> {
    let value: Value =
        serde_json::from_slice(data).map_err(|e| ConvertError::malformed(APPLICATION_JSON, e))?;
    serde_yaml::to_string(&value).map_err(|e| ConvertError::malformed(APPLICATION_JSON, e))
}
