use byte_unit::Byte;
use std::str::FromStr;

const UNDER_MIN_VALUE: &str = "must be greater than or equal to 5MiB";
const OVER_MAX_VALUE: &str = "must be smaller than or equal to 5GiB";

// S3 part size limits. The last part is exempt from the minimum.
const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;
const MAX_PART_SIZE: u64 = 5 * 1024 * 1024 * 1024;

pub fn check_human_bytes(value: &str) -> Result<String, String> {
    parse_human_bytes(value).map(|_| value.to_string())
}

/// Parses a part size such as `50MiB` or `5242880` into bytes.
pub fn parse_human_bytes(value: &str) -> Result<u64, String> {
    let part_size = Byte::from_str(value)
        .map_err(|e| e.to_string())?
        .as_u128();

    if part_size < MIN_PART_SIZE as u128 {
        return Err(UNDER_MIN_VALUE.to_string());
    }
    if part_size > MAX_PART_SIZE as u128 {
        return Err(OVER_MAX_VALUE.to_string());
    }

    Ok(part_size as u64)
}
