use crate::contract::NamingScheme;
use crate::plan::RunDescriptor;

/// Month, day, hour, minute, second.
pub const TIMESTAMP_FORMAT: &str = "%m%d%H%M%S";

pub fn artifact_file_name(
    descriptor: &RunDescriptor,
    timestamp: &str,
    scheme: NamingScheme,
) -> String {
    let stem = descriptor.args().join("_");
    match scheme {
        NamingScheme::TimestampOnly => format!("{stem}{timestamp}"),
        NamingScheme::WithRepetition => {
            format!("{stem}{timestamp}_r{}", descriptor.repetition)
        }
    }
}

/// Alternate name tried when `name` is already taken.
pub fn collision_suffixed(name: &str, attempt: usize) -> String {
    format!("{name}.{attempt}")
}
