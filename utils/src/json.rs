use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize `value` as pretty JSON indented by `indent` spaces, with a
/// trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(
    value: &T,
    indent: usize,
) -> serde_json::Result<Vec<u8>> {
    let indent = vec![b' '; indent];
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}
