//! Lowercase hex helpers.

pub fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Decode a hex string (either case) into bytes.
///
/// Does not trim; callers normalize first.
pub fn hex_decode(input: &str) -> Result<Vec<u8>, String> {
    if input.len() % 2 != 0 {
        return Err("hex string must have even length".to_string());
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let Some(hi) = (pair[0] as char).to_digit(16) else {
            return Err(format!("invalid hex character: {}", pair[0] as char));
        };
        let Some(lo) = (pair[1] as char).to_digit(16) else {
            return Err(format!("invalid hex character: {}", pair[1] as char));
        };
        out.push(((hi << 4) | lo) as u8);
    }
    Ok(out)
}
