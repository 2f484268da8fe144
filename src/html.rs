//! Escaping helpers shared by the fencer and the plain-text wrapper.

/// Build a byte lookup table at compile time.
pub(crate) const fn byte_set(bytes: &[u8]) -> [bool; 256] {
    let mut a = [false; 256];
    let mut i = 0;
    while i < bytes.len() {
        a[bytes[i] as usize] = true;
        i += 1;
    }
    a
}

const HTML_UNSAFE: [bool; 256] = byte_set(b"&<>\"");

/// Append `buffer` to `output`, escaping `&`, `<`, `>` and `"`.
pub fn escape(output: &mut String, buffer: &str) {
    let bytes = buffer.as_bytes();
    let mut offset = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if !HTML_UNSAFE[byte as usize] {
            continue;
        }

        let esc = match byte {
            b'"' => "&quot;",
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => unreachable!(),
        };
        // All escaped bytes are ASCII, so these are char boundaries.
        output.push_str(&buffer[offset..i]);
        output.push_str(esc);
        offset = i + 1;
    }

    output.push_str(&buffer[offset..]);
}

/// Escape `buffer` into a fresh string.
pub fn escape_to_string(buffer: &str) -> String {
    let mut s = String::with_capacity(buffer.len());
    escape(&mut s, buffer);
    s
}
