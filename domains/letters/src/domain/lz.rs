//! LZ dictionary coder over UTF-16 code units with a URL-safe 6-bit alphabet.
//!
//! Compression is `lz_str`'s `compress_to_encoded_uri_component`, the same
//! layout browser clients produce. Decoding stays local: a short token can
//! expand to tens of megabytes, so the decoder stops as soon as the output
//! passes a caller-supplied limit instead of checking after the fact.
//! Codes are read least-significant bit first; each input symbol carries
//! six bits, most significant first.

/// Output alphabet; every symbol is legal in a URL query value.
pub const URI_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-";

const BITS_PER_SYMBOL: u32 = 6;
const SYMBOL_HIGH_BIT: u32 = 1 << (BITS_PER_SYMBOL - 1);

// Reserved codes
const CODE_CHAR8: u32 = 0;
const CODE_CHAR16: u32 = 1;
const CODE_END: u32 = 2;

/// Largest code width the decoder accepts before giving up
const MAX_CODE_BITS: u32 = 24;

/// Value of one alphabet symbol, `None` outside the alphabet
pub fn symbol_value(symbol: u8) -> Option<u32> {
    match symbol {
        b'A'..=b'Z' => Some((symbol - b'A') as u32),
        b'a'..=b'z' => Some((symbol - b'a') as u32 + 26),
        b'0'..=b'9' => Some((symbol - b'0') as u32 + 52),
        b'+' => Some(62),
        b'-' => Some(63),
        _ => None,
    }
}

/// Compress text into the URL-safe alphabet
pub fn compress(input: &str) -> String {
    lz_str::compress_to_encoded_uri_component(input)
}

struct BitReader<'a> {
    symbols: &'a [u32],
    value: u32,
    mask: u32,
    index: usize,
}

impl<'a> BitReader<'a> {
    fn new(symbols: &'a [u32]) -> Self {
        Self {
            symbols,
            value: symbols.first().copied().unwrap_or(0),
            mask: SYMBOL_HIGH_BIT,
            index: 1,
        }
    }

    /// Past the end of input; reads beyond it yield zero bits
    fn exhausted(&self) -> bool {
        self.index > self.symbols.len()
    }

    fn read(&mut self, width: u32) -> u32 {
        let mut code = 0;
        for bit in 0..width {
            let set = self.value & self.mask != 0;
            self.mask >>= 1;
            if self.mask == 0 {
                self.mask = SYMBOL_HIGH_BIT;
                self.value = self.symbols.get(self.index).copied().unwrap_or(0);
                self.index += 1;
            }
            if set {
                code |= 1 << bit;
            }
        }
        code
    }
}

/// Decompress a token produced by [`compress`].
///
/// Returns `None` for anything that is not a complete, well-formed stream,
/// and for streams whose output would exceed `max_units` UTF-16 code units.
pub fn decompress(token: &str, max_units: usize) -> Option<Vec<u16>> {
    let symbols: Vec<u32> = token
        .bytes()
        .map(symbol_value)
        .collect::<Option<Vec<u32>>>()?;
    if symbols.is_empty() {
        return None;
    }

    let mut reader = BitReader::new(&symbols);
    // Codes 0..=2 are reserved; slots are kept so indices line up with codes
    let mut dictionary: Vec<Vec<u16>> = vec![Vec::new(), Vec::new(), Vec::new()];
    let mut enlarge_in: u32 = 4;
    let mut num_bits: u32 = 3;

    let first = match reader.read(2) {
        CODE_CHAR8 => reader.read(8) as u16,
        CODE_CHAR16 => reader.read(16) as u16,
        CODE_END => return Some(Vec::new()),
        _ => return None,
    };

    let mut previous = vec![first];
    dictionary.push(previous.clone());
    let mut output = previous.clone();

    loop {
        if reader.exhausted() || num_bits > MAX_CODE_BITS {
            return None;
        }

        let mut code = reader.read(num_bits) as usize;
        match code as u32 {
            CODE_CHAR8 | CODE_CHAR16 => {
                let width = if code as u32 == CODE_CHAR8 { 8 } else { 16 };
                dictionary.push(vec![reader.read(width) as u16]);
                code = dictionary.len() - 1;
                enlarge_in -= 1;
            }
            CODE_END => return Some(output),
            _ => {}
        }

        if enlarge_in == 0 {
            enlarge_in = 1 << num_bits;
            num_bits += 1;
        }

        let entry = if code < dictionary.len() {
            dictionary[code].clone()
        } else if code == dictionary.len() {
            let mut entry = previous.clone();
            entry.push(previous[0]);
            entry
        } else {
            return None;
        };

        if output.len() + entry.len() > max_units {
            return None;
        }
        output.extend_from_slice(&entry);

        let mut added = previous;
        added.push(entry[0]);
        dictionary.push(added);
        enlarge_in -= 1;

        previous = entry;

        if enlarge_in == 0 {
            enlarge_in = 1 << num_bits;
            num_bits += 1;
        }
    }
}
