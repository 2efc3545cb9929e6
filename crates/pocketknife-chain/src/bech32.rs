// crates/pocketknife-chain/src/bech32.rs
//
// Minimal bech32 (BIP-173) codec, enough to move an address between human
// readable prefixes. A validator operator address (poktvaloper1...) and its
// account address (pokt1...) share the same payload; only the prefix and
// checksum differ.

use thiserror::Error;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
const CHECKSUM_LEN: usize = 6;
const MAX_LEN: usize = 90;

/// Errors from decoding a bech32 string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Bech32Error {
    #[error("missing separator '1'")]
    MissingSeparator,
    #[error("empty human-readable prefix")]
    EmptyPrefix,
    #[error("data part too short")]
    TooShort,
    #[error("string length {0} exceeds 90 characters")]
    TooLong(usize),
    #[error("mixed-case string")]
    MixedCase,
    #[error("invalid character '{0}'")]
    InvalidChar(char),
    #[error("checksum mismatch")]
    InvalidChecksum,
    #[error("expected prefix '{expected}', found '{found}'")]
    WrongPrefix { expected: String, found: String },
}

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 0x1f));
    out
}

fn checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let values = hrp_expand(hrp)
        .into_iter()
        .chain(data.iter().copied())
        .chain([0u8; CHECKSUM_LEN]);
    let pm = polymod(values) ^ 1;
    let mut out = [0u8; CHECKSUM_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((pm >> (5 * (5 - i))) & 0x1f) as u8;
    }
    out
}

/// Decode a bech32 string into its (lowercase) prefix and 5-bit payload,
/// checksum stripped.
pub fn decode(s: &str) -> Result<(String, Vec<u8>), Bech32Error> {
    if s.len() > MAX_LEN {
        return Err(Bech32Error::TooLong(s.len()));
    }
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(Bech32Error::MixedCase);
    }
    let s = s.to_ascii_lowercase();

    let sep = s.rfind('1').ok_or(Bech32Error::MissingSeparator)?;
    let (hrp, rest) = (&s[..sep], &s[sep + 1..]);
    if hrp.is_empty() {
        return Err(Bech32Error::EmptyPrefix);
    }
    if rest.len() < CHECKSUM_LEN {
        return Err(Bech32Error::TooShort);
    }
    if let Some(c) = hrp.chars().find(|c| !(33..=126).contains(&(*c as u32))) {
        return Err(Bech32Error::InvalidChar(c));
    }

    let mut data = Vec::with_capacity(rest.len());
    for c in rest.chars() {
        let pos = CHARSET
            .iter()
            .position(|&b| b as char == c)
            .ok_or(Bech32Error::InvalidChar(c))?;
        data.push(pos as u8);
    }

    let values = hrp_expand(hrp).into_iter().chain(data.iter().copied());
    if polymod(values) != 1 {
        return Err(Bech32Error::InvalidChecksum);
    }

    data.truncate(data.len() - CHECKSUM_LEN);
    Ok((hrp.to_string(), data))
}

/// Encode a 5-bit payload under `hrp`.
pub fn encode(hrp: &str, data: &[u8]) -> String {
    let hrp = hrp.to_ascii_lowercase();
    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(&hrp);
    out.push('1');
    for &d in data.iter().chain(checksum(&hrp, data).iter()) {
        out.push(CHARSET[usize::from(d & 0x1f)] as char);
    }
    out
}

/// Re-encode `address` from prefix `from` to prefix `to`.
pub fn convert_prefix(address: &str, from: &str, to: &str) -> Result<String, Bech32Error> {
    let (hrp, data) = decode(address)?;
    if hrp != from {
        return Err(Bech32Error::WrongPrefix {
            expected: from.to_string(),
            found: hrp,
        });
    }
    Ok(encode(to, &data))
}
