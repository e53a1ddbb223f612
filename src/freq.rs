//! Frequency counting over whitespace-delimited token streams.
//!
//! The counter is sized to the number of tokens read, which always covers
//! the number of distinct tokens, unless the caller asks for an explicit
//! capacity.

use std::io::{self, BufRead, Write};

use crate::config::{AllocPolicy, TableConfig};
use crate::error::{Error, Result};
use crate::probing::ProbingCounter;
use crate::strategy::{BytesKeys, IntKeys, KeyStrategy};

/// A whitespace-delimited token; any bytes other than ASCII whitespace.
pub type Token = Vec<u8>;

/// How to size a counter for a batch of tokens.
#[derive(Copy, Clone, Debug, Default)]
pub struct CountOptions {
    /// Explicit slot count; defaults to the token count (at least 1).
    pub capacity: Option<usize>,
    pub alloc_policy: AllocPolicy,
}

impl CountOptions {
    fn config_for(&self, tokens: usize) -> TableConfig {
        let capacity = self.capacity.unwrap_or(tokens.max(1));
        TableConfig::new(capacity).alloc_policy(self.alloc_policy)
    }
}

/// Read every whitespace-delimited token until end of stream. Tokens are raw
/// bytes; input need not be UTF-8.
pub fn read_tokens<R: BufRead>(mut reader: R) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut line = Vec::new();
    while reader.read_until(b'\n', &mut line)? > 0 {
        tokens.extend(
            line.split(u8::is_ascii_whitespace)
                .filter(|t| !t.is_empty())
                .map(<[u8]>::to_vec),
        );
        line.clear();
    }
    log::debug!("read {} tokens", tokens.len());
    Ok(tokens)
}

pub fn count_words(tokens: &[Token], opts: CountOptions) -> Result<ProbingCounter<BytesKeys>> {
    let mut counter = ProbingCounter::new(opts.config_for(tokens.len()), BytesKeys)?;
    for t in tokens {
        counter.increment(t)?;
    }
    Ok(counter)
}

pub fn parse_int(token: &[u8]) -> Result<i32> {
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::InvalidInteger {
            token: String::from_utf8_lossy(token).into_owned(),
        })
}

pub fn count_numbers(tokens: &[Token], opts: CountOptions) -> Result<ProbingCounter<IntKeys>> {
    let mut counter = ProbingCounter::new(opts.config_for(tokens.len()), IntKeys)?;
    for t in tokens {
        counter.increment(&parse_int(t)?)?;
    }
    Ok(counter)
}

/// Keys that can be written back out as they were read.
pub trait WriteKey {
    fn write_key<W: Write>(&self, out: &mut W) -> io::Result<()>;
}

impl WriteKey for [u8] {
    fn write_key<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self)
    }
}

impl WriteKey for i32 {
    fn write_key<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

/// Write `"<key> <count>"` per distinct key, in slot order.
pub fn write_counts<S, W>(counter: &ProbingCounter<S>, mut out: W) -> Result<()>
where
    S: KeyStrategy,
    S::Key: WriteKey,
    W: Write,
{
    for (key, count) in counter.iter() {
        key.write_key(&mut out)?;
        writeln!(out, " {count}")?;
    }
    out.flush()?;
    Ok(())
}
