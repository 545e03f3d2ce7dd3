//! Groups tokens into prose and section blocks.
//!
//! A section owns every line after its marker up to the next marker or the
//! end of input. Lines before the first marker are prose.

use super::token::{Marker, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block<'a> {
    Prose(Vec<&'a str>),
    Section(SectionBlock<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SectionBlock<'a> {
    pub marker: Marker,
    pub inline: &'a str,
    pub raw: &'a str,
    pub line: usize,
    pub body: Vec<&'a str>,
}

impl<'a> SectionBlock<'a> {
    /// The block exactly as it appeared in the input.
    pub fn raw_lines(&self) -> Vec<&'a str> {
        std::iter::once(self.raw)
            .chain(self.body.iter().copied())
            .collect()
    }
}

pub(crate) fn read_blocks<'a>(tokens: &[Token<'a>]) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    let mut prose: Vec<&'a str> = Vec::new();
    let mut open: Option<SectionBlock<'a>> = None;

    for token in tokens {
        match *token {
            Token::Marker {
                marker,
                inline,
                raw,
                line,
            } => {
                if let Some(section) = open.take() {
                    blocks.push(Block::Section(section));
                } else if !prose.is_empty() {
                    blocks.push(Block::Prose(std::mem::take(&mut prose)));
                }
                open = Some(SectionBlock {
                    marker,
                    inline,
                    raw,
                    line,
                    body: Vec::new(),
                });
            }
            Token::Text { text, .. } => match open.as_mut() {
                Some(section) => section.body.push(text),
                None => prose.push(text),
            },
        }
    }

    if let Some(section) = open {
        blocks.push(Block::Section(section));
    } else if !prose.is_empty() {
        blocks.push(Block::Prose(prose));
    }
    blocks
}
