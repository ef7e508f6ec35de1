use std::io::BufRead;

use log::{debug, trace};
use utf8_chars::BufReadCharsExt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FastaRecord {
    pub id: String,
    pub comment: String,
    pub sequence: String,
}

/// Parse all records of a fasta file.
///
/// Sequence lines are concatenated with whitespace removed.
/// `source_name` is only used in error messages.
pub fn parse_fasta(input: impl BufRead, source_name: &str) -> Result<Vec<FastaRecord>> {
    debug!("Parsing fasta input {source_name}");

    enum State {
        FileStart,
        ParseId,
        ParseComment,
        ParseSequence,
    }

    let format_error = |reason: String| Error::FastaFormat {
        source_name: source_name.to_string(),
        reason,
    };

    let mut input = CharacterIterator::new(input, source_name);
    let mut state = State::FileStart;
    let mut current_record = FastaRecord::empty();
    let mut records = Vec::new();

    'parser: loop {
        match state {
            State::FileStart => {
                let mut newline = true;

                'find_first_record: loop {
                    match input.next() {
                        Some(result) => match result? {
                            Character::Newline => newline = true,
                            Character::RecordStart => {
                                if newline {
                                    state = State::ParseId;
                                    break 'find_first_record;
                                } else {
                                    return Err(format_error(
                                        "first record is not preceded by a newline character"
                                            .to_string(),
                                    ));
                                }
                            }
                            Character::Other(c) => {
                                newline = false;
                                if !c.is_whitespace() {
                                    return Err(format_error(format!(
                                        "found non-whitespace character before first record: {c}"
                                    )));
                                }
                            }
                        },
                        None => break 'parser,
                    }
                }
            }
            State::ParseId => 'collect_id: loop {
                match input.next() {
                    Some(result) => match result? {
                        Character::Newline => {
                            state = State::ParseSequence;
                            break 'collect_id;
                        }
                        Character::RecordStart => current_record.id.push('>'),
                        Character::Other(c) => {
                            if c.is_whitespace() {
                                if !current_record.id.is_empty() {
                                    state = State::ParseComment;
                                    break 'collect_id;
                                }
                            } else {
                                current_record.id.push(c);
                            }
                        }
                    },
                    None => {
                        records.push(current_record);
                        break 'parser;
                    }
                }
            },
            State::ParseComment => 'collect_comment: loop {
                match input.next() {
                    Some(result) => match result? {
                        Character::Newline => {
                            state = State::ParseSequence;
                            break 'collect_comment;
                        }
                        Character::RecordStart => current_record.comment.push('>'),
                        Character::Other(c) => current_record.comment.push(c),
                    },
                    None => {
                        records.push(current_record);
                        break 'parser;
                    }
                }
            },
            State::ParseSequence => {
                let mut newline = true;

                'collect_sequence: loop {
                    match input.next() {
                        Some(result) => match result? {
                            Character::Newline => newline = true,
                            Character::RecordStart => {
                                if newline {
                                    records.push(current_record);
                                    current_record = FastaRecord::empty();
                                    state = State::ParseId;
                                    break 'collect_sequence;
                                } else {
                                    return Err(format_error(format!(
                                        "record '{}' contains a '>' inside a sequence line",
                                        current_record.id
                                    )));
                                }
                            }
                            Character::Other(c) => {
                                if !c.is_whitespace() {
                                    current_record.sequence.push(c);
                                }
                                newline = false;
                            }
                        },
                        None => {
                            records.push(current_record);
                            break 'parser;
                        }
                    }
                }
            }
        }
    }

    if let Some(record) = records.iter().find(|record| record.id.is_empty()) {
        return Err(format_error(format!(
            "found a record header without identifier (comment: '{}')",
            record.comment.trim()
        )));
    }

    for record in &mut records {
        let trimmed = record.comment.trim();
        if trimmed.len() != record.comment.len() {
            record.comment = trimmed.to_string();
        }
        trace!("Parsed record {} of length {}", record.id, record.sequence.len());
    }

    debug!("Parsed {} fasta records", records.len());
    Ok(records)
}

impl FastaRecord {
    fn empty() -> Self {
        Self {
            id: String::new(),
            comment: String::new(),
            sequence: String::new(),
        }
    }
}

enum Character {
    Newline,
    RecordStart,
    Other(char),
}

struct CharacterIterator<'source_name, Reader> {
    reader: Reader,
    source_name: &'source_name str,
}

impl<'source_name, Reader: BufRead> CharacterIterator<'source_name, Reader> {
    fn new(reader: Reader, source_name: &'source_name str) -> Self {
        Self {
            reader,
            source_name,
        }
    }
}

impl<Reader: BufRead> Iterator for CharacterIterator<'_, Reader> {
    type Item = Result<Character>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader
            .read_char_raw()
            .map(|result| {
                result.map(|c| {
                    if c == '\n' || c == '\r' {
                        Character::Newline
                    } else if c == '>' {
                        Character::RecordStart
                    } else {
                        Character::Other(c)
                    }
                })
            })
            .map_err(|error| Error::FastaFormat {
                source_name: self.source_name.to_string(),
                reason: format!("error reading character: {error}"),
            })
            .transpose()
    }
}
