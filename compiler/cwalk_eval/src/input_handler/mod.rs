//! Source of `GET` input.
//!
//! `GET` consumes one whitespace-separated token per call and parses it as a
//! signed 64-bit integer. Tokens may be spread over lines or share one line.
//! Mirrors the print handler: enum dispatch behind a shared `Arc`.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{InputError, Value};

fn parse_token(token: &str) -> Result<Value, InputError> {
    token.parse().map_err(|_| InputError::NotAnInteger {
        token: token.to_owned(),
    })
}

fn tokenize(text: &str) -> VecDeque<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Reads tokens from the process's standard input, one line at a time.
#[derive(Default)]
pub struct StdinInputHandler {
    pending: Mutex<VecDeque<String>>,
}

impl StdinInputHandler {
    pub fn read_int(&self) -> Result<Value, InputError> {
        let mut pending = self.pending.lock();
        loop {
            if let Some(token) = pending.pop_front() {
                return parse_token(&token);
            }
            let mut line = String::new();
            let read = std::io::stdin()
                .lock()
                .read_line(&mut line)
                .map_err(|err| InputError::Io {
                    message: err.to_string(),
                })?;
            if read == 0 {
                return Err(InputError::EndOfInput);
            }
            pending.extend(tokenize(&line));
        }
    }
}

/// Serves tokens from a fixed script.
#[derive(Default)]
pub struct BufferInputHandler {
    tokens: Mutex<VecDeque<String>>,
}

impl BufferInputHandler {
    pub fn new(script: &str) -> Self {
        BufferInputHandler {
            tokens: Mutex::new(tokenize(script)),
        }
    }

    pub fn read_int(&self) -> Result<Value, InputError> {
        let token = self.tokens.lock().pop_front().ok_or(InputError::EndOfInput)?;
        parse_token(&token)
    }

    /// Append more tokens to the end of the script.
    pub fn push(&self, script: &str) {
        self.tokens.lock().extend(tokenize(script));
    }

    pub fn remaining(&self) -> usize {
        self.tokens.lock().len()
    }
}

pub enum InputHandlerImpl {
    Stdin(StdinInputHandler),
    Buffer(BufferInputHandler),
    /// Every read reports end of input.
    Closed,
}

impl InputHandlerImpl {
    /// Consume the next token as an integer.
    pub fn read_int(&self) -> Result<Value, InputError> {
        match self {
            Self::Stdin(h) => h.read_int(),
            Self::Buffer(h) => h.read_int(),
            Self::Closed => Err(InputError::EndOfInput),
        }
    }

    /// Queue more scripted input. No-op for handlers without a script.
    pub fn push(&self, script: &str) {
        if let Self::Buffer(h) = self {
            h.push(script);
        }
    }
}

pub type SharedInputHandler = Arc<InputHandlerImpl>;

pub fn stdin_handler() -> SharedInputHandler {
    Arc::new(InputHandlerImpl::Stdin(StdinInputHandler::default()))
}

/// Handler that replays `script` token by token.
pub fn scripted_handler(script: &str) -> SharedInputHandler {
    Arc::new(InputHandlerImpl::Buffer(BufferInputHandler::new(script)))
}

pub fn closed_handler() -> SharedInputHandler {
    Arc::new(InputHandlerImpl::Closed)
}
