//! Test doubles shared by the unit tests

use crate::error::{ConfigError, Result};
use crate::oauth::{Authorize, HttpRequest, HttpResponse, HttpTransport};
use crate::prompt::Prompt;
use crate::token::Credential;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

/// Transport answering with canned responses, in order
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl FakeTransport {
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ConfigError::Transport("no scripted response left".to_string()))
    }
}

/// Prompt answering from a script and recording what it was shown
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    shown: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<'a>(answers: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            answers: answers.into_iter().map(str::to_string).collect(),
            shown: Vec::new(),
        }
    }

    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn show(&mut self, message: &str) {
        self.shown.push(message.to_string());
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.shown.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

/// Authorizer returning a fixed outcome and counting calls
#[derive(Debug)]
pub struct CountingAuthorizer {
    outcome: Option<Credential>,
    pub calls: usize,
}

impl CountingAuthorizer {
    pub fn granting(credential: Credential) -> Self {
        Self {
            outcome: Some(credential),
            calls: 0,
        }
    }

    pub fn failing() -> Self {
        Self {
            outcome: None,
            calls: 0,
        }
    }
}

impl Authorize for CountingAuthorizer {
    fn authorize(&mut self, _prompt: &mut dyn Prompt) -> Result<Credential> {
        self.calls += 1;
        self.outcome
            .clone()
            .ok_or(ConfigError::RequestTokenFailed { status: 401 })
    }
}
