//! Shared mock backend for CLI unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use journal_client::mock::MockJournalService;
use journal_client::JournalService;
use journal_core::config::ClientConfig;
use journal_core::event::{ActionEventSink, InMemoryEventSink};

use crate::JournalBackend;

pub struct MockBackend {
    pub config: ClientConfig,
    pub config_path: Option<PathBuf>,
    pub service: MockJournalService,
    pub events: InMemoryEventSink,
    pub files: HashMap<String, Vec<u8>>,
    answer: bool,
    prompts: RefCell<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            config_path: None,
            service: MockJournalService::new(),
            events: InMemoryEventSink::new(),
            files: HashMap::new(),
            answer: true,
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn with_service(mut self, service: MockJournalService) -> Self {
        self.service = service;
        self
    }

    pub fn answering(mut self, answer: bool) -> Self {
        self.answer = answer;
        self
    }

    pub fn with_file(mut self, path: &str, bytes: &[u8]) -> Self {
        self.files.insert(path.to_string(), bytes.to_vec());
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl JournalBackend for MockBackend {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn service(&self) -> &dyn JournalService {
        &self.service
    }

    fn events(&self) -> &dyn ActionEventSink {
        &self.events
    }

    fn prompt(&self, question: &str) -> bool {
        self.prompts.borrow_mut().push(question.to_string());
        self.answer
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("read file {path}: not found"))
    }
}
