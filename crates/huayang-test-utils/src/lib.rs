//! Testing utilities for the Huayang workspace
//!
//! Shared stores, credentials and a scripted generator.

#![allow(missing_docs)]

use async_trait::async_trait;
use huayang_assist::{AssistBridge, AssistError, Generator};
use huayang_core::{
    FileSlot, MemorySlot, RecoveryPolicy, Slot, StaticCredentials, Volume, VolumeStore,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Semaphore;

pub const TEST_USER: &str = "editor";
pub const TEST_PASSWORD: &str = "secret";

pub fn test_credentials() -> StaticCredentials {
    StaticCredentials::new(TEST_USER, TEST_PASSWORD)
}

pub async fn memory_store() -> (Arc<MemorySlot>, VolumeStore) {
    let slot = Arc::new(MemorySlot::new());
    let store = VolumeStore::open(slot.clone(), RecoveryPolicy::default())
        .await
        .unwrap();
    (slot, store)
}

/// File-backed store; keep the `TempDir` alive for the test's duration
pub async fn tempdir_store() -> (TempDir, VolumeStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = VolumeStore::open(Arc::new(FileSlot::new(dir.path())), RecoveryPolicy::default())
        .await
        .unwrap();
    (dir, store)
}

/// Reopen a store over an existing slot, as a fresh process would
pub async fn reopen(slot: Arc<dyn Slot>) -> VolumeStore {
    VolumeStore::open(slot, RecoveryPolicy::Strict).await.unwrap()
}

pub fn volume_with_original(id: &str, original: &str) -> Volume {
    Volume::new(id, format!("测试 {id}")).with_field(huayang_core::Rendition::Original, original)
}

/// Generator that replays queued responses and records prompts
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, AssistError>>>,
    prompts: Mutex<Vec<String>>,
    gate: Option<Semaphore>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(text: &str) -> Self {
        let generator = Self::new();
        generator.push_ok(text);
        generator
    }

    pub fn failing(err: AssistError) -> Self {
        let generator = Self::new();
        generator.push_err(err);
        generator
    }

    /// Each call is recorded, then waits for a [`ScriptedGenerator::release`]
    pub fn held(text: &str) -> Self {
        let generator = Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        };
        generator.push_ok(text);
        generator
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn push_ok(&self, text: &str) {
        self.responses.lock().push_back(Ok(text.to_string()));
    }

    pub fn push_err(&self, err: AssistError) {
        self.responses.lock().push_back(Err(err));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, AssistError> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.responses
            .lock()
            .pop_front()
            .unwrap_or(Err(AssistError::EmptyResponse))
    }
}

pub fn scripted_bridge(generator: ScriptedGenerator) -> (Arc<ScriptedGenerator>, AssistBridge) {
    let generator = Arc::new(generator);
    let bridge = AssistBridge::new(generator.clone());
    (generator, bridge)
}
