#![allow(dead_code)]

use async_trait::async_trait;
use link_app::application::services::{LinkPolicy, LinkService};
use link_app::domain::clock::ManualClock;
use link_app::domain::entities::{Link, NewLink};
use link_app::domain::repositories::{LinkRepository, StoreError};
use link_app::infrastructure::cache::{CacheService, MemoryCache};
use link_app::infrastructure::persistence::InMemoryLinkRepository;
use link_app::state::AppState;
use link_app::utils::code_generator::{CodeGenerator, GenerationError, RandomCodeGenerator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "http://s.test";

/// In-memory store and cache sharing one virtual clock.
pub struct Harness {
    pub service: Arc<LinkService>,
    pub repository: Arc<InMemoryLinkRepository>,
    pub cache: Arc<MemoryCache>,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_generator(Arc::new(RandomCodeGenerator), LinkPolicy::default())
    }

    pub fn with_generator(generator: Arc<dyn CodeGenerator>, policy: LinkPolicy) -> Self {
        let clock = ManualClock::default();
        let repository = Arc::new(InMemoryLinkRepository::with_clock(Arc::new(clock.clone())));
        let cache = Arc::new(MemoryCache::with_clock(Arc::new(clock.clone())));
        let service = Arc::new(LinkService::new(
            repository.clone(),
            cache.clone(),
            generator,
            Arc::new(clock.clone()),
            policy,
        ));

        Self {
            service,
            repository,
            cache,
            clock,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            self.service.clone(),
            self.repository.clone(),
            self.cache.clone(),
            BASE_URL,
        )
    }
}

/// Builds state around arbitrary store and cache variants.
pub fn state_with(repository: Arc<dyn LinkRepository>, cache: Arc<dyn CacheService>) -> AppState {
    let clock = ManualClock::default();
    let service = Arc::new(LinkService::new(
        repository.clone(),
        cache.clone(),
        Arc::new(RandomCodeGenerator),
        Arc::new(clock),
        LinkPolicy::default(),
    ));

    AppState::new(service, repository, cache, BASE_URL)
}

/// Hands out a fixed sequence of codes, then fails.
pub struct ScriptedGenerator {
    codes: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: Mutex::new(codes.into_iter().map(Into::into).collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.codes.lock().unwrap().len()
    }
}

impl CodeGenerator for ScriptedGenerator {
    fn generate(&self) -> Result<String, GenerationError> {
        self.codes
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GenerationError::RandomnessUnavailable("script exhausted".into()))
    }
}

/// Where a [`SlowRepository`] sleeps relative to the wrapped save.
#[derive(Clone, Copy)]
pub enum Delay {
    BeforeSave,
    AfterSave,
}

/// Wraps a store and stalls `save`, to exercise cancellation.
pub struct SlowRepository {
    pub inner: Arc<InMemoryLinkRepository>,
    pub delay: Duration,
    pub at: Delay,
}

#[async_trait]
impl LinkRepository for SlowRepository {
    async fn save(&self, new_link: NewLink) -> Result<Link, StoreError> {
        match self.at {
            Delay::BeforeSave => {
                tokio::time::sleep(self.delay).await;
                self.inner.save(new_link).await
            }
            Delay::AfterSave => {
                let link = self.inner.save(new_link).await?;
                tokio::time::sleep(self.delay).await;
                Ok(link)
            }
        }
    }

    async fn load(&self, code: &str) -> Result<Option<Link>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.load(code).await
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        self.inner.purge_expired().await
    }

    async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }
}
