//! Scripted fakes for the metadata client and process runner.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use trailerforged_common::{MovieId, MovieRef, Result};

use super::process::{ProcessCommand, ProcessOutput, ProcessRunner};
use crate::metadata::{MetadataApiClient, VideoResult};

pub fn movie_with_tmdb(name: &str, tmdb_id: &str) -> MovieRef {
    let mut movie = MovieRef::new(MovieId::new(), name, format!("/movies/{name}/{name}.mkv"));
    movie.provider_ids.insert("tmdb".into(), tmdb_id.into());
    movie
}

/// Metadata client replaying scripted responses, then answering with `fallback`.
pub struct FakeMetadata {
    script: Mutex<VecDeque<Result<Vec<VideoResult>>>>,
    fallback: Vec<VideoResult>,
    panic_for: Option<String>,
    calls: AtomicUsize,
}

impl FakeMetadata {
    pub fn trailer_videos(key: &str) -> Vec<VideoResult> {
        vec![VideoResult {
            key: key.into(),
            site: "YouTube".into(),
            kind: "Trailer".into(),
            name: "Official Trailer".into(),
        }]
    }

    pub fn with_videos(videos: Vec<VideoResult>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: videos,
            panic_for: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_trailer(key: &str) -> Self {
        Self::with_videos(Self::trailer_videos(key))
    }

    pub fn scripted(script: Vec<Result<Vec<VideoResult>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Vec::new(),
            panic_for: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Panic when asked about `external_id`.
    pub fn panicking_for(mut self, external_id: &str) -> Self {
        self.panic_for = Some(external_id.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataApiClient for FakeMetadata {
    async fn movie_videos(&self, external_id: &str) -> Result<Vec<VideoResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_for.as_deref() == Some(external_id) {
            panic!("metadata lookup exploded for {external_id}");
        }
        match self.script.lock().pop_front() {
            Some(result) => result,
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Process runner replaying scripted results and recording commands.
pub struct FakeRunner {
    script: Mutex<VecDeque<Result<ProcessOutput>>>,
    fallback: ProcessOutput,
    commands: Mutex<Vec<ProcessCommand>>,
}

impl FakeRunner {
    pub fn exit(code: i32, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    pub fn exiting(code: i32, stderr: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Self::exit(code, stderr),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::exiting(0, "")
    }

    pub fn scripted(script: Vec<Result<ProcessOutput>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Self::exit(0, ""),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn commands(&self) -> Vec<ProcessCommand> {
        self.commands.lock().clone()
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, command: &ProcessCommand, _cancel: &CancellationToken) -> Result<ProcessOutput> {
        self.commands.lock().push(command.clone());
        match self.script.lock().pop_front() {
            Some(result) => result,
            None => Ok(self.fallback.clone()),
        }
    }
}
