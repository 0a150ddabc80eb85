// Background image decoding with a small LRU cache, so paging never blocks on a large photo

use crate::preview::{generate_image_preview, ImagePreview, PreviewRequest};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};

/// Maximum number of cached previews
const CACHE_SIZE: usize = 10;

/// Represents a preview loading state
#[derive(Debug, Clone)]
pub enum PreviewState {
    Loading,
    Ready(ImagePreview),
    Error(String),
}

/// Messages for the background worker
enum LoaderMessage {
    Load {
        request: PreviewRequest,
        response_tx: oneshot::Sender<PreviewState>,
    },
    Shutdown,
}

/// LRU-like cache keyed by path and target size
#[derive(Debug)]
struct PreviewCache {
    cache: HashMap<PreviewRequest, ImagePreview>,
    /// Most recently used at the end
    access_order: Vec<PreviewRequest>,
    max_size: usize,
}

impl PreviewCache {
    fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            access_order: Vec::new(),
            max_size,
        }
    }

    fn get(&mut self, request: &PreviewRequest) -> Option<ImagePreview> {
        let preview = self.cache.get(request)?.clone();
        self.access_order.retain(|r| r != request);
        self.access_order.push(request.clone());
        Some(preview)
    }

    fn insert(&mut self, request: PreviewRequest, preview: ImagePreview) {
        if self.cache.contains_key(&request) {
            self.access_order.retain(|r| r != &request);
        } else if self.cache.len() >= self.max_size && !self.access_order.is_empty() {
            let oldest = self.access_order.remove(0);
            self.cache.remove(&oldest);
        }

        self.cache.insert(request.clone(), preview);
        self.access_order.push(request);
    }

    fn contains(&self, request: &PreviewRequest) -> bool {
        self.cache.contains_key(request)
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    fn clear(&mut self) {
        self.cache.clear();
        self.access_order.clear();
    }
}

/// Handle for sending requests to the preview worker
#[derive(Clone)]
pub struct PreviewLoader {
    message_tx: mpsc::Sender<LoaderMessage>,
    cache: Arc<Mutex<PreviewCache>>,
    current_loading: Arc<Mutex<Option<PreviewRequest>>>,
}

impl PreviewLoader {
    /// Spawns the background worker; must be called inside a tokio runtime
    pub fn new() -> Self {
        let (message_tx, message_rx) = mpsc::channel(32);
        let cache = Arc::new(Mutex::new(PreviewCache::new(CACHE_SIZE)));
        let current_loading = Arc::new(Mutex::new(None));

        tokio::spawn(Self::worker(
            message_rx,
            Arc::clone(&cache),
            Arc::clone(&current_loading),
        ));

        Self {
            message_tx,
            cache,
            current_loading,
        }
    }

    async fn worker(
        mut message_rx: mpsc::Receiver<LoaderMessage>,
        cache: Arc<Mutex<PreviewCache>>,
        current_loading: Arc<Mutex<Option<PreviewRequest>>>,
    ) {
        while let Some(message) = message_rx.recv().await {
            let (request, response_tx) = match message {
                LoaderMessage::Load {
                    request,
                    response_tx,
                } => (request, response_tx),
                LoaderMessage::Shutdown => break,
            };

            if let Some(cached) = cache.lock().await.get(&request) {
                let _ = response_tx.send(PreviewState::Ready(cached));
                continue;
            }

            // Nobody is waiting any more: the user paged past this image
            if response_tx.is_closed() {
                tracing::trace!("Skipping stale preview of {}", request.path.display());
                continue;
            }

            *current_loading.lock().await = Some(request.clone());

            let job = request.clone();
            let result = tokio::task::spawn_blocking(move || generate_image_preview(&job)).await;

            let cancelled = {
                let mut loading = current_loading.lock().await;
                let cancelled = loading.as_ref() != Some(&request);
                *loading = None;
                cancelled
            };

            let state = match result {
                Ok(Ok(preview)) => {
                    cache.lock().await.insert(request.clone(), preview.clone());
                    PreviewState::Ready(preview)
                }
                Ok(Err(e)) => {
                    tracing::debug!("Preview of {} failed: {}", request.path.display(), e);
                    PreviewState::Error(e.to_string())
                }
                Err(e) => PreviewState::Error(format!("Preview task panicked: {}", e)),
            };

            if cancelled {
                tracing::trace!("Preview of {} cancelled", request.path.display());
            } else {
                let _ = response_tx.send(state);
            }
        }
    }

    /// Queues a request; the answer arrives on the returned receiver
    pub async fn submit(&self, request: PreviewRequest) -> oneshot::Receiver<PreviewState> {
        let (response_tx, response_rx) = oneshot::channel();
        let message = LoaderMessage::Load {
            request,
            response_tx,
        };
        // A closed worker drops the sender, which the receiver reports as closed
        let _ = self.message_tx.send(message).await;
        response_rx
    }

    /// Loads a preview and waits up to five seconds for it
    pub async fn request_preview(&self, request: &PreviewRequest) -> PreviewState {
        if let Some(cached) = self.get_cached(request).await {
            return PreviewState::Ready(cached);
        }

        let response_rx = self.submit(request.clone()).await;
        match tokio::time::timeout(std::time::Duration::from_secs(5), response_rx).await {
            Ok(Ok(state)) => state,
            Ok(Err(_)) => PreviewState::Error("Preview loader shut down".to_string()),
            Err(_) => PreviewState::Error("Preview timed out".to_string()),
        }
    }

    pub async fn get_cached(&self, request: &PreviewRequest) -> Option<ImagePreview> {
        self.cache.lock().await.get(request)
    }

    pub async fn is_cached(&self, request: &PreviewRequest) -> bool {
        self.cache.lock().await.contains(request)
    }

    /// Stops waiting for whatever is decoding right now; a finished
    /// decode is still cached
    pub async fn cancel_current(&self) {
        self.current_loading.lock().await.take();
    }

    pub async fn shutdown(&self) {
        let _ = self.message_tx.send(LoaderMessage::Shutdown).await;
    }

    pub async fn cache_size(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }
}

impl Default for PreviewLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Polling front end for the synchronous TUI loop.
///
/// Owns its own tokio runtime; `request_preview` never blocks on decoding.
pub struct SyncPreviewManager {
    loader: PreviewLoader,
    runtime: tokio::runtime::Runtime,
    current_state: PreviewState,
    current_request: Option<PreviewRequest>,
    receiver: Option<oneshot::Receiver<PreviewState>>,
}

impl SyncPreviewManager {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let loader = runtime.block_on(async { PreviewLoader::new() });

        Ok(Self {
            loader,
            runtime,
            current_state: PreviewState::Loading,
            current_request: None,
            receiver: None,
        })
    }

    /// Returns the state for `request`, starting a load if it is new
    pub fn request_preview(&mut self, request: &PreviewRequest) -> &PreviewState {
        if self.current_request.as_ref() != Some(request) {
            if self.current_request.is_some() {
                self.runtime.block_on(self.loader.cancel_current());
            }
            self.current_request = Some(request.clone());
            self.receiver = None;

            if let Some(cached) = self.runtime.block_on(self.loader.get_cached(request)) {
                self.current_state = PreviewState::Ready(cached);
                return &self.current_state;
            }

            self.current_state = PreviewState::Loading;
            let loader = self.loader.clone();
            let job = request.clone();
            self.receiver = Some(self.runtime.block_on(async move { loader.submit(job).await }));
        }

        if matches!(self.current_state, PreviewState::Loading) {
            if let Some(ref mut rx) = self.receiver {
                match rx.try_recv() {
                    Ok(state) => {
                        self.current_state = state;
                        self.receiver = None;
                    }
                    Err(oneshot::error::TryRecvError::Empty) => {}
                    Err(oneshot::error::TryRecvError::Closed) => {
                        // Cancelled requests close without an answer; the cache may still have it
                        self.current_state =
                            match self.runtime.block_on(self.loader.get_cached(request)) {
                                Some(cached) => PreviewState::Ready(cached),
                                None => PreviewState::Error("Preview channel closed".to_string()),
                            };
                        self.receiver = None;
                    }
                }
            }
        }

        &self.current_state
    }

    pub fn current_state(&self) -> &PreviewState {
        &self.current_state
    }

    /// Forget the current image (e.g. after it was sorted away)
    pub fn reset(&mut self) {
        if self.current_request.is_some() {
            self.runtime.block_on(self.loader.cancel_current());
        }
        self.current_request = None;
        self.current_state = PreviewState::Loading;
        self.receiver = None;
    }

    pub fn cache_size(&self) -> usize {
        self.runtime.block_on(self.loader.cache_size())
    }
}

impl Drop for SyncPreviewManager {
    fn drop(&mut self) {
        self.runtime.block_on(self.loader.shutdown());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn preview_stub() -> ImagePreview {
        ImagePreview {
            original_width: 1,
            original_height: 1,
            lines: Vec::new(),
        }
    }

    fn request(path: &str) -> PreviewRequest {
        PreviewRequest::for_area(Path::new(path), 40, 20)
    }

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgb8(RgbImage::new(16, 16))
            .save(&path)
            .unwrap();
        path
    }

    mod cache_tests {
        use super::*;

        #[test]
        fn test_cache_insert_and_get() {
            let mut cache = PreviewCache::new(5);
            cache.insert(request("/a.png"), preview_stub());

            assert_eq!(cache.len(), 1);
            assert!(cache.contains(&request("/a.png")));
            assert!(cache.get(&request("/a.png")).is_some());
        }

        #[test]
        fn test_cache_key_includes_size() {
            let mut cache = PreviewCache::new(5);
            cache.insert(request("/a.png"), preview_stub());

            let resized = PreviewRequest::for_area(Path::new("/a.png"), 80, 20);
            assert!(!cache.contains(&resized));
        }

        #[test]
        fn test_cache_lru_eviction() {
            let mut cache = PreviewCache::new(3);
            for i in 0..3 {
                cache.insert(request(&format!("/img{}.png", i)), preview_stub());
            }

            // Touch the oldest so the second becomes the eviction victim
            let _ = cache.get(&request("/img0.png"));
            cache.insert(request("/img3.png"), preview_stub());

            assert_eq!(cache.len(), 3);
            assert!(cache.contains(&request("/img0.png")));
            assert!(!cache.contains(&request("/img1.png")));
            assert!(cache.contains(&request("/img3.png")));
        }

        #[test]
        fn test_cache_update_existing() {
            let mut cache = PreviewCache::new(2);
            cache.insert(request("/a.png"), preview_stub());
            cache.insert(request("/a.png"), preview_stub());

            assert_eq!(cache.len(), 1);
            cache.clear();
            assert_eq!(cache.len(), 0);
        }
    }

    mod async_loader_tests {
        use super::*;

        #[tokio::test]
        async fn test_loader_caches_result() {
            let temp_dir = TempDir::new().unwrap();
            let path = write_png(temp_dir.path(), "a.png");
            let req = PreviewRequest::for_area(&path, 8, 8);

            let loader = PreviewLoader::new();
            let state = loader.request_preview(&req).await;

            assert!(matches!(state, PreviewState::Ready(_)));
            assert!(loader.is_cached(&req).await);
            assert_eq!(loader.cache_size().await, 1);

            loader.clear_cache().await;
            assert_eq!(loader.cache_size().await, 0);
        }

        #[tokio::test]
        async fn test_loader_reports_missing_file() {
            let loader = PreviewLoader::new();
            let state = loader.request_preview(&request("/nonexistent/a.png")).await;
            assert!(matches!(state, PreviewState::Error(_)));
        }

        #[tokio::test]
        async fn test_loader_after_shutdown() {
            let loader = PreviewLoader::new();
            loader.shutdown().await;
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;

            let state = loader.request_preview(&request("/a.png")).await;
            assert!(matches!(state, PreviewState::Error(_)));
        }
    }

    mod sync_manager_tests {
        use super::*;

        fn wait_ready(manager: &mut SyncPreviewManager, req: &PreviewRequest) -> bool {
            for _ in 0..40 {
                if matches!(manager.request_preview(req), PreviewState::Ready(_)) {
                    return true;
                }
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            false
        }

        #[test]
        fn test_sync_manager_creation() {
            let manager = SyncPreviewManager::new().unwrap();
            assert_eq!(manager.cache_size(), 0);
            assert!(matches!(manager.current_state(), PreviewState::Loading));
        }

        #[test]
        fn test_sync_manager_loads_and_caches() {
            let temp_dir = TempDir::new().unwrap();
            let first = PreviewRequest::for_area(&write_png(temp_dir.path(), "a.png"), 8, 8);
            let second = PreviewRequest::for_area(&write_png(temp_dir.path(), "b.png"), 8, 8);

            let mut manager = SyncPreviewManager::new().unwrap();

            assert!(wait_ready(&mut manager, &first), "first preview never loaded");
            assert!(wait_ready(&mut manager, &second), "second preview never loaded");
            assert_eq!(manager.cache_size(), 2);

            // Returning to a cached image is immediate
            assert!(matches!(
                manager.request_preview(&first),
                PreviewState::Ready(_)
            ));
        }

        #[test]
        fn test_sync_manager_reset() {
            let mut manager = SyncPreviewManager::new().unwrap();
            let _ = manager.request_preview(&request("/nonexistent/a.png"));

            manager.reset();
            assert!(matches!(manager.current_state(), PreviewState::Loading));
        }
    }
}
