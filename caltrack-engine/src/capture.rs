use crate::traits::{FoodService, Notifier};
use caltrack_core::data_url::{
    encode_data_url, image_mime_for_path, is_image_mime, parse_data_url,
};
use caltrack_core::error::ServiceError;
use caltrack_core::toast::Toast;
use caltrack_core::types::RecognizedFood;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

const ANALYSIS_FAILED: &str = "Analysis failed";
const RECOGNITION_FALLBACK: &str = "Could not recognize the dish";

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("not an image: {0}")]
    NotAnImage(String),

    #[error("unrecognized image type: {}", .0.display())]
    UnknownImageType(PathBuf),

    #[error("read image {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Clears the analyzing flag on every exit, including when the future is dropped mid-request.
struct AnalyzingGuard<'a>(&'a mut bool);

impl<'a> AnalyzingGuard<'a> {
    fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for AnalyzingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Photo capture and recognition.
///
/// Holds at most one captured image as a data URL. `analyze` submits it and yields the
/// recognized food; the owner is expected to save it and close the flow.
pub struct CaptureFlow {
    service: Arc<dyn FoodService>,
    notifier: Arc<dyn Notifier>,
    captured_image: Option<String>,
    is_analyzing: bool,
}

impl CaptureFlow {
    pub fn new(service: Arc<dyn FoodService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            notifier,
            captured_image: None,
            is_analyzing: false,
        }
    }

    pub fn captured_image(&self) -> Option<&str> {
        self.captured_image.as_deref()
    }

    pub fn captured_mime(&self) -> Option<&str> {
        parse_data_url(self.captured_image.as_deref()?).map(|(mime, _)| mime)
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing
    }

    /// True when the picker should be shown instead of the preview.
    pub fn needs_image(&self) -> bool {
        self.captured_image.is_none()
    }

    /// Whether the confirm action is enabled.
    pub fn can_confirm(&self) -> bool {
        self.captured_image.is_some() && !self.is_analyzing
    }

    pub fn select_image(&mut self, mime: &str, bytes: &[u8]) -> Result<(), CaptureError> {
        if !is_image_mime(mime) {
            return Err(CaptureError::NotAnImage(mime.to_string()));
        }
        self.captured_image = Some(encode_data_url(&mime.to_ascii_lowercase(), bytes));
        Ok(())
    }

    pub async fn select_file(&mut self, path: &Path) -> Result<(), CaptureError> {
        let mime = image_mime_for_path(path)
            .ok_or_else(|| CaptureError::UnknownImageType(path.to_path_buf()))?;
        let bytes = tokio::fs::read(path).await.map_err(|source| CaptureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("captured {} ({} bytes)", path.display(), bytes.len());
        self.select_image(mime, &bytes)
    }

    /// Discards the captured image; the picker opens again.
    pub fn retake(&mut self) {
        self.captured_image = None;
    }

    /// Submits the captured image for recognition.
    ///
    /// Returns `None` without a request when nothing is captured or an analysis is already
    /// pending. Failures surface as a toast and also return `None`; the image is kept so the
    /// user can retry.
    pub async fn analyze(&mut self) -> Option<RecognizedFood> {
        if self.is_analyzing {
            return None;
        }
        let image = self.captured_image.as_deref()?;

        let _busy = AnalyzingGuard::engage(&mut self.is_analyzing);
        match self.service.recognize(image).await {
            Ok(food) => {
                log::info!(
                    "recognized {:?}: {} kcal (confidence {:?})",
                    food.name,
                    food.nutrition.calories,
                    food.confidence
                );
                self.notifier.notify(Toast::info(
                    "Dish recognized!",
                    format!("{} - {} kcal", food.name, food.nutrition.calories),
                ));
                Some(food)
            }
            Err(e) => {
                log::warn!("recognition failed: {e}");
                self.notifier.notify(Toast::error(failure_message(&e)));
                None
            }
        }
    }
}

fn failure_message(e: &ServiceError) -> String {
    if let Some(message) = e.server_message() {
        return message.to_string();
    }
    let fallback = match e {
        ServiceError::StatusWithoutPayload { .. } => ANALYSIS_FAILED,
        _ => RECOGNITION_FALLBACK,
    };
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{Call, FakeService, recognized};
    use caltrack_core::toast::ToastCenter;
    use std::time::Duration;

    fn flow(service: &Arc<FakeService>) -> (CaptureFlow, Arc<ToastCenter>) {
        let toasts = Arc::new(ToastCenter::new(Duration::from_secs(60)));
        (CaptureFlow::new(service.clone(), toasts.clone()), toasts)
    }

    #[tokio::test]
    async fn nothing_captured_means_no_request() {
        let svc = Arc::new(FakeService::default());
        let (mut f, _) = flow(&svc);
        assert!(f.needs_image());
        assert!(!f.can_confirm());
        assert_eq!(f.analyze().await, None);
        assert!(svc.calls().is_empty());
    }

    #[tokio::test]
    async fn success_returns_food_and_toasts() {
        let svc = Arc::new(FakeService::default());
        svc.set_recognize(Ok(recognized("Salad", 200)));
        let (mut f, toasts) = flow(&svc);

        f.select_image("image/png", &[1, 2, 3]).unwrap();
        assert_eq!(f.captured_image(), Some("data:image/png;base64,AQID"));
        assert_eq!(f.captured_mime(), Some("image/png"));
        assert!(f.can_confirm());

        let food = f.analyze().await.unwrap();
        assert_eq!(food.name, "Salad");
        assert!(!f.is_analyzing());
        assert_eq!(
            svc.calls(),
            vec![Call::Recognize("data:image/png;base64,AQID".into())]
        );

        let shown = toasts.drain();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].description, "Salad - 200 kcal");
        assert!(!shown[0].is_error());
    }

    #[tokio::test]
    async fn server_error_message_is_shown_verbatim() {
        let svc = Arc::new(FakeService::default());
        svc.set_recognize(Err(ServiceError::Status {
            status: 400,
            message: "bad image".into(),
        }));
        let (mut f, toasts) = flow(&svc);
        f.select_image("image/jpeg", b"jpeg").unwrap();

        assert_eq!(f.analyze().await, None);
        assert!(!f.is_analyzing());
        assert!(f.captured_image().is_some());

        let shown = toasts.drain();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].is_error());
        assert_eq!(shown[0].description, "bad image");
    }

    #[tokio::test]
    async fn transport_failure_uses_fallback() {
        let svc = Arc::new(FakeService::default());
        svc.set_recognize(Err(ServiceError::Transport("connection refused".into())));
        let (mut f, toasts) = flow(&svc);
        f.select_image("image/jpeg", b"jpeg").unwrap();

        assert_eq!(f.analyze().await, None);
        assert_eq!(toasts.drain()[0].description, RECOGNITION_FALLBACK);
    }

    #[tokio::test]
    async fn dropped_analysis_clears_flag() {
        let svc = Arc::new(FakeService::default().with_latency(Duration::from_secs(5)));
        svc.set_recognize(Ok(recognized("Soup", 90)));
        let (mut f, _) = flow(&svc);
        f.select_image("image/png", b"png").unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(10), f.analyze()).await;
        assert!(timed_out.is_err());
        assert!(!f.is_analyzing());
        assert!(f.can_confirm());
    }

    #[test]
    fn rejects_non_images() {
        let svc = Arc::new(FakeService::default());
        let (mut f, _) = flow(&svc);
        let err = f.select_image("application/pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, CaptureError::NotAnImage(_)));
        assert!(f.needs_image());
    }

    #[tokio::test]
    async fn retake_discards_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plate.jpg");
        std::fs::write(&path, b"jpeg bytes").unwrap();

        let svc = Arc::new(FakeService::default());
        let (mut f, _) = flow(&svc);
        f.select_file(&path).await.unwrap();
        assert!(f.captured_image().unwrap().starts_with("data:image/jpeg;base64,"));

        f.retake();
        assert!(f.needs_image());
        assert!(svc.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_extension_is_rejected() {
        let svc = Arc::new(FakeService::default());
        let (mut f, _) = flow(&svc);
        let err = f.select_file(Path::new("notes.txt")).await.unwrap_err();
        assert!(matches!(err, CaptureError::UnknownImageType(_)));
    }
}
