//! The `PageSession` trait — the rendered-page capability the engine
//! drives but does not implement.
//!
//! The portal is a JavaScript-heavy legacy site that materialises its
//! timetable dataset in page-local storage when its own script runs.
//! Anything that can navigate, touch that storage, re-run the script, and
//! hand back embedded script text satisfies this contract: a headless
//! browser, an HTTP approximation, or a scripted fake in tests.

use std::future::Future;

/// One live rendered-page session against the portal.
///
/// All methods return `Send` futures so the trait can be driven from
/// multi-threaded async runtimes.
pub trait PageSession: Send {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load the portal page.
  fn navigate(
    &mut self,
    url: &str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Write one key in the page's client-side key-value storage.
  fn set_storage_value(
    &mut self,
    key: &str,
    value: &str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Read one key from the page's client-side key-value storage.
  /// `None` means the portal's script has not populated it (yet).
  fn get_storage_value(
    &mut self,
    key: &str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

  /// Re-execute the page's script against the current storage values.
  fn reload(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Return the raw text of an embedded script element, or `None` when
  /// the selector matches nothing.
  fn extract_script_text(
    &mut self,
    selector: &str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

  /// Release all session resources.
  fn close(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Opens a fresh [`PageSession`] per fetch. Sessions are single-use; the
/// fetch sequence closes them on both success and failure paths.
pub trait SessionFactory: Send + Sync {
  type Session: PageSession;

  fn open(
    &self,
  ) -> impl Future<
    Output = Result<Self::Session, <Self::Session as PageSession>::Error>,
  > + Send;
}
