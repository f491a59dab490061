//! Real browser control over the Chrome DevTools Protocol.
//!
//! Available behind the `browser` feature. [`CdpDriver`] implements the
//! [`Driver`] boundary against a headless Chromium session via
//! chromiumoxide, bridging the synchronous trait over a private tokio
//! runtime. Element state is read through JavaScript lookup expressions
//! rendered from the locator, so the protocol surface stays small: launch,
//! navigate, evaluate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use tokio::runtime::Runtime;
use tokio::sync::Mutex;

use crate::driver::{Driver, Element};
use crate::locator::Locator;
use crate::result::{EnsayarError, EnsayarResult};

/// Launch options for the Chromium session
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run in headless mode
    pub headless: bool,
    /// Path to the chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers/CI)
    pub sandbox: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserOptions {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the chromium binary path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable the sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

struct SessionInner {
    runtime: Runtime,
    browser: Mutex<CdpBrowser>,
    page: Mutex<CdpPage>,
    closed: AtomicBool,
}

impl SessionInner {
    fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> EnsayarResult<T> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(EnsayarError::SessionClosed);
        }
        self.runtime.block_on(async {
            let page = self.page.lock().await;
            let result = page
                .evaluate(expr.as_str())
                .await
                .map_err(|e| EnsayarError::Browser {
                    message: e.to_string(),
                })?;
            result.into_value().map_err(|e| EnsayarError::Browser {
                message: e.to_string(),
            })
        })
    }
}

/// Render a string as a JavaScript string literal
fn js_str(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| String::from("\"\""))
}

/// [`Driver`] implementation over a headless Chromium session.
pub struct CdpDriver {
    inner: Arc<SessionInner>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for CdpDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpDriver")
            .field("closed", &self.inner.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl CdpDriver {
    /// Launch a fresh Chromium session.
    ///
    /// # Errors
    ///
    /// Returns [`EnsayarError::Browser`] if the browser cannot be launched.
    pub fn launch(options: &BrowserOptions) -> EnsayarResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| EnsayarError::Browser {
                message: e.to_string(),
            })?;

        let (browser, page, handle) = runtime.block_on(async {
            let mut builder = CdpConfig::builder();

            if !options.headless {
                builder = builder.with_head();
            }
            if !options.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref path) = options.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let config = builder.build().map_err(|e| EnsayarError::Browser {
                message: e.to_string(),
            })?;

            let (browser, mut handler) =
                CdpBrowser::launch(config)
                    .await
                    .map_err(|e| EnsayarError::Browser {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| EnsayarError::Browser {
                        message: e.to_string(),
                    })?;

            Ok::<_, EnsayarError>((browser, page, handle))
        })?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                runtime,
                browser: Mutex::new(browser),
                page: Mutex::new(page),
                closed: AtomicBool::new(false),
            }),
            handle,
        })
    }
}

impl Driver for CdpDriver {
    type Element = CdpElement;

    fn navigate(&self, url: &str) -> EnsayarResult<()> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(EnsayarError::SessionClosed);
        }
        self.inner.runtime.block_on(async {
            let page = self.inner.page.lock().await;
            page.goto(url).await.map_err(|e| EnsayarError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            Ok(())
        })
    }

    fn find_element(&self, locator: &Locator) -> EnsayarResult<Self::Element> {
        let exists: bool = self
            .inner
            .eval(format!("({}) !== null", locator.to_query()))?;
        if exists {
            Ok(CdpElement {
                inner: Arc::clone(&self.inner),
                locator: locator.clone(),
            })
        } else {
            Err(locator.not_found())
        }
    }

    fn current_url(&self) -> EnsayarResult<String> {
        self.inner.eval("window.location.href".to_string())
    }

    fn title(&self) -> EnsayarResult<String> {
        self.inner.eval("document.title".to_string())
    }

    fn close(&self) -> EnsayarResult<()> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.inner.runtime.block_on(async {
            let mut browser = self.inner.browser.lock().await;
            browser.close().await.map_err(|e| EnsayarError::Browser {
                message: e.to_string(),
            })?;
            Ok(())
        })
    }
}

impl Drop for CdpDriver {
    fn drop(&mut self) {
        if !self.inner.closed.load(Ordering::SeqCst) {
            if let Err(err) = self.close() {
                tracing::warn!(%err, "failed to close chromium session on drop");
            }
        }
    }
}

/// Element handle into the live DOM.
///
/// The handle re-evaluates its locator on every access; an element that has
/// left the DOM reports "not found", never a stale protocol id.
#[derive(Clone)]
pub struct CdpElement {
    inner: Arc<SessionInner>,
    locator: Locator,
}

impl std::fmt::Debug for CdpElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpElement")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

impl CdpElement {
    /// Evaluate a body over the resolved element; `null` means the element
    /// left the DOM.
    fn eval_on<T: serde::de::DeserializeOwned>(&self, body: &str) -> EnsayarResult<T> {
        let expr = format!(
            "(() => {{ const el = {}; if (!el) return null; {} }})()",
            self.locator.to_query(),
            body
        );
        let value: Option<T> = self.inner.eval(expr)?;
        value.ok_or_else(|| self.locator.not_found())
    }
}

impl Element for CdpElement {
    fn is_displayed(&self) -> EnsayarResult<bool> {
        self.eval_on(
            "const s = window.getComputedStyle(el); \
             return s.display !== 'none' && s.visibility !== 'hidden' \
                 && el.getClientRects().length > 0;",
        )
    }

    fn is_enabled(&self) -> EnsayarResult<bool> {
        self.eval_on("return !el.disabled;")
    }

    fn text(&self) -> EnsayarResult<String> {
        self.eval_on("return el.innerText ?? el.textContent ?? '';")
    }

    fn attribute(&self, name: &str) -> EnsayarResult<Option<String>> {
        // The element itself may be gone (outer null) while the attribute
        // may legitimately be absent (inner null); the array keeps the two
        // apart.
        let wrapped: Vec<Option<String>> = self.eval_on(&format!(
            "return [el.getAttribute({})];",
            js_str(name)
        ))?;
        Ok(wrapped.into_iter().next().flatten())
    }

    fn clear(&self) -> EnsayarResult<()> {
        let cleared: bool = self.eval_on(
            "el.value = ''; \
             el.dispatchEvent(new Event('input', { bubbles: true })); \
             return true;",
        )?;
        let _ = cleared;
        Ok(())
    }

    fn send_keys(&self, text: &str) -> EnsayarResult<()> {
        let typed: bool = self.eval_on(&format!(
            "el.focus(); el.value = (el.value ?? '') + {}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             return true;",
            js_str(text)
        ))?;
        let _ = typed;
        Ok(())
    }

    fn click(&self) -> EnsayarResult<()> {
        let clicked: bool = self.eval_on("el.click(); return true;")?;
        let _ = clicked;
        Ok(())
    }
}
