//! Scriptable in-memory browser double.
//!
//! [`MockDriver`] implements the [`Driver`] boundary against an in-memory
//! page model instead of a live browser: elements keyed by locator with
//! visibility, enabled state, text, input value and attributes; click rules
//! that mutate the model; and deferred mutations applied on a schedule so
//! wait conditions have real asynchronous transitions to poll.
//!
//! Tests register one [`PageModel`] per URL; navigation swaps in a fresh
//! copy of the registered model, and element handles resolved before the
//! swap go stale (they report "not found" on access, like a real DOM).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::driver::{Driver, Element};
use crate::locator::Locator;
use crate::result::{EnsayarError, EnsayarResult};

/// Decision function run when a scripted element is clicked.
///
/// Receives a read-only snapshot of the page and records the resulting
/// mutations into [`Effects`].
pub type ClickRule = Arc<dyn Fn(&PageSnapshot, &mut Effects) + Send + Sync>;

/// State of a single mock DOM element.
#[derive(Debug, Clone)]
pub struct ElementState {
    /// Rendered visibly
    pub displayed: bool,
    /// Accepts interaction
    pub enabled: bool,
    /// Visible text content
    pub text: String,
    /// Current input value
    pub value: String,
    /// Attribute map
    pub attributes: HashMap<String, String>,
}

impl ElementState {
    /// A visible, enabled element with no text
    #[must_use]
    pub fn visible() -> Self {
        Self {
            displayed: true,
            enabled: true,
            text: String::new(),
            value: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// An element present in the DOM but not rendered
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            displayed: false,
            ..Self::visible()
        }
    }

    /// A visible, enabled input field with an empty value
    #[must_use]
    pub fn input() -> Self {
        Self::visible()
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the enabled flag
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// In-memory model of one page: its title, elements and click rules.
#[derive(Clone, Default)]
pub struct PageModel {
    title: String,
    elements: HashMap<Locator, ElementState>,
    rules: HashMap<Locator, ClickRule>,
}

impl fmt::Debug for PageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageModel")
            .field("title", &self.title)
            .field("elements", &self.elements.len())
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl PageModel {
    /// Create a page model with a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: HashMap::new(),
            rules: HashMap::new(),
        }
    }

    /// Add an element
    #[must_use]
    pub fn element(mut self, locator: Locator, state: ElementState) -> Self {
        let _ = self.elements.insert(locator, state);
        self
    }

    /// Attach a click rule to an element
    #[must_use]
    pub fn on_click<F>(mut self, locator: Locator, rule: F) -> Self
    where
        F: Fn(&PageSnapshot, &mut Effects) + Send + Sync + 'static,
    {
        let _ = self.rules.insert(locator, Arc::new(rule));
        self
    }
}

/// Read-only view of the page handed to click rules.
#[derive(Debug)]
pub struct PageSnapshot {
    url: String,
    values: HashMap<Locator, String>,
}

impl PageSnapshot {
    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current input value of an element, if it exists
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> Option<&str> {
        self.values.get(locator).map(String::as_str)
    }
}

/// Mutations recorded by click rules and deferred schedules.
#[derive(Debug, Default)]
pub struct Effects {
    commands: Vec<Command>,
}

impl Effects {
    /// Navigate the session to a URL
    pub fn navigate(&mut self, url: impl Into<String>) {
        self.commands.push(Command::Navigate(url.into()));
    }

    /// Make an element visible
    pub fn show(&mut self, locator: &Locator) {
        self.commands.push(Command::Show(locator.clone()));
    }

    /// Hide an element (stays in the DOM)
    pub fn hide(&mut self, locator: &Locator) {
        self.commands.push(Command::Hide(locator.clone()));
    }

    /// Replace an element's text content
    pub fn set_text(&mut self, locator: &Locator, text: impl Into<String>) {
        self.commands
            .push(Command::SetText(locator.clone(), text.into()));
    }

    /// Replace an element's input value
    pub fn set_value(&mut self, locator: &Locator, value: impl Into<String>) {
        self.commands
            .push(Command::SetValue(locator.clone(), value.into()));
    }

    /// Clear an element's input value
    pub fn clear_value(&mut self, locator: &Locator) {
        self.commands.push(Command::ClearValue(locator.clone()));
    }

    /// Set an attribute on an element
    pub fn set_attribute(
        &mut self,
        locator: &Locator,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.commands
            .push(Command::SetAttribute(locator.clone(), name.into(), value.into()));
    }

    /// Insert a new element
    pub fn insert(&mut self, locator: &Locator, state: ElementState) {
        self.commands.push(Command::Insert(locator.clone(), state));
    }

    /// Remove an element from the DOM
    pub fn remove(&mut self, locator: &Locator) {
        self.commands.push(Command::Remove(locator.clone()));
    }

    /// Apply further mutations after a delay
    pub fn defer<F>(&mut self, delay: Duration, build: F)
    where
        F: FnOnce(&mut Effects),
    {
        let mut nested = Effects::default();
        build(&mut nested);
        self.commands.push(Command::Defer(delay, nested.commands));
    }
}

#[derive(Debug, Clone)]
enum Command {
    Navigate(String),
    Show(Locator),
    Hide(Locator),
    SetText(Locator, String),
    SetValue(Locator, String),
    ClearValue(Locator),
    SetAttribute(Locator, String, String),
    Insert(Locator, ElementState),
    Remove(Locator),
    Defer(Duration, Vec<Command>),
}

struct SessionState {
    open: bool,
    url: String,
    generation: u64,
    page: PageModel,
    registry: HashMap<String, PageModel>,
    deferred: Vec<(Instant, Vec<Command>)>,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("open", &self.open)
            .field("url", &self.url)
            .field("generation", &self.generation)
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl SessionState {
    /// Apply every deferred mutation whose time has come.
    fn apply_due(&mut self) {
        let now = Instant::now();
        while let Some(idx) = self.deferred.iter().position(|(due, _)| *due <= now) {
            let (_, commands) = self.deferred.remove(idx);
            self.apply(commands);
        }
    }

    fn apply(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Navigate(url) => self.load(&url),
                Command::Show(loc) => {
                    if let Some(el) = self.page.elements.get_mut(&loc) {
                        el.displayed = true;
                    }
                }
                Command::Hide(loc) => {
                    if let Some(el) = self.page.elements.get_mut(&loc) {
                        el.displayed = false;
                    }
                }
                Command::SetText(loc, text) => {
                    if let Some(el) = self.page.elements.get_mut(&loc) {
                        el.text = text;
                    }
                }
                Command::SetValue(loc, value) => {
                    if let Some(el) = self.page.elements.get_mut(&loc) {
                        el.value = value;
                    }
                }
                Command::ClearValue(loc) => {
                    if let Some(el) = self.page.elements.get_mut(&loc) {
                        el.value.clear();
                    }
                }
                Command::SetAttribute(loc, name, value) => {
                    if let Some(el) = self.page.elements.get_mut(&loc) {
                        let _ = el.attributes.insert(name, value);
                    }
                }
                Command::Insert(loc, state) => {
                    let _ = self.page.elements.insert(loc, state);
                }
                Command::Remove(loc) => {
                    let _ = self.page.elements.remove(&loc);
                }
                Command::Defer(delay, nested) => {
                    self.deferred.push((Instant::now() + delay, nested));
                }
            }
        }
    }

    /// Swap in a fresh copy of the page registered for `url`.
    ///
    /// Handles resolved before the swap become stale; pending deferred
    /// mutations from the old page are discarded, like timers dying on a
    /// real navigation.
    fn load(&mut self, url: &str) {
        self.generation += 1;
        self.url = url.to_string();
        self.page = self.registry.get(url).cloned().unwrap_or_default();
        self.deferred.clear();
    }
}

/// In-memory [`Driver`] implementation for tests.
#[derive(Debug, Clone)]
pub struct MockDriver {
    state: Arc<Mutex<SessionState>>,
}

impl MockDriver {
    /// Create a driver with a blank page at the given URL
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                open: true,
                url: url.into(),
                generation: 0,
                page: PageModel::default(),
                registry: HashMap::new(),
                deferred: Vec::new(),
            })),
        }
    }

    /// Register a page model for a URL; navigating there loads a fresh copy
    pub fn define_page(&self, url: impl Into<String>, page: PageModel) {
        let mut state = self.lock();
        let _ = state.registry.insert(url.into(), page);
    }

    /// Handle for mutating the currently loaded page
    #[must_use]
    pub fn page(&self) -> PageHandle {
        PageHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("mock session lock poisoned")
    }

    fn checked_lock(&self) -> EnsayarResult<MutexGuard<'_, SessionState>> {
        let mut state = self.lock();
        state.apply_due();
        if state.open {
            Ok(state)
        } else {
            Err(EnsayarError::SessionClosed)
        }
    }
}

impl Driver for MockDriver {
    type Element = MockElement;

    fn navigate(&self, url: &str) -> EnsayarResult<()> {
        let mut state = self.checked_lock()?;
        state.load(url);
        Ok(())
    }

    fn find_element(&self, locator: &Locator) -> EnsayarResult<Self::Element> {
        let state = self.checked_lock()?;
        if state.page.elements.contains_key(locator) {
            Ok(MockElement {
                state: Arc::clone(&self.state),
                locator: locator.clone(),
                generation: state.generation,
            })
        } else {
            Err(locator.not_found())
        }
    }

    fn current_url(&self) -> EnsayarResult<String> {
        Ok(self.checked_lock()?.url.clone())
    }

    fn title(&self) -> EnsayarResult<String> {
        Ok(self.checked_lock()?.page.title.clone())
    }

    fn close(&self) -> EnsayarResult<()> {
        let mut state = self.lock();
        state.open = false;
        Ok(())
    }
}

/// Handle for mutating the currently loaded mock page.
#[derive(Debug)]
pub struct PageHandle {
    state: Arc<Mutex<SessionState>>,
}

impl PageHandle {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("mock session lock poisoned")
    }

    /// Insert an element
    pub fn insert(&self, locator: Locator, element: ElementState) {
        let _ = self.lock().page.elements.insert(locator, element);
    }

    /// Insert a visible element
    pub fn insert_visible(&self, locator: Locator) {
        self.insert(locator, ElementState::visible());
    }

    /// Insert a hidden element
    pub fn insert_hidden(&self, locator: Locator) {
        self.insert(locator, ElementState::hidden());
    }

    /// Remove an element
    pub fn remove(&self, locator: &Locator) {
        let _ = self.lock().page.elements.remove(locator);
    }

    /// Attach a click rule to an element of the current page
    pub fn on_click<F>(&self, locator: Locator, rule: F)
    where
        F: Fn(&PageSnapshot, &mut Effects) + Send + Sync + 'static,
    {
        let _ = self.lock().page.rules.insert(locator, Arc::new(rule));
    }

    /// Schedule mutations to apply after a delay
    pub fn defer<F>(&self, delay: Duration, build: F)
    where
        F: FnOnce(&mut Effects),
    {
        let mut effects = Effects::default();
        build(&mut effects);
        self.lock()
            .deferred
            .push((Instant::now() + delay, effects.commands));
    }
}

/// Element handle into the mock DOM.
///
/// Reads live state by locator; goes stale when the session navigates after
/// resolution, reporting "not found" on access like a detached DOM node.
#[derive(Debug, Clone)]
pub struct MockElement {
    state: Arc<Mutex<SessionState>>,
    locator: Locator,
    generation: u64,
}

impl MockElement {
    fn with_element<T>(&self, f: impl FnOnce(&mut ElementState) -> T) -> EnsayarResult<T> {
        let mut state = self.state.lock().expect("mock session lock poisoned");
        state.apply_due();
        if !state.open {
            return Err(EnsayarError::SessionClosed);
        }
        if state.generation != self.generation {
            return Err(self.locator.not_found());
        }
        state
            .page
            .elements
            .get_mut(&self.locator)
            .map(f)
            .ok_or_else(|| self.locator.not_found())
    }

    fn click_rule(&self) -> EnsayarResult<Option<(ClickRule, PageSnapshot)>> {
        let mut state = self.state.lock().expect("mock session lock poisoned");
        state.apply_due();
        if !state.open {
            return Err(EnsayarError::SessionClosed);
        }
        if state.generation != self.generation || !state.page.elements.contains_key(&self.locator)
        {
            return Err(self.locator.not_found());
        }
        let rule = state.page.rules.get(&self.locator).cloned();
        Ok(rule.map(|rule| {
            let snapshot = PageSnapshot {
                url: state.url.clone(),
                values: state
                    .page
                    .elements
                    .iter()
                    .map(|(loc, el)| (loc.clone(), el.value.clone()))
                    .collect(),
            };
            (rule, snapshot)
        }))
    }
}

impl Element for MockElement {
    fn is_displayed(&self) -> EnsayarResult<bool> {
        self.with_element(|el| el.displayed)
    }

    fn is_enabled(&self) -> EnsayarResult<bool> {
        self.with_element(|el| el.enabled)
    }

    fn text(&self) -> EnsayarResult<String> {
        self.with_element(|el| el.text.clone())
    }

    fn attribute(&self, name: &str) -> EnsayarResult<Option<String>> {
        self.with_element(|el| {
            if name == "value" {
                Some(el.value.clone())
            } else {
                el.attributes.get(name).cloned()
            }
        })
    }

    fn clear(&self) -> EnsayarResult<()> {
        self.with_element(|el| el.value.clear())
    }

    fn send_keys(&self, text: &str) -> EnsayarResult<()> {
        self.with_element(|el| el.value.push_str(text))
    }

    fn click(&self) -> EnsayarResult<()> {
        if let Some((rule, snapshot)) = self.click_rule()? {
            let mut effects = Effects::default();
            rule(&snapshot, &mut effects);
            let mut state = self.state.lock().expect("mock session lock poisoned");
            state.apply(effects.commands);
        }
        Ok(())
    }
}
